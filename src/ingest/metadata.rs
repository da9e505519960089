use std::{fs::File, io::BufReader, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::reproject::ProjectedBox;

/// Per-patch metadata file as shipped with the dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchMetadata {
    pub labels: Vec<String>,
    pub coordinates: ProjectedBox,
    /// Projection descriptor whose tail carries the EPSG authority code.
    pub projection: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tile_source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acquisition_date: Option<String>,
}

/// Read and parse a metadata JSON file.
pub fn read_metadata(path: &Path) -> Result<PatchMetadata> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open metadata {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse metadata {}", path.display()))
}

/// Patch id of a metadata file: its file name with `suffix` removed.
pub fn patch_id_from_path(path: &Path, suffix: &str) -> Option<String> {
    let name = path.file_name()?.to_str()?;
    name.strip_suffix(suffix)
        .filter(|id| !id.is_empty())
        .map(str::to_owned)
}
