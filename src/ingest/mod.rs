//! Batch ingest: read per-patch metadata, reproject footprints, insert records.

mod metadata;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::labels::LabelCatalog;
use crate::reproject::{ReprojectError, Reprojector};
use crate::store::{PatchRecord, PatchStore};

pub use metadata::{patch_id_from_path, read_metadata, PatchMetadata};

pub const METADATA_SUFFIX: &str = "_labels_metadata.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestOptions {
    /// File name suffix identifying a patch's metadata file.
    pub metadata_suffix: String,
    /// Stop after this many patch directories.
    pub limit: Option<usize>,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self { metadata_suffix: METADATA_SUFFIX.into(), limit: None }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub inserted: usize,
    pub skipped: usize,
}

/// Build a store record from parsed metadata: canonical labels plus the reprojected footprint.
pub fn build_record(
    catalog: &LabelCatalog,
    reprojector: &mut Reprojector,
    patch_id: impl Into<String>,
    meta: &PatchMetadata,
) -> Result<PatchRecord, ReprojectError> {
    Ok(PatchRecord {
        patch_id: patch_id.into(),
        rectangle: reprojector.reproject(&meta.coordinates, &meta.projection)?,
        labels: catalog.encode(&meta.labels),
    })
}

/// Ingest every patch directory directly under `root`, in file name order.
///
/// A patch whose metadata is missing, unreadable, or not reprojectable (or that the
/// store refuses) is logged and skipped. Only a missing root aborts the run.
pub fn ingest_dir(
    root: &Path,
    catalog: &LabelCatalog,
    store: &mut impl PatchStore,
    options: &IngestOptions,
) -> Result<IngestReport> {
    if !root.is_dir() {
        bail!("Dataset directory does not exist: {}", root.display());
    }

    let mut reprojector = Reprojector::new()
        .context("Failed to build target projection")?;
    let mut report = IngestReport::default();

    let units = WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => entry.file_type().is_dir().then(|| entry.into_path()),
            Err(err) => {
                warn!("skipping unreadable entry: {err}");
                report.skipped += 1;
                None
            }
        })
        .take(options.limit.unwrap_or(usize::MAX))
        .collect::<Vec<_>>();

    for dir in units {
        match ingest_unit(&dir, catalog, &mut reprojector, store, options) {
            Ok(patch_id) => {
                debug!(patch = %patch_id, "inserted");
                report.inserted += 1;
            }
            Err(err) => {
                warn!(dir = %dir.display(), "skipping patch: {err:#}");
                report.skipped += 1;
            }
        }
    }

    info!(
        inserted = report.inserted,
        skipped = report.skipped,
        projections = reprojector.cached_sources(),
        "ingest finished"
    );
    Ok(report)
}

fn ingest_unit(
    dir: &Path,
    catalog: &LabelCatalog,
    reprojector: &mut Reprojector,
    store: &mut impl PatchStore,
    options: &IngestOptions,
) -> Result<String> {
    let path = find_metadata(dir, &options.metadata_suffix)?;
    let patch_id = patch_id_from_path(&path, &options.metadata_suffix)
        .with_context(|| format!("Cannot derive patch id from {}", path.display()))?;

    let meta = read_metadata(&path)?;
    let record = build_record(catalog, reprojector, patch_id.clone(), &meta)
        .with_context(|| format!("Failed to reproject {}", path.display()))?;
    store.insert(record)?;
    Ok(patch_id)
}

fn find_metadata(dir: &Path, suffix: &str) -> Result<PathBuf> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .find(|entry| entry.file_type().is_file() && entry.file_name().to_string_lossy().ends_with(suffix))
        .map(|entry| entry.into_path())
        .with_context(|| format!("No *{suffix} file in {}", dir.display()))
}
