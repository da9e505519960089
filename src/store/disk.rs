use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};

use crate::error::Result;
use crate::query::Predicate;
use crate::store::{MemStore, PatchRecord, PatchStore};

/// JSON-lines file of patch records, served from an in-memory index.
#[derive(Debug)]
pub struct DiskStore {
    path: PathBuf,
    inner: MemStore,
}

impl DiskStore {
    /// Start an empty store that will be written to `path`.
    /// Errors if the file exists, unless `force` is set.
    pub fn create(path: impl Into<PathBuf>, force: bool) -> anyhow::Result<Self> {
        let path = path.into();
        if path.exists() && !force {
            bail!("Store already exists (use --force to overwrite): {}", path.display());
        }
        Ok(Self { path, inner: MemStore::new() })
    }

    /// Load every record from an existing store file.
    pub fn open(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let path = path.into();
        let file = File::open(&path)
            .with_context(|| format!("Failed to open store {}", path.display()))?;

        let records = BufReader::new(file).lines().enumerate()
            .filter(|(_, line)| line.as_ref().map_or(true, |l| !l.trim().is_empty()))
            .map(|(i, line)| {
                let line = line.with_context(|| format!("Failed to read line {} of {}", i + 1, path.display()))?;
                serde_json::from_str::<PatchRecord>(&line)
                    .with_context(|| format!("Invalid record on line {} of {}", i + 1, path.display()))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        let inner = MemStore::from_records(records)
            .with_context(|| format!("Failed to index store {}", path.display()))?;

        tracing::debug!(path = %path.display(), records = inner.len(), "opened store");
        Ok(Self { path, inner })
    }

    /// Write every record to the store file, one JSON object per line.
    pub fn save(&self) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let file = File::create(&self.path)
            .with_context(|| format!("Failed to create store {}", self.path.display()))?;
        let mut writer = BufWriter::new(file);
        for record in self.inner.records() {
            serde_json::to_writer(&mut writer, record)?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;
        Ok(())
    }

    #[inline] pub fn path(&self) -> &Path { &self.path }

    #[inline] pub fn records(&self) -> &[PatchRecord] { self.inner.records() }
}

impl PatchStore for DiskStore {
    fn insert(&mut self, record: PatchRecord) -> Result<()> { self.inner.insert(record) }

    #[inline] fn len(&self) -> usize { self.inner.len() }

    fn find(&self, predicate: &Predicate) -> Result<Vec<PatchRecord>> { self.inner.find(predicate) }
}
