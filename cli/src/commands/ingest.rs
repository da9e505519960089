use anyhow::{Context, Result};
use patchquery::{ingest_dir, DiskStore, IngestOptions, LabelCatalog};

pub fn run(_cli: &crate::cli::Cli, args: &crate::cli::IngestArgs) -> Result<()> {
    let catalog = LabelCatalog::new();
    let mut store = DiskStore::create(&args.store, args.force)?;
    let options = IngestOptions { limit: args.limit, ..Default::default() };

    tracing::info!("[ingest] reading patches from {}", args.dataset.display());
    let report = ingest_dir(&args.dataset, &catalog, &mut store, &options)?;

    tracing::info!("[ingest] writing {} records to {}", report.inserted, store.path().display());
    store.save().with_context(|| format!("Failed to write store {}", args.store.display()))?;

    eprintln!("inserted {} patches, skipped {}", report.inserted, report.skipped);
    Ok(())
}
