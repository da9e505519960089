use std::{fs, io::Read, path::Path};

use anyhow::{Context, Result};
use patchquery::{DiskStore, LabelCatalog, QueryRequest, QueryService, RawGeometry};

use crate::cli::QueryArgs;

pub fn run(_cli: &crate::cli::Cli, args: &QueryArgs) -> Result<()> {
    let request = match &args.request {
        Some(path) => read_request(path)?,
        None => request_from_flags(args),
    };

    let catalog = LabelCatalog::new();
    let store = DiskStore::open(&args.store)?;
    let summary = QueryService::new(&catalog, &store).execute(&request);

    if args.ids_only {
        summary.matched_patch_ids.iter().for_each(|id| println!("{id}"));
    } else {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }
    Ok(())
}

fn read_request(path: &Path) -> Result<QueryRequest> {
    let text = if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text).context("Failed to read request from stdin")?;
        text
    } else {
        fs::read_to_string(path)
            .with_context(|| format!("Failed to read request {}", path.display()))?
    };

    serde_json::from_str(&text).context("Failed to parse query request")
}

fn request_from_flags(args: &QueryArgs) -> QueryRequest {
    let geometry = args.rect.as_deref().and_then(|rect| match *rect {
        [west, south, east, north] => Some(RawGeometry::from_bounds(west, south, east, north)),
        _ => None,
    });

    QueryRequest::new(args.labels.clone(), geometry, args.mode, args.relation)
}
