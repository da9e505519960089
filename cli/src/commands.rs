pub mod ingest;
pub mod labels;
pub mod query;
