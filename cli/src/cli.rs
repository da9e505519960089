use std::path::PathBuf;

use patchquery::{ContainmentMode, GeoRelation};

/// Label and rectangle queries over land-cover patches
#[derive(clap::Parser, Debug)]
#[command(name = "patchquery", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v, -vv); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// List catalog labels alphabetically
    Labels(LabelsArgs),

    /// Read a patch dataset into a store file
    Ingest(IngestArgs),

    /// Run a query against a store file, printing the summary as JSON
    Query(QueryArgs),
}

#[derive(clap::Args, Debug)]
pub struct LabelsArgs {
    /// Print each label with its code, in code order
    #[arg(long)]
    pub codes: bool,
}

#[derive(clap::Args, Debug)]
pub struct IngestArgs {
    /// Dataset directory holding one subdirectory per patch
    #[arg(value_hint = clap::ValueHint::DirPath)]
    pub dataset: PathBuf,

    /// Output store file (JSON lines)
    #[arg(short, long, env = "PATCHQUERY_STORE", value_hint = clap::ValueHint::FilePath)]
    pub store: PathBuf,

    /// Overwrite an existing store file
    #[arg(long)]
    pub force: bool,

    /// Ingest at most this many patches
    #[arg(long)]
    pub limit: Option<usize>,
}

#[derive(clap::Args, Debug)]
pub struct QueryArgs {
    /// Store file written by `ingest`
    #[arg(short, long, env = "PATCHQUERY_STORE", value_hint = clap::ValueHint::FilePath)]
    pub store: PathBuf,

    /// JSON request file ("-" for stdin); other query flags are ignored
    #[arg(long, value_hint = clap::ValueHint::FilePath, conflicts_with_all = ["labels", "rect"])]
    pub request: Option<PathBuf>,

    /// Label name (repeatable)
    #[arg(short, long = "label")]
    pub labels: Vec<String>,

    /// Query rectangle as west south east north (degrees)
    #[arg(long, num_args = 4, value_names = ["WEST", "SOUTH", "EAST", "NORTH"], allow_negative_numbers = true)]
    pub rect: Option<Vec<f64>>,

    /// Label containment mode: all, only, some
    #[arg(short, long, default_value = "all")]
    pub mode: ContainmentMode,

    /// Geometric relation: within, intersects
    #[arg(short, long, default_value = "intersects")]
    pub relation: GeoRelation,

    /// Print only the matched patch ids
    #[arg(long)]
    pub ids_only: bool,
}
