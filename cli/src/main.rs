mod cli;
mod commands;

use anyhow::Context;
use tracing_subscriber::{util::SubscriberInitExt, EnvFilter};

use cli::{Cli, Commands};
use commands::{ingest, labels, query};

/// Install the stderr subscriber; `RUST_LOG` wins over `-v` flags.
fn setup_logging(verbose: u8) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| {
        EnvFilter::try_new(match verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        })
    }).context("set up log env filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish()
        .try_init()
        .context("init logging subscriber")
}

pub fn run() -> anyhow::Result<()> {
    use clap::Parser;

    let cli = Cli::parse();
    setup_logging(cli.verbose)?;

    match &cli.command {
        Commands::Labels(args) => labels::run(&cli, args),
        Commands::Ingest(args) => ingest::run(&cli, args),
        Commands::Query(args) => query::run(&cli, args),
    }
}

fn main() -> anyhow::Result<()> { run() }
