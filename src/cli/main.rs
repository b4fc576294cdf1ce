//! avro-infer CLI
//!
//! Creates Avro schemas from JSON examples and projects JSON records onto
//! Avro schemas.

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use avro_schema_inference::cli::{Cli, Commands};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let command = match &cli.command {
        Commands::Infer(_) => "infer",
        Commands::Project(_) => "project",
    };
    cli.run().with_context(|| format!("avro-infer {} failed", command))
}
