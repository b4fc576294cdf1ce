//! CLI module for the avro-infer binary

pub mod commands;
pub mod error;
pub mod input;
pub mod output;

use clap::{Parser, Subcommand};

pub use commands::infer::InferArgs;
pub use commands::project::ProjectArgs;
pub use error::CliError;

/// Infer Avro schemas from JSON examples and project JSON onto them
#[derive(Parser, Debug)]
#[command(name = "avro-infer")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbose logging (same as RUST_LOG=debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create an Avro schema from a single JSON record or an array of records
    Infer(InferArgs),

    /// Project JSON records onto an Avro schema, one JSON value per line
    Project(ProjectArgs),
}

impl Cli {
    /// Run the selected subcommand and print its output
    pub fn run(&self) -> Result<(), CliError> {
        match &self.command {
            Commands::Infer(args) => commands::infer::handle_infer(args),
            Commands::Project(args) => commands::project::handle_project(args),
        }
    }
}
