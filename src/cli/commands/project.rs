//! Project command implementation

use std::path::PathBuf;

use clap::Args;
use tracing::debug;

use crate::cli::error::CliError;
use crate::cli::input::{load_input, parse_documents};
use crate::cli::output::format_values;
use crate::projection::project;
use crate::schema::parse_schema;

/// Arguments of the project command
#[derive(Args, Debug, Clone)]
pub struct ProjectArgs {
    /// Avro schema file (`.avsc`)
    #[arg(short, long)]
    pub schema: PathBuf,

    /// Input file with JSON records (`-` for stdin)
    #[arg(short, long, default_value = "-")]
    pub input: String,
}

/// Project every input document onto the schema, returning JSON lines
pub fn run_project(schema_text: &str, content: &str) -> Result<String, CliError> {
    let schema = parse_schema(schema_text)?;
    debug!(schema = %schema.canonical_form(), "Loaded projection schema");

    let values = parse_documents(content)?
        .iter()
        .enumerate()
        .map(|(index, document)| {
            project(document, &schema).map_err(|source| CliError::Projection { index, source })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(format_values(&values))
}

/// Handle the project command
pub fn handle_project(args: &ProjectArgs) -> Result<(), CliError> {
    let schema_text = std::fs::read_to_string(&args.schema)
        .map_err(|e| CliError::FileReadError(args.schema.clone(), e.to_string()))?;
    let content = load_input(&args.input)?;

    let output = run_project(&schema_text, &content)?;
    if !output.is_empty() {
        println!("{}", output);
    }
    Ok(())
}
