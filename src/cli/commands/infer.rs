//! Infer command implementation

use std::path::PathBuf;

use clap::Args;
use tracing::info;

use crate::cli::error::CliError;
use crate::cli::input::{load_input, parse_documents};
use crate::cli::output::{OutputFormat, format_schema, format_stats};
use crate::inference::{FractionalNumbers, InferenceConfig, SchemaInferrer};

/// Arguments of the infer command
#[derive(Args, Debug, Clone)]
pub struct InferArgs {
    /// Name of the root record
    #[arg(short, long)]
    pub name: String,

    /// Documentation of the root record
    #[arg(short, long)]
    pub doc: Option<String>,

    /// Namespace qualifying the root record
    #[arg(long)]
    pub namespace: Option<String>,

    /// Input file with JSON examples (`-` for stdin)
    #[arg(short, long, default_value = "-")]
    pub input: String,

    /// Inference configuration file (JSON or YAML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Maximum number of examples to merge (0 = all)
    #[arg(long)]
    pub sample_size: Option<usize>,

    /// How to type numbers with a fractional part
    #[arg(long, value_enum)]
    pub fractional: Option<FractionalNumbers>,

    /// Skip the sampled value documentation on fields
    #[arg(long)]
    pub no_docs: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: OutputFormat,
}

impl InferArgs {
    /// Configuration from the config file with command line overrides applied
    pub fn inference_config(&self) -> Result<InferenceConfig, CliError> {
        let mut config = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .map_err(|e| CliError::FileReadError(path.clone(), e.to_string()))?;
                // YAML is a superset of JSON
                serde_yaml::from_str::<InferenceConfig>(&text).map_err(|e| {
                    CliError::InvalidArgument(format!("Invalid config {}: {}", path.display(), e))
                })?
            }
            None => InferenceConfig::default(),
        };

        if let Some(sample_size) = self.sample_size {
            config.sample_size = sample_size;
        }
        if let Some(fractional) = self.fractional {
            config.fractional_numbers = fractional;
        }
        if self.no_docs {
            config.collect_docs = false;
        }
        Ok(config)
    }
}

/// Infer a schema and return it rendered in the requested format
pub fn run_infer(args: &InferArgs, content: &str) -> Result<String, CliError> {
    let documents = parse_documents(content)?;
    if documents.is_empty() {
        return Err(CliError::InvalidInput(
            "Send a single JSON record or several JSON records in a JSON array".to_string(),
        ));
    }

    let mut inferrer = SchemaInferrer::with_config(
        &args.name,
        args.doc.as_deref(),
        args.namespace.as_deref(),
        args.inference_config()?,
    );
    for document in &documents {
        inferrer.add_example(document)?;
    }

    info!("{}", format_stats(&inferrer.stats()));
    format_schema(&inferrer.generate_schema()?, args.format)
}

/// Handle the infer command
pub fn handle_infer(args: &InferArgs) -> Result<(), CliError> {
    let content = load_input(&args.input)?;
    println!("{}", run_infer(args, &content)?);
    Ok(())
}
