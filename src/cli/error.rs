//! CLI error types

use std::path::PathBuf;

use thiserror::Error;

use crate::inference::InferenceError;
use crate::projection::ProjectionError;
use crate::schema::SchemaParseError;

/// Errors reported by the avro-infer binary
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Failed to read {0}: {1}")]
    FileReadError(PathBuf, String),

    #[error("Invalid JSON input: {0}")]
    InvalidInput(String),

    #[error("Schema inference failed: {0}")]
    Inference(#[from] InferenceError),

    #[error("Invalid schema: {0}")]
    Schema(#[from] SchemaParseError),

    /// Projection failure of the record at `index`
    #[error("Record {index} does not match the schema: {source}")]
    Projection {
        index: usize,
        #[source]
        source: ProjectionError,
    },

    #[error("Failed to write output: {0}")]
    Output(String),
}
