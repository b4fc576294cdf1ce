//! Error types for schema inference

use thiserror::Error;

use crate::schema::MaterializeError;

/// Errors that can occur during schema inference
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InferenceError {
    /// A document node the classifier cannot turn into a type
    #[error("Unsupported document shape: {0}")]
    UnsupportedShape(String),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonParse(String),

    /// Maximum depth exceeded
    #[error("Maximum nesting depth exceeded: {depth} > {max}")]
    MaxDepthExceeded { depth: usize, max: usize },

    /// No records to infer from
    #[error("No records provided for inference")]
    NoRecords,

    /// The accumulated type could not be turned into a schema
    #[error(transparent)]
    Materialize(#[from] MaterializeError),
}

impl From<serde_json::Error> for InferenceError {
    fn from(e: serde_json::Error) -> Self {
        InferenceError::JsonParse(e.to_string())
    }
}
