//! Error types for schema handling

use thiserror::Error;

/// Errors raised while parsing an Avro schema document
#[derive(Error, Debug)]
pub enum SchemaParseError {
    /// The document is not valid JSON or not a valid Avro schema
    #[error("Invalid Avro schema: {0}")]
    Avro(#[from] apache_avro::Error),
}

/// Errors raised while turning a type tree into a schema
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MaterializeError {
    /// Records and enums need a name
    #[error("A name is required to materialize a {0} type")]
    MissingName(&'static str),

    /// The alternatives do not form a valid Avro union
    #[error("Invalid union: {0}")]
    InvalidUnion(String),
}
