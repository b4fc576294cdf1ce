//! Avro schema inference for JSON documents
//!
//! Provides:
//! - Schema inference from example documents ([`inference`])
//! - Materialization into `apache_avro` schemas and `.avsc` parsing ([`schema`])
//! - Projection of documents onto a schema ([`projection`])
//! - The `avro-infer` command line tool (feature `cli`)

pub mod inference;
pub mod projection;
pub mod schema;

#[cfg(feature = "cli")]
pub mod cli;

// Re-export commonly used types
pub use inference::{
    FractionalNumbers, InferenceConfig, InferenceError, InferenceStats, SchemaInferrer, TypeNode,
};
pub use projection::{ProjectionError, Value, project, project_record};
pub use schema::{MaterializeError, Schema, SchemaParseError, materialize, parse_schema};
