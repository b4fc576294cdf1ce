//! Schema inference engine for JSON examples
//!
//! Every example document is classified into a [`TypeNode`] tree and widened
//! into the type accumulated so far. The result can be materialized into an
//! Avro schema at any point.
//!
//! ## Features
//!
//! - **Type lattice** - null, boolean, int, long, float, double, bytes, string,
//!   decimal, record, enum, array and union nodes
//! - **Widening** - commutative merging with numeric promotion and
//!   nullable fields for keys missing from some examples
//! - **Sampling** - most-common-value tracking per leaf, used for field
//!   documentation
//!
//! ## Example
//!
//! ```rust
//! use avro_schema_inference::inference::SchemaInferrer;
//!
//! let mut inferrer = SchemaInferrer::new("User", None, Some("com.example"));
//! inferrer.add_json(r#"{"name": "Alice", "age": 30}"#)?;
//! inferrer.add_json(r#"{"name": "Bob", "email": "bob@example.com"}"#)?;
//!
//! let schema = inferrer.generate_schema()?;
//! println!("{}", schema.canonical_form());
//! # Ok::<(), avro_schema_inference::inference::InferenceError>(())
//! ```

mod config;
mod error;
mod inferrer;
mod merge;
mod sampler;
mod types;

pub use config::{FractionalNumbers, InferenceConfig, InferenceConfigBuilder};
pub use error::InferenceError;
pub use inferrer::{InferenceStats, SchemaInferrer};
pub use merge::widen;
pub use sampler::{SAMPLER_CAPACITY, SampleValue, Sampler};
pub use types::{
    MAX_NUMBER_DIGITS, TypeKind, TypeNode, build_type, build_type_with, normalize_field_name,
};

pub(crate) use types::number_to_decimal;
