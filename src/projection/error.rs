//! Error types for value projection

use thiserror::Error;

/// Errors raised while projecting a document onto a schema
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProjectionError {
    /// The document value has no compatible shape in the target schema
    #[error("Schema mismatch: expected {expected}, found {found}")]
    SchemaMismatch { expected: String, found: String },

    /// The document has a key the record schema does not declare
    #[error("Field '{field}' is not declared in record {record}")]
    MissingField { field: String, record: String },

    /// A declared field is absent from the document and has no default
    #[error("Field '{field}' of record {record} has no value and no default")]
    MissingValue { field: String, record: String },

    /// Rescaling the number would drop significant digits
    #[error("Decimal {value} cannot be represented with scale {scale}")]
    LossyDecimal { value: String, scale: usize },

    /// The number has more digits than the decimal's declared precision
    #[error("Decimal {value} exceeds precision {precision}")]
    PrecisionExceeded { value: String, precision: usize },

    /// Schema construct the projector cannot produce values for
    #[error("Unsupported shape: {0}")]
    UnsupportedShape(String),
}

impl ProjectionError {
    pub(crate) fn mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        ProjectionError::SchemaMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }
}
