//! Schema inference session

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, trace};

use super::config::InferenceConfig;
use super::error::InferenceError;
use super::types::{TypeNode, build_type_with};
use crate::schema::{Materializer, Schema};

/// Statistics from schema inference
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InferenceStats {
    /// Examples merged into the accumulated type
    pub records_processed: usize,
    /// Examples skipped (invalid JSON)
    pub records_skipped: usize,
    /// Record fields in the accumulated type
    pub fields_discovered: usize,
    /// Nesting depth of the accumulated type
    pub max_depth: usize,
}

/// Schema inference session
///
/// Folds every example into one accumulated [`TypeNode`] and turns it into an
/// Avro [`Schema`] on demand. More examples can be added after a schema has
/// been generated.
///
/// ```rust
/// use avro_schema_inference::inference::SchemaInferrer;
///
/// let mut inferrer = SchemaInferrer::new("MyExample", Some("Testing my schema"), Some("my.namespace"));
/// inferrer.add_json(r#"{"name1": 5}"#).unwrap();
/// inferrer.add_json(r#"{"name2": {"name3": "my value"}}"#).unwrap();
///
/// let schema = inferrer.generate_schema().unwrap();
/// println!("{}", schema.canonical_form());
/// ```
#[derive(Debug, Clone)]
pub struct SchemaInferrer {
    config: InferenceConfig,
    root_name: String,
    root_doc: Option<String>,
    root_namespace: Option<String>,
    current: Option<TypeNode>,
    record_count: usize,
    skipped_count: usize,
}

impl SchemaInferrer {
    /// Create a new inferrer with default configuration
    ///
    /// `name`, `doc` and `namespace` end up on the root record of the schema.
    pub fn new(name: &str, doc: Option<&str>, namespace: Option<&str>) -> Self {
        Self::with_config(name, doc, namespace, InferenceConfig::default())
    }

    /// Create a new inferrer with custom configuration
    pub fn with_config(
        name: &str,
        doc: Option<&str>,
        namespace: Option<&str>,
        config: InferenceConfig,
    ) -> Self {
        Self {
            config,
            root_name: name.to_string(),
            root_doc: doc.map(str::to_string),
            root_namespace: namespace.map(str::to_string),
            current: None,
            record_count: 0,
            skipped_count: 0,
        }
    }

    /// Add a single JSON string as an example
    ///
    /// Text that is not valid JSON is skipped and counted in
    /// [`InferenceStats::records_skipped`].
    pub fn add_json(&mut self, json: &str) -> Result<(), InferenceError> {
        if self.sample_limit_reached() {
            return Ok(());
        }

        let value: Value = match serde_json::from_str(json) {
            Ok(v) => v,
            Err(e) => {
                debug!(error = %e, "Skipping example that is not valid JSON");
                self.skipped_count += 1;
                return Ok(());
            }
        };

        self.add_example(&value)
    }

    /// Add a parsed JSON document as an example
    ///
    /// A document the classifier rejects leaves the accumulated type untouched.
    pub fn add_example(&mut self, document: &Value) -> Result<(), InferenceError> {
        if self.sample_limit_reached() {
            return Ok(());
        }

        let example = build_type_with(document, &self.root_name, &self.config)?;
        let widened = match self.current.take() {
            Some(current) => current.widen(&example),
            None => example,
        };
        trace!(record = self.record_count, shape = %widened, "Widened example");

        self.current = Some(widened);
        self.record_count += 1;
        Ok(())
    }

    /// Add a batch of JSON strings
    pub fn add_json_batch(&mut self, records: &[String]) -> Result<(), InferenceError> {
        for json in records {
            self.add_json(json)?;
        }
        Ok(())
    }

    /// Materialize the accumulated type into an Avro schema
    pub fn generate_schema(&self) -> Result<Schema, InferenceError> {
        let current = self.current.as_ref().ok_or(InferenceError::NoRecords)?;

        let schema = Materializer::new()
            .with_docs(self.config.collect_docs)
            .materialize(
                current,
                Some(self.root_name.as_str()),
                self.root_doc.as_deref(),
                self.root_namespace.as_deref(),
            )?;
        Ok(schema)
    }

    /// The accumulated type, if any example was added
    pub fn current_type(&self) -> Option<&TypeNode> {
        self.current.as_ref()
    }

    /// Get current inference statistics
    pub fn stats(&self) -> InferenceStats {
        InferenceStats {
            records_processed: self.record_count,
            records_skipped: self.skipped_count,
            fields_discovered: self.current.as_ref().map_or(0, TypeNode::field_count),
            max_depth: self.current.as_ref().map_or(0, TypeNode::depth),
        }
    }

    /// Get the number of examples merged so far
    pub fn record_count(&self) -> usize {
        self.record_count
    }

    pub fn config(&self) -> &InferenceConfig {
        &self.config
    }

    fn sample_limit_reached(&self) -> bool {
        self.config.sample_size > 0 && self.record_count >= self.config.sample_size
    }
}
