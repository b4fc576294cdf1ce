//! Configuration for schema inference

use serde::{Deserialize, Serialize};

/// How non-integral number literals are classified
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum FractionalNumbers {
    /// Fixed-point decimal with the literal's scale and precision
    #[default]
    Decimal,
    /// Binary floating point (`double`)
    Double,
}

/// Configuration for schema inference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InferenceConfig {
    /// Maximum number of examples to merge (0 = all)
    pub sample_size: usize,

    /// Maximum nesting depth for documents
    pub max_depth: usize,

    /// Classification of literals such as `5.5` or `1e-3`
    pub fractional_numbers: FractionalNumbers,

    /// Generate sample based documentation for record fields
    pub collect_docs: bool,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            sample_size: 0, // All examples
            max_depth: 64,
            fractional_numbers: FractionalNumbers::Decimal,
            collect_docs: true,
        }
    }
}

impl InferenceConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder for custom configuration
    pub fn builder() -> InferenceConfigBuilder {
        InferenceConfigBuilder::default()
    }
}

/// Builder for InferenceConfig
#[derive(Debug, Default)]
pub struct InferenceConfigBuilder {
    config: InferenceConfig,
}

impl InferenceConfigBuilder {
    /// Set the sample size (0 = all examples)
    pub fn sample_size(mut self, size: usize) -> Self {
        self.config.sample_size = size;
        self
    }

    /// Set the maximum nesting depth
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.config.max_depth = depth.max(1);
        self
    }

    /// Choose how non-integral numbers are typed
    pub fn fractional_numbers(mut self, mode: FractionalNumbers) -> Self {
        self.config.fractional_numbers = mode;
        self
    }

    /// Enable or disable field documentation
    pub fn collect_docs(mut self, collect: bool) -> Self {
        self.config.collect_docs = collect;
        self
    }

    /// Build the configuration
    pub fn build(self) -> InferenceConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = InferenceConfig::default();
        assert_eq!(config.sample_size, 0);
        assert_eq!(config.max_depth, 64);
        assert_eq!(config.fractional_numbers, FractionalNumbers::Decimal);
        assert!(config.collect_docs);
    }

    #[test]
    fn test_builder() {
        let config = InferenceConfig::builder()
            .sample_size(1000)
            .max_depth(5)
            .fractional_numbers(FractionalNumbers::Double)
            .collect_docs(false)
            .build();

        assert_eq!(config.sample_size, 1000);
        assert_eq!(config.max_depth, 5);
        assert_eq!(config.fractional_numbers, FractionalNumbers::Double);
        assert!(!config.collect_docs);
    }

    #[test]
    fn test_max_depth_floor() {
        let config = InferenceConfig::builder().max_depth(0).build();
        assert_eq!(config.max_depth, 1);
    }

    #[test]
    fn test_serde_camel_case() {
        let json = serde_json::to_value(InferenceConfig::default()).unwrap();
        assert_eq!(json["fractionalNumbers"], "decimal");
        assert_eq!(json["maxDepth"], 64);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: InferenceConfig = serde_json::from_str(r#"{"sampleSize": 10}"#).unwrap();
        assert_eq!(config.sample_size, 10);
        assert_eq!(config.max_depth, 64);
        assert!(config.collect_docs);
    }
}
