//! Type tree inferred from JSON documents

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use num_traits::{Signed, ToPrimitive};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Number, Value};
use unicode_normalization::UnicodeNormalization;

use super::config::{FractionalNumbers, InferenceConfig};
use super::error::InferenceError;
use super::sampler::Sampler;

static NON_FIELD_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9_]").unwrap());

/// Node kind, declared in widening rank order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TypeKind {
    Null,
    Boolean,
    Int,
    Long,
    Float,
    Double,
    Bytes,
    String,
    Record,
    Enum,
    Array,
    Union,
    Decimal,
}

impl TypeKind {
    /// Whether the kind belongs to the numeric promotion family
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            TypeKind::Int | TypeKind::Long | TypeKind::Float | TypeKind::Double | TypeKind::Decimal
        )
    }
}

/// Inferred type of a document node
///
/// Leaf kinds carry a [`Sampler`] of the values they were built from. Nodes
/// are never mutated once built; widening always produces a new tree.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeNode {
    Null {
        count: u64,
    },
    Boolean(Sampler<bool>),
    Int(Sampler<BigDecimal>),
    Long(Sampler<BigDecimal>),
    Float(Sampler<BigDecimal>),
    Double(Sampler<BigDecimal>),
    Bytes(Sampler<Vec<u8>>),
    String(Sampler<String>),
    Record {
        count: u64,
        name: String,
        fields: BTreeMap<String, TypeNode>,
    },
    /// Closed set of string symbols
    Enum {
        name: String,
        symbols: BTreeSet<String>,
        samples: Sampler<String>,
    },
    /// Array whose element type is unknown while every instance was empty
    Array(Option<Box<TypeNode>>),
    Union(Vec<TypeNode>),
    /// Fixed-point number; `scale` digits right of the point, `precision` digits in total
    Decimal {
        scale: u32,
        precision: u32,
        samples: Sampler<BigDecimal>,
    },
}

impl TypeNode {
    pub fn kind(&self) -> TypeKind {
        match self {
            TypeNode::Null { .. } => TypeKind::Null,
            TypeNode::Boolean(_) => TypeKind::Boolean,
            TypeNode::Int(_) => TypeKind::Int,
            TypeNode::Long(_) => TypeKind::Long,
            TypeNode::Float(_) => TypeKind::Float,
            TypeNode::Double(_) => TypeKind::Double,
            TypeNode::Bytes(_) => TypeKind::Bytes,
            TypeNode::String(_) => TypeKind::String,
            TypeNode::Record { .. } => TypeKind::Record,
            TypeNode::Enum { .. } => TypeKind::Enum,
            TypeNode::Array(_) => TypeKind::Array,
            TypeNode::Union(_) => TypeKind::Union,
            TypeNode::Decimal { .. } => TypeKind::Decimal,
        }
    }

    /// Name of a record or enum node
    pub fn name(&self) -> Option<&str> {
        match self {
            TypeNode::Record { name, .. } | TypeNode::Enum { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, TypeNode::Null { .. })
    }

    /// True for a union that has a `null` alternative
    pub fn is_nullable_union(&self) -> bool {
        match self {
            TypeNode::Union(alternatives) => alternatives.iter().any(TypeNode::is_null),
            _ => false,
        }
    }

    /// Observed values as `(count, text)` pairs, most frequent first
    ///
    /// Strings are quoted, records contribute their occurrence count and
    /// unions flatten the examples of every alternative.
    pub fn example_counts(&self) -> Vec<(u64, String)> {
        match self {
            TypeNode::Null { count } => vec![(*count, "null".to_string())],
            TypeNode::Boolean(samples) => samples.sorted_entries(),
            TypeNode::Int(samples)
            | TypeNode::Long(samples)
            | TypeNode::Float(samples)
            | TypeNode::Double(samples)
            | TypeNode::Decimal { samples, .. } => samples.sorted_entries(),
            TypeNode::Bytes(samples) => samples.sorted_entries(),
            TypeNode::String(samples) => samples
                .sorted_entries()
                .into_iter()
                .map(|(count, text)| (count, format!("'{}'", text)))
                .collect(),
            TypeNode::Record { count, .. } => vec![(*count, "Record".to_string())],
            TypeNode::Enum { samples, .. } => samples.sorted_entries(),
            TypeNode::Array(element) => element
                .as_deref()
                .map(TypeNode::example_counts)
                .unwrap_or_default(),
            TypeNode::Union(alternatives) => {
                let mut counts: Vec<(u64, String)> = alternatives
                    .iter()
                    .flat_map(TypeNode::example_counts)
                    .collect();
                counts.sort_by(|a, b| b.0.cmp(&a.0));
                counts
            }
        }
    }

    /// Number of record fields in the whole tree
    pub fn field_count(&self) -> usize {
        match self {
            TypeNode::Record { fields, .. } => fields
                .values()
                .map(|field| 1 + field.field_count())
                .sum(),
            TypeNode::Array(Some(element)) => element.field_count(),
            TypeNode::Union(alternatives) => alternatives.iter().map(TypeNode::field_count).sum(),
            _ => 0,
        }
    }

    /// Nesting depth of records and arrays
    pub fn depth(&self) -> usize {
        match self {
            TypeNode::Record { fields, .. } => {
                1 + fields.values().map(TypeNode::depth).max().unwrap_or(0)
            }
            TypeNode::Array(element) => 1 + element.as_deref().map(TypeNode::depth).unwrap_or(0),
            TypeNode::Union(alternatives) => {
                alternatives.iter().map(TypeNode::depth).max().unwrap_or(0)
            }
            _ => 0,
        }
    }
}

/// Renders the structure of a type, ignoring samples and counters
impl fmt::Display for TypeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeNode::Null { .. } => write!(f, "null"),
            TypeNode::Boolean(_) => write!(f, "boolean"),
            TypeNode::Int(_) => write!(f, "int"),
            TypeNode::Long(_) => write!(f, "long"),
            TypeNode::Float(_) => write!(f, "float"),
            TypeNode::Double(_) => write!(f, "double"),
            TypeNode::Bytes(_) => write!(f, "bytes"),
            TypeNode::String(_) => write!(f, "string"),
            TypeNode::Decimal {
                scale, precision, ..
            } => write!(f, "decimal({}, {})", precision, scale),
            TypeNode::Record { name, fields, .. } => {
                write!(f, "{} {{", name)?;
                for (i, (field, node)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, " {}: {}", field, node)?;
                }
                write!(f, " }}")
            }
            TypeNode::Enum { name, symbols, .. } => {
                let symbols: Vec<&str> = symbols.iter().map(String::as_str).collect();
                write!(f, "enum {}[{}]", name, symbols.join(", "))
            }
            TypeNode::Array(Some(element)) => write!(f, "array<{}>", element),
            TypeNode::Array(None) => write!(f, "array<?>"),
            TypeNode::Union(alternatives) => {
                let parts: Vec<String> = alternatives.iter().map(ToString::to_string).collect();
                write!(f, "union[{}]", parts.join(", "))
            }
        }
    }
}

/// Normalize a JSON key into a valid Avro field name
///
/// Hyphens become underscores, the key is decomposed (NFD) so accents split
/// off their base letter, and everything outside `[A-Za-z0-9_]` is dropped.
pub fn normalize_field_name(field_name: &str) -> String {
    let decomposed: String = field_name.replace('-', "_").nfd().collect();
    NON_FIELD_CHARS.replace_all(&decomposed, "").into_owned()
}

/// Build the type of `document` with the default configuration
pub fn build_type(document: &Value, field_name: &str) -> Result<TypeNode, InferenceError> {
    build_type_with(document, field_name, &InferenceConfig::default())
}

/// Build the type of `document`, naming records after `field_name`
pub fn build_type_with(
    document: &Value,
    field_name: &str,
    config: &InferenceConfig,
) -> Result<TypeNode, InferenceError> {
    build_node(document, field_name, config, 0)
}

fn build_node(
    document: &Value,
    field_name: &str,
    config: &InferenceConfig,
    depth: usize,
) -> Result<TypeNode, InferenceError> {
    if depth > config.max_depth {
        return Err(InferenceError::MaxDepthExceeded {
            depth,
            max: config.max_depth,
        });
    }

    match document {
        Value::Null => Ok(TypeNode::Null { count: 1 }),
        Value::Bool(b) => Ok(TypeNode::Boolean(Sampler::from_value(*b))),
        Value::String(s) => Ok(TypeNode::String(Sampler::from_value(s.clone()))),
        Value::Number(n) => classify_number(n, config.fractional_numbers),
        Value::Array(items) => {
            let mut element: Option<TypeNode> = None;
            for item in items {
                let item_type = build_node(item, field_name, config, depth + 1)?;
                element = Some(match element {
                    Some(acc) => acc.widen(&item_type),
                    None => item_type,
                });
            }
            Ok(TypeNode::Array(element.map(Box::new)))
        }
        Value::Object(map) => {
            let mut fields = BTreeMap::new();
            for (key, value) in map {
                let field_type = build_node(value, key, config, depth + 1)?;
                let normalized = normalize_field_name(key);
                // Keys that normalize to the same name share one field
                let merged = match fields.remove(&normalized) {
                    Some(existing) => field_type.widen(&existing),
                    None => field_type,
                };
                fields.insert(normalized, merged);
            }
            Ok(TypeNode::Record {
                count: 1,
                name: normalize_field_name(field_name),
                fields,
            })
        }
    }
}

/// Largest number of digits, integer part plus scale, a number literal may span
pub const MAX_NUMBER_DIGITS: i64 = 1000;

/// Parse a JSON number into an arbitrary precision decimal
///
/// Literals whose exponent would expand them beyond [`MAX_NUMBER_DIGITS`]
/// digits (e.g. `1e2000000`) are rejected before any rescaling happens.
pub(crate) fn number_to_decimal(number: &Number) -> Result<BigDecimal, InferenceError> {
    let literal = number.to_string();
    let unsupported = || InferenceError::UnsupportedShape(format!("number '{}'", literal));
    let decimal = BigDecimal::from_str(&literal).map_err(|_| unsupported())?;

    let (unscaled, exponent) = decimal.as_bigint_and_exponent();
    let digits = unscaled.abs().to_string().len() as i64;
    let integer_digits = digits.saturating_sub(exponent).max(0);
    if integer_digits.saturating_add(exponent.max(0)) > MAX_NUMBER_DIGITS {
        return Err(unsupported());
    }
    Ok(decimal)
}

fn classify_number(
    number: &Number,
    fractional: FractionalNumbers,
) -> Result<TypeNode, InferenceError> {
    let decimal = number_to_decimal(number)?;

    if decimal.with_scale(0) == decimal {
        if let Some(int) = decimal.to_i32() {
            return Ok(TypeNode::Int(Sampler::from_value(BigDecimal::from(int))));
        }
        if let Some(long) = decimal.to_i64() {
            return Ok(TypeNode::Long(Sampler::from_value(BigDecimal::from(long))));
        }
    } else if fractional == FractionalNumbers::Double {
        return Ok(TypeNode::Double(Sampler::from_value(decimal)));
    }

    let (scale, precision) = scale_and_precision(&decimal);
    Ok(TypeNode::Decimal {
        scale,
        precision,
        samples: Sampler::from_value(decimal),
    })
}

/// Scale and precision of a decimal, with negative scales expanded to zero
pub(crate) fn scale_and_precision(decimal: &BigDecimal) -> (u32, u32) {
    let (_, exponent) = decimal.as_bigint_and_exponent();
    let decimal = if exponent < 0 {
        decimal.with_scale(0)
    } else {
        decimal.clone()
    };

    let (unscaled, scale) = decimal.as_bigint_and_exponent();
    let scale = scale.max(0) as u32;
    let digits = unscaled.abs().to_string().len() as u32;
    // Avro requires precision >= scale, e.g. 0.001 is decimal(3, 3)
    (scale, digits.max(scale))
}
