//! Projection of JSON documents onto Avro schemas
//!
//! [`project`] walks a document guided by a target [`Schema`] and produces an
//! [`apache_avro::types::Value`]. Unions are resolved by picking the first
//! alternative whose kind is compatible with the document value.
//!
//! ```rust
//! use avro_schema_inference::projection::{Value, project, record_field};
//! use avro_schema_inference::schema::parse_schema;
//! use serde_json::json;
//!
//! let schema = parse_schema(r#"{"type": "record", "name": "Row", "fields": [
//!     {"name": "id", "type": "long"},
//!     {"name": "note", "type": ["null", "string"], "default": null}
//! ]}"#)?;
//!
//! let value = project(&json!({"id": 42}), &schema)?;
//! assert!(value.validate(&schema));
//! assert_eq!(record_field(&value, "id"), Some(&Value::Long(42)));
//! assert_eq!(
//!     record_field(&value, "note"),
//!     Some(&Value::Union(0, Box::new(Value::Null)))
//! );
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
mod value;

use std::collections::HashMap;

use apache_avro::Decimal;
use apache_avro::schema::{DecimalSchema, RecordSchema, UnionSchema};
use bigdecimal::BigDecimal;
use num_traits::{Signed, ToPrimitive};
use serde_json::{Map, Value as Json};
use tracing::debug;

pub use apache_avro::types::Value;
pub use error::ProjectionError;
pub use value::{record_field, to_json};

use crate::inference::{normalize_field_name, number_to_decimal};
use crate::schema::Schema;

/// Project `document` onto `schema`
///
/// A `null` document projects to the `null` branch of a union, or to
/// [`Value::Null`] for any other schema. When no alternative of a union
/// matches the document the result is also `null`.
pub fn project(document: &Json, schema: &Schema) -> Result<Value, ProjectionError> {
    Projector::new(schema).project(document, schema)
}

/// Project a JSON object onto a record schema
///
/// Keys are matched against field names exactly, falling back to the
/// normalized key used by inference. Fields missing from the object take
/// their default value.
pub fn project_record(
    object: &Map<String, Json>,
    schema: &RecordSchema,
) -> Result<Value, ProjectionError> {
    let mut projector = Projector::default();
    for field in &schema.fields {
        projector.collect_names(&field.schema);
    }
    projector.project_record(object, schema)
}

/// Named types of a schema, for resolving references by full name
#[derive(Default)]
struct Projector<'s> {
    names: HashMap<String, &'s Schema>,
}

impl<'s> Projector<'s> {
    fn new(schema: &'s Schema) -> Self {
        let mut projector = Self::default();
        projector.collect_names(schema);
        projector
    }

    fn collect_names(&mut self, schema: &'s Schema) {
        match schema {
            Schema::Record(record) => {
                self.names.insert(record.name.fullname(None), schema);
                for field in &record.fields {
                    self.collect_names(&field.schema);
                }
            }
            Schema::Enum(enum_schema) => {
                self.names.insert(enum_schema.name.fullname(None), schema);
            }
            Schema::Fixed(fixed) => {
                self.names.insert(fixed.name.fullname(None), schema);
            }
            Schema::Decimal(decimal) => self.collect_names(&decimal.inner),
            Schema::Array(array) => self.collect_names(&array.items),
            Schema::Map(map) => self.collect_names(&map.types),
            Schema::Union(union) => {
                for variant in union.variants() {
                    self.collect_names(variant);
                }
            }
            _ => {}
        }
    }

    /// Follow a named type reference to its definition
    fn resolve(&self, schema: &'s Schema) -> Result<&'s Schema, ProjectionError> {
        match schema {
            Schema::Ref { name } => {
                let full_name = name.fullname(None);
                self.names.get(&full_name).copied().ok_or_else(|| {
                    ProjectionError::UnsupportedShape(format!("unknown named type {}", full_name))
                })
            }
            other => Ok(other),
        }
    }

    fn project(&self, document: &Json, schema: &'s Schema) -> Result<Value, ProjectionError> {
        let schema = self.resolve(schema)?;

        match schema {
            Schema::Union(union) => self.project_union(document, union),
            _ if document.is_null() => Ok(Value::Null),
            Schema::Null => Err(ProjectionError::mismatch("null", json_kind(document))),
            Schema::Boolean => match document {
                Json::Bool(b) => Ok(Value::Boolean(*b)),
                other => Err(ProjectionError::mismatch("boolean", json_kind(other))),
            },
            Schema::String => match document {
                Json::String(s) => Ok(Value::String(s.clone())),
                other => Err(ProjectionError::mismatch("string", json_kind(other))),
            },
            Schema::Enum(schema) => match document {
                Json::String(s) => schema
                    .symbols
                    .iter()
                    .position(|symbol| symbol == s)
                    .map(|index| Value::Enum(index as u32, s.clone()))
                    .ok_or_else(|| {
                        ProjectionError::mismatch(
                            format!("a symbol of enum {}", schema.name.name),
                            s.clone(),
                        )
                    }),
                other => Err(ProjectionError::mismatch(
                    format!("enum {}", schema.name.name),
                    json_kind(other),
                )),
            },
            Schema::Int
            | Schema::Long
            | Schema::Float
            | Schema::Double
            | Schema::Date
            | Schema::TimeMillis
            | Schema::TimeMicros
            | Schema::TimestampMillis
            | Schema::TimestampMicros => project_number(document, schema),
            Schema::Decimal(decimal) => {
                project_decimal(document, decimal, self.resolve(&decimal.inner)?)
            }
            Schema::Array(array) => match document {
                Json::Array(elements) => elements
                    .iter()
                    .filter(|element| !is_empty_object(element))
                    .map(|element| self.project(element, &array.items))
                    .collect::<Result<Vec<_>, _>>()
                    .map(Value::Array),
                other => Err(ProjectionError::mismatch("array", json_kind(other))),
            },
            Schema::Map(map) => match document {
                Json::Object(object) => object
                    .iter()
                    .map(|(key, item)| Ok((key.clone(), self.project(item, &map.types)?)))
                    .collect::<Result<HashMap<_, _>, ProjectionError>>()
                    .map(Value::Map),
                other => Err(ProjectionError::mismatch("map", json_kind(other))),
            },
            Schema::Record(record) => match document {
                Json::Object(object) => self.project_record(object, record),
                other => Err(ProjectionError::mismatch(
                    format!("record {}", record.name.name),
                    json_kind(other),
                )),
            },
            Schema::Bytes | Schema::Fixed(_) => Err(ProjectionError::UnsupportedShape(format!(
                "{} without a decimal logical type",
                schema_kind(schema)
            ))),
            other => Err(ProjectionError::UnsupportedShape(format!(
                "{} values",
                schema_kind(other)
            ))),
        }
    }

    fn project_union(
        &self,
        document: &Json,
        union: &'s UnionSchema,
    ) -> Result<Value, ProjectionError> {
        let mut fallback = None;
        for (index, variant) in union.variants().iter().enumerate() {
            let variant = self.resolve(variant)?;
            if matches!(variant, Schema::Null) {
                fallback = Some(index);
            }
            if is_compatible(document, variant) {
                return Ok(Value::Union(
                    index as u32,
                    Box::new(self.project(document, variant)?),
                ));
            }
        }

        debug!(
            found = json_kind(document),
            alternatives = union.variants().len(),
            "No union alternative matches, projecting to null"
        );
        Ok(match fallback {
            Some(index) => Value::Union(index as u32, Box::new(Value::Null)),
            None => Value::Null,
        })
    }

    fn project_record(
        &self,
        object: &Map<String, Json>,
        schema: &'s RecordSchema,
    ) -> Result<Value, ProjectionError> {
        let mut values: Vec<Option<Value>> = vec![None; schema.fields.len()];

        for (key, document) in object {
            let position = field_position(schema, key).ok_or_else(|| {
                ProjectionError::MissingField {
                    field: key.clone(),
                    record: schema.name.name.clone(),
                }
            })?;

            values[position] = Some(self.project(document, &schema.fields[position].schema)?);
        }

        let fields = schema
            .fields
            .iter()
            .zip(values)
            .map(|(field, value)| {
                let value = match (value, &field.default) {
                    (Some(value), _) => value,
                    (None, Some(default)) => self.project(default, &field.schema)?,
                    (None, None) => {
                        return Err(ProjectionError::MissingValue {
                            field: field.name.clone(),
                            record: schema.name.name.clone(),
                        });
                    }
                };
                Ok((field.name.clone(), value))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Value::Record(fields))
    }
}

/// Position of the field a document key maps to
fn field_position(schema: &RecordSchema, key: &str) -> Option<usize> {
    let by_name = |name: &str| {
        schema
            .lookup
            .get(name)
            .copied()
            .or_else(|| schema.fields.iter().position(|field| field.name == name))
    };
    by_name(key).or_else(|| by_name(&normalize_field_name(key)))
}

fn project_number(document: &Json, schema: &Schema) -> Result<Value, ProjectionError> {
    let Json::Number(number) = document else {
        return Err(ProjectionError::mismatch(schema_kind(schema), json_kind(document)));
    };
    let decimal = to_decimal(number)?;
    let out_of_range =
        || ProjectionError::mismatch(schema_kind(schema), format!("number {}", number));
    // Fractions are truncated toward zero
    let int = || decimal.with_scale(0).to_i32().ok_or_else(out_of_range);
    let long = || decimal.with_scale(0).to_i64().ok_or_else(out_of_range);

    match schema {
        Schema::Int => int().map(Value::Int),
        Schema::Date => int().map(Value::Date),
        Schema::TimeMillis => int().map(Value::TimeMillis),
        Schema::Long => long().map(Value::Long),
        Schema::TimeMicros => long().map(Value::TimeMicros),
        Schema::TimestampMillis => long().map(Value::TimestampMillis),
        Schema::TimestampMicros => long().map(Value::TimestampMicros),
        Schema::Float => decimal
            .to_f32()
            .filter(|f| f.is_finite())
            .map(Value::Float)
            .ok_or_else(out_of_range),
        _ => decimal
            .to_f64()
            .filter(|f| f.is_finite())
            .map(Value::Double)
            .ok_or_else(out_of_range),
    }
}

/// Rescale to the decimal's scale and encode the unscaled value
///
/// The unscaled value is written as big-endian two's complement; a `fixed`
/// representation is sign-extended to its size.
fn project_decimal(
    document: &Json,
    schema: &DecimalSchema,
    inner: &Schema,
) -> Result<Value, ProjectionError> {
    let Json::Number(number) = document else {
        return Err(ProjectionError::mismatch("decimal", json_kind(document)));
    };
    let decimal = to_decimal(number)?;

    let rescaled = decimal.with_scale(schema.scale as i64);
    if rescaled != decimal {
        return Err(ProjectionError::LossyDecimal {
            value: number.to_string(),
            scale: schema.scale,
        });
    }

    let (unscaled, _) = rescaled.as_bigint_and_exponent();
    if unscaled.abs().to_string().len() > schema.precision {
        return Err(ProjectionError::PrecisionExceeded {
            value: number.to_string(),
            precision: schema.precision,
        });
    }
    let bytes = unscaled.to_signed_bytes_be();

    match inner {
        Schema::Fixed(fixed) => {
            if bytes.len() > fixed.size {
                return Err(ProjectionError::mismatch(
                    format!("fixed {} of {} bytes", fixed.name.name, fixed.size),
                    format!("number {}", number),
                ));
            }
            let fill = if unscaled.is_negative() { 0xff } else { 0x00 };
            let mut padded = vec![fill; fixed.size - bytes.len()];
            padded.extend(bytes);
            Ok(Value::Decimal(Decimal::from(padded)))
        }
        _ => Ok(Value::Decimal(Decimal::from(bytes))),
    }
}

fn to_decimal(number: &serde_json::Number) -> Result<BigDecimal, ProjectionError> {
    number_to_decimal(number).map_err(|e| ProjectionError::UnsupportedShape(e.to_string()))
}

/// Whether a union alternative can hold the document value
fn is_compatible(document: &Json, schema: &Schema) -> bool {
    match document {
        Json::Null => matches!(schema, Schema::Null),
        Json::Bool(_) => matches!(schema, Schema::Boolean),
        Json::String(_) => matches!(schema, Schema::String | Schema::Enum(_)),
        Json::Number(_) => matches!(
            schema,
            Schema::Int
                | Schema::Long
                | Schema::Float
                | Schema::Double
                | Schema::Bytes
                | Schema::Fixed(_)
                | Schema::Decimal(_)
                | Schema::Date
                | Schema::TimeMillis
                | Schema::TimeMicros
                | Schema::TimestampMillis
                | Schema::TimestampMicros
        ),
        Json::Array(_) => matches!(schema, Schema::Array(_)),
        Json::Object(_) => matches!(schema, Schema::Record(_) | Schema::Map(_)),
    }
}

fn is_empty_object(document: &Json) -> bool {
    matches!(document, Json::Object(map) if map.is_empty())
}

fn json_kind(document: &Json) -> &'static str {
    match document {
        Json::Null => "null",
        Json::Bool(_) => "boolean",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}

fn schema_kind(schema: &Schema) -> String {
    match schema {
        Schema::Decimal(_) => "decimal".to_string(),
        other => format!("{:?}", apache_avro::schema::SchemaKind::from(other)).to_lowercase(),
    }
}
