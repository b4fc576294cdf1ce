//! Avro schemas
//!
//! Schemas are [`apache_avro::Schema`] values. Inferred type trees become
//! schemas through [`materialize`], and hand-authored `.avsc` documents are
//! read with [`parse_schema`] so they can be used for projection.

mod error;
mod materialize;

pub use apache_avro::Schema;
pub use apache_avro::schema::{
    ArraySchema, DecimalSchema, EnumSchema, FixedSchema, Name, RecordField, RecordSchema,
    UnionSchema,
};
use serde_json::Value;

pub use error::{MaterializeError, SchemaParseError};
pub use materialize::{Materializer, describe, materialize};

/// Parse an Avro schema from JSON text
pub fn parse_schema(text: &str) -> Result<Schema, SchemaParseError> {
    Ok(Schema::parse_str(text)?)
}

/// Render a schema as Avro JSON, field docs included
pub fn to_json(schema: &Schema) -> Result<Value, serde_json::Error> {
    let mut json = serde_json::to_value(schema)?;
    write_field_docs(schema, &mut json);
    Ok(json)
}

/// Render a schema as indented Avro JSON
pub fn to_string_pretty(schema: &Schema) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&to_json(schema)?)
}

fn write_field_docs(schema: &Schema, json: &mut Value) {
    match schema {
        Schema::Record(record) => {
            let Some(fields) = json.get_mut("fields").and_then(Value::as_array_mut) else {
                return;
            };
            for (field, field_json) in record.fields.iter().zip(fields.iter_mut()) {
                if let (Some(doc), Some(object)) = (&field.doc, field_json.as_object_mut()) {
                    object.insert("doc".to_string(), Value::String(doc.clone()));
                }
                if let Some(field_type) = field_json.get_mut("type") {
                    write_field_docs(&field.schema, field_type);
                }
            }
        }
        Schema::Array(array) => {
            if let Some(items) = json.get_mut("items") {
                write_field_docs(&array.items, items);
            }
        }
        Schema::Map(map) => {
            if let Some(values) = json.get_mut("values") {
                write_field_docs(&map.types, values);
            }
        }
        Schema::Union(union) => {
            if let Some(variants) = json.as_array_mut() {
                for (variant, variant_json) in union.variants().iter().zip(variants.iter_mut()) {
                    write_field_docs(variant, variant_json);
                }
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fixed_decimal() {
        let schema = parse_schema(
            r#"{"type": "fixed", "name": "Money", "size": 8, "logicalType": "decimal", "precision": 12, "scale": 4}"#,
        )
        .unwrap();
        match schema {
            Schema::Decimal(decimal) => {
                assert_eq!(decimal.precision, 12);
                assert_eq!(decimal.scale, 4);
                assert!(matches!(*decimal.inner, Schema::Fixed(FixedSchema { size: 8, .. })));
            }
            other => panic!("Expected decimal, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(parse_schema("{"), Err(SchemaParseError::Avro(_))));
        assert!(parse_schema(r#""Missing""#).is_err());
        assert!(parse_schema(r#"{"type": "record", "fields": []}"#).is_err());
    }

    #[test]
    fn test_duplicate_names_are_rejected() {
        let text = r#"{"type": "record", "name": "Outer", "fields": [
            {"name": "a", "type": {"type": "record", "name": "Inner", "fields": []}},
            {"name": "b", "type": {"type": "record", "name": "Inner", "fields": [{"name": "x", "type": "int"}]}}
        ]}"#;
        assert!(parse_schema(text).is_err());
    }

    #[test]
    fn test_field_docs_are_written() {
        let mut schema = parse_schema(
            r#"{"type": "record", "name": "Outer", "fields": [
                {"name": "inner", "type": ["null", {"type": "record", "name": "Inner", "fields": [
                    {"name": "x", "type": "int"}
                ]}]}
            ]}"#,
        )
        .unwrap();
        if let Schema::Record(outer) = &mut schema {
            outer.fields[0].doc = Some("outer doc".to_string());
            if let Schema::Union(union) = &outer.fields[0].schema {
                let mut variants = union.variants().to_vec();
                if let Schema::Record(inner) = &mut variants[1] {
                    inner.fields[0].doc = Some("inner doc".to_string());
                }
                outer.fields[0].schema = Schema::Union(UnionSchema::new(variants).unwrap());
            }
        }

        let json = to_json(&schema).unwrap();
        assert_eq!(json["fields"][0]["doc"], "outer doc");
        assert_eq!(json["fields"][0]["type"][1]["fields"][0]["doc"], "inner doc");
    }

    #[test]
    fn test_pretty_output_parses_back() {
        let schema = parse_schema(
            r#"{"type": "record", "name": "User", "namespace": "com.example", "fields": [
                {"name": "id", "type": "long"},
                {"name": "nickname", "type": ["null", "string"], "default": null}
            ]}"#,
        )
        .unwrap();
        let text = to_string_pretty(&schema).unwrap();
        assert!(text.contains("\"namespace\": \"com.example\""));
        assert_eq!(parse_schema(&text).unwrap(), schema);
    }
}
