//! Schema inference tests

use avro_schema_inference::inference::{
    FractionalNumbers, InferenceConfig, SAMPLER_CAPACITY, SchemaInferrer, TypeNode, build_type,
    normalize_field_name, widen,
};
use avro_schema_inference::schema::{Schema, parse_schema, to_json, to_string_pretty};
use serde_json::{Value, json};

fn infer(documents: &[Value]) -> TypeNode {
    let mut inferrer = SchemaInferrer::new("Root", None, None);
    for document in documents {
        inferrer.add_example(document).unwrap();
    }
    inferrer.current_type().cloned().unwrap()
}

mod widening_tests {
    use super::*;

    #[test]
    fn test_optional_fields() {
        let merged = infer(&[json!({"a": 1}), json!({"b": 2})]);
        assert_eq!(
            merged.to_string(),
            "Root { a: union[null, int], b: union[null, int] }"
        );
    }

    #[test]
    fn test_end_to_end_decimal_default() {
        let merged = infer(&[json!({"x": 5}), json!({"x": 5.5}), json!({"x": null})]);
        assert_eq!(merged.to_string(), "Root { x: union[null, decimal(11, 1)] }");
    }

    #[test]
    fn test_int_and_long_promote() {
        let merged = infer(&[json!({"n": 1}), json!({"n": 10_000_000_000i64})]);
        assert_eq!(merged.to_string(), "Root { n: long }");
    }

    #[test]
    fn test_many_nulls_fold_into_one_alternative() {
        let mut documents = vec![json!({"v": "text"})];
        documents.extend((0..10).map(|_| json!({"v": null})));
        let merged = infer(&documents);
        assert_eq!(merged.to_string(), "Root { v: union[null, string] }");
    }

    #[test]
    fn test_nested_records_and_arrays() {
        let merged = infer(&[
            json!({"user": {"id": 1, "tags": ["a"]}}),
            json!({"user": {"id": 2, "tags": []}}),
            json!({"user": {"id": 3, "tags": [], "active": true}}),
        ]);
        assert_eq!(
            merged.to_string(),
            "Root { user: user { active: union[null, boolean], id: int, tags: array<string> } }"
        );
    }

    #[test]
    fn test_both_empty_arrays_stay_unknown() {
        let merged = infer(&[json!({"a": []}), json!({"a": []})]);
        assert_eq!(merged.to_string(), "Root { a: array<?> }");
    }

    #[test]
    fn test_widening_is_order_independent() {
        let documents = [
            json!({"a": 1, "b": "x"}),
            json!({"a": 2.25, "c": [1, 2]}),
            json!({"a": null, "b": true}),
            json!({"c": [], "d": {"e": 1}}),
        ];
        let types: Vec<TypeNode> = documents
            .iter()
            .map(|d| build_type(d, "Root").unwrap())
            .collect();

        let forward = types.iter().skip(1).fold(types[0].clone(), |acc, t| widen(&acc, t));
        let backward = types
            .iter()
            .rev()
            .skip(1)
            .fold(types[3].clone(), |acc, t| widen(t, &acc));
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_sampler_capacity_is_respected() {
        let documents: Vec<Value> = (0..50).map(|i| json!({"n": i % 17})).collect();
        match infer(&documents) {
            TypeNode::Record { fields, .. } => match &fields["n"] {
                TypeNode::Int(samples) => {
                    assert!(samples.len() <= SAMPLER_CAPACITY);
                    assert_eq!(samples.total(), 50);
                }
                other => panic!("Expected int, got {}", other),
            },
            other => panic!("Expected record, got {}", other),
        }
    }

    #[test]
    fn test_frequent_late_value_displaces_early_ones() {
        let mut documents: Vec<Value> = ["a", "b", "c", "d", "e"]
            .iter()
            .map(|v| json!({ "s": v }))
            .collect();
        documents.extend((0..1000).map(|_| json!({"s": "f"})));

        match infer(&documents) {
            TypeNode::Record { fields, .. } => match &fields["s"] {
                TypeNode::String(samples) => {
                    assert_eq!(samples.sorted_entries()[0], (1000, "f".to_string()));
                }
                other => panic!("Expected string, got {}", other),
            },
            other => panic!("Expected record, got {}", other),
        }
    }

    #[test]
    fn test_absurd_exponent_is_rejected() {
        let mut inferrer = SchemaInferrer::new("Root", None, None);
        assert!(inferrer.add_json(r#"{"x": 1e2000000}"#).is_err());
        assert_eq!(inferrer.record_count(), 0);
    }
}

mod field_name_tests {
    use super::*;

    #[test]
    fn test_normalization() {
        assert_eq!(normalize_field_name("first-name"), "first_name");
        assert_eq!(normalize_field_name("café"), "cafe");
        assert_eq!(normalize_field_name("a.b c"), "abc");
        assert_eq!(normalize_field_name("ok_123"), "ok_123");
    }

    #[test]
    fn test_normalized_keys_in_schema() {
        let merged = infer(&[json!({"zip-code": "123", "straße": "x"})]);
        assert_eq!(merged.to_string(), "Root { strae: string, zip_code: string }");
    }
}

mod schema_generation_tests {
    use super::*;

    #[test]
    fn test_generated_schema_json() {
        let mut inferrer = SchemaInferrer::new("Person", Some("A person"), Some("com.example"));
        inferrer
            .add_json(r#"{"name": "Alice", "address": {"city": "Oslo"}, "score": 1.25}"#)
            .unwrap();
        inferrer.add_json(r#"{"name": "Bob", "address": {"city": "Bergen"}}"#).unwrap();

        let json = to_json(&inferrer.generate_schema().unwrap()).unwrap();
        assert_eq!(json["type"], "record");
        assert_eq!(json["name"], "Person");
        assert_eq!(json["namespace"], "com.example");
        assert_eq!(json["doc"], "A person");

        let fields = json["fields"].as_array().unwrap();
        let names: Vec<&str> = fields.iter().map(|f| f["name"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["address", "name", "score"]);

        assert_eq!(fields[0]["type"]["type"], "record");
        assert_eq!(fields[0]["type"]["namespace"], "com.example.Person");
        assert_eq!(fields[0]["doc"], "Always this value: Record");

        assert_eq!(fields[1]["doc"], "(50.0%, 50.0%) All samples: 'Alice', 'Bob'");

        assert_eq!(fields[2]["type"][0], "null");
        assert_eq!(fields[2]["type"][1]["logicalType"], "decimal");
        assert_eq!(fields[2]["type"][1]["scale"], 2);
        assert_eq!(fields[2]["type"][1]["precision"], 3);
        assert!(fields[2]["default"].is_null());
    }

    #[test]
    fn test_generated_schema_parses_back() {
        let mut inferrer = SchemaInferrer::new("Event", None, Some("io.events"));
        inferrer
            .add_json(r#"{"id": 1, "items": [{"sku": "a", "qty": 2}], "meta": {"source": "web"}}"#)
            .unwrap();
        inferrer.add_json(r#"{"id": 2, "items": []}"#).unwrap();

        let schema = inferrer.generate_schema().unwrap();
        let parsed = parse_schema(&to_string_pretty(&schema).unwrap()).unwrap();
        assert_eq!(parsed, schema);
        assert!(matches!(parsed, Schema::Record(_)));
    }

    #[test]
    fn test_double_mode_schema() {
        let config = InferenceConfig::builder()
            .fractional_numbers(FractionalNumbers::Double)
            .collect_docs(false)
            .build();
        let mut inferrer = SchemaInferrer::with_config("Root", None, None, config);
        inferrer.add_json(r#"{"x": 5}"#).unwrap();
        inferrer.add_json(r#"{"x": 5.5}"#).unwrap();

        let json = to_json(&inferrer.generate_schema().unwrap()).unwrap();
        assert_eq!(json["fields"][0]["type"], "double");
        assert!(json["fields"][0].get("doc").is_none());
    }
}
