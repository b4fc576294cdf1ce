//! Helpers for projected values

use apache_avro::types::Value;
use serde_json::{Map, Number, Value as Json};

/// Value of a record field
pub fn record_field<'a>(value: &'a Value, name: &str) -> Option<&'a Value> {
    match value {
        Value::Record(fields) => fields.iter().find(|(n, _)| n == name).map(|(_, v)| v),
        _ => None,
    }
}

/// Render a projected value as plain JSON
///
/// Union branches are written without their type wrapper. Bytes and
/// decimals become strings with one code point per byte, and non-finite
/// floats become `null`.
pub fn to_json(value: &Value) -> Json {
    match value {
        Value::Null => Json::Null,
        Value::Boolean(b) => Json::Bool(*b),
        Value::Int(i) | Value::Date(i) | Value::TimeMillis(i) => Json::from(*i),
        Value::Long(l)
        | Value::TimeMicros(l)
        | Value::TimestampMillis(l)
        | Value::TimestampMicros(l) => Json::from(*l),
        Value::Float(f) => Number::from_f64(f64::from(*f)).map_or(Json::Null, Json::Number),
        Value::Double(d) => Number::from_f64(*d).map_or(Json::Null, Json::Number),
        Value::Bytes(bytes) | Value::Fixed(_, bytes) => bytes_to_json(bytes),
        Value::Decimal(decimal) => {
            Vec::<u8>::try_from(decimal).map_or(Json::Null, |bytes| bytes_to_json(&bytes))
        }
        Value::String(s) | Value::Enum(_, s) => Json::String(s.clone()),
        Value::Union(_, inner) => to_json(inner),
        Value::Array(items) => Json::Array(items.iter().map(to_json).collect()),
        Value::Map(entries) => Json::Object(
            entries
                .iter()
                .map(|(key, value)| (key.clone(), to_json(value)))
                .collect(),
        ),
        Value::Record(fields) => {
            let mut map = Map::new();
            for (name, value) in fields {
                map.insert(name.clone(), to_json(value));
            }
            Json::Object(map)
        }
        other => Json::try_from(other.clone()).unwrap_or(Json::Null),
    }
}

fn bytes_to_json(bytes: &[u8]) -> Json {
    Json::String(bytes.iter().map(|b| char::from(*b)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    use apache_avro::Decimal;
    use serde_json::json;

    #[test]
    fn test_to_json() {
        let value = Value::Record(vec![
            ("id".to_string(), Value::Long(7)),
            ("tags".to_string(), Value::Array(vec![Value::String("a".to_string())])),
            ("color".to_string(), Value::Enum(1, "RED".to_string())),
            ("raw".to_string(), Value::Bytes(vec![0x41, 0xff])),
            ("price".to_string(), Value::Decimal(Decimal::from(vec![0x00, 0x96]))),
            ("note".to_string(), Value::Union(1, Box::new(Value::String("x".to_string())))),
            ("missing".to_string(), Value::Union(0, Box::new(Value::Null))),
        ]);

        assert_eq!(
            to_json(&value),
            json!({
                "id": 7,
                "tags": ["a"],
                "color": "RED",
                "raw": "A\u{ff}",
                "price": "\u{0}\u{96}",
                "note": "x",
                "missing": null,
            })
        );
    }

    #[test]
    fn test_non_finite_double() {
        assert_eq!(to_json(&Value::Double(f64::NAN)), Json::Null);
    }

    #[test]
    fn test_field_lookup() {
        let value = Value::Record(vec![("a".to_string(), Value::Int(1))]);
        assert_eq!(record_field(&value, "a"), Some(&Value::Int(1)));
        assert_eq!(record_field(&value, "b"), None);
        assert_eq!(record_field(&Value::Null, "a"), None);
    }
}
