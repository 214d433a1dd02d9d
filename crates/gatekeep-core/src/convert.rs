//! Ingestion of parsed JSON and YAML documents as runtime values.
//!
//! Document values carry no symbols, callables or boxed wrappers, so every
//! conversion lands in the plain subset of [`Value`]. Mapping order is kept.

use crate::error::ValueConversionError;
use crate::value::{format_number, Object, Value};

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Object(
                map.into_iter()
                    .map(|(key, item)| (key, Value::from(item)))
                    .collect(),
            ),
        }
    }
}

impl TryFrom<serde_yaml::Value> for Value {
    type Error = ValueConversionError;

    fn try_from(yaml: serde_yaml::Value) -> Result<Self, Self::Error> {
        match yaml {
            serde_yaml::Value::Null => Ok(Value::Null),
            serde_yaml::Value::Bool(b) => Ok(Value::Bool(b)),
            serde_yaml::Value::Number(n) => Ok(Value::Number(yaml_number(&n))),
            serde_yaml::Value::String(s) => Ok(Value::String(s)),
            serde_yaml::Value::Sequence(seq) => seq
                .into_iter()
                .map(Value::try_from)
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            serde_yaml::Value::Mapping(map) => {
                let mut object = Object::new();
                for (key, item) in map {
                    let key = match key {
                        serde_yaml::Value::String(s) => s,
                        // Host property keys are the string form of the scalar.
                        serde_yaml::Value::Number(n) => format_number(yaml_number(&n)),
                        serde_yaml::Value::Bool(b) => b.to_string(),
                        other => {
                            return Err(ValueConversionError::UnsupportedKey(format!("{other:?}")))
                        }
                    };
                    object.insert(key, Value::try_from(item)?);
                }
                Ok(Value::Object(object))
            }
            // Tags carry no meaning for matching.
            serde_yaml::Value::Tagged(tagged) => Value::try_from(tagged.value),
        }
    }
}

fn yaml_number(n: &serde_yaml::Number) -> f64 {
    n.as_f64().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_keeps_key_order() {
        let value = Value::from(json!({"z": 1, "a": [true, null, "x"], "m": {"k": 2.5}}));
        let Value::Object(map) = &value else {
            panic!("expected an object");
        };
        let keys: Vec<&str> = map.keys().collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
        assert_eq!(
            map.get("a"),
            Some(&Value::array([Value::Bool(true), Value::Null, Value::from("x")]))
        );
        assert_eq!(
            map.get("m"),
            Some(&Value::object([("k", Value::Number(2.5))]))
        );
    }

    #[test]
    fn test_json_large_object_ingests_every_key() {
        const KEYS: usize = 50_000;
        let map: serde_json::Map<String, serde_json::Value> = (0..KEYS)
            .map(|i| (format!("key{i}"), json!(i)))
            .collect();
        let value = Value::from(serde_json::Value::Object(map));
        let Value::Object(object) = &value else {
            panic!("expected an object");
        };
        assert_eq!(object.len(), KEYS);
        assert_eq!(object.get("key49999"), Some(&Value::from(49_999)));
        assert_eq!(object.keys().next(), Some("key0"));
        assert!(crate::check(&crate::Descriptor::record_of(crate::Descriptor::number()), &value).is_ok());
    }

    #[test]
    fn test_yaml_scalars_and_keys() {
        let yaml: serde_yaml::Value =
            serde_yaml::from_str("name: gate\n1: one\ntrue: yes\nratio: .nan\nlist: [1, 2]\n")
                .unwrap();
        let value = Value::try_from(yaml).unwrap();
        assert!(value.has_own("1"));
        assert!(value.has_own("true"));
        assert!(value.has_own("name"));
        let Value::Object(map) = &value else {
            panic!("expected an object");
        };
        assert!(matches!(map.get("ratio"), Some(Value::Number(n)) if n.is_nan()));
        assert_eq!(
            map.get("list"),
            Some(&Value::array([Value::from(1), Value::from(2)]))
        );
    }

    #[test]
    fn test_yaml_tags_are_ignored() {
        let yaml: serde_yaml::Value = serde_yaml::from_str("!custom 42").unwrap();
        assert_eq!(Value::try_from(yaml).unwrap(), Value::from(42));
    }

    #[test]
    fn test_yaml_rejects_composite_keys() {
        let yaml: serde_yaml::Value = serde_yaml::from_str("? [a, b]\n: 1\n").unwrap();
        let err = Value::try_from(yaml).unwrap_err();
        assert!(matches!(err, ValueConversionError::UnsupportedKey(_)));
        assert!(err.to_string().starts_with("unsupported YAML map key type"));
    }
}
