//! # JSON Rendering
//!
//! The wire form of errors and descriptors, built on the `Serialize` impls of
//! `gatekeep-core`:
//!
//! - error nodes: `{"e": <kind>, ...fields}`
//! - tagged descriptors: `{"t": <tag>}`
//! - untagged descriptors: `{"v": <payload>}`

use gatekeep_core::{CheckError, Descriptor};

/// Error tree as a JSON document.
pub fn error_to_json(error: &CheckError) -> Result<serde_json::Value, serde_json::Error> {
    serde_json::to_value(error)
}

/// Descriptor as a JSON document.
pub fn descriptor_to_json(descriptor: &Descriptor) -> Result<serde_json::Value, serde_json::Error> {
    serde_json::to_value(descriptor)
}

/// Error tree as pretty-printed JSON text.
pub fn error_to_string_pretty(error: &CheckError) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gatekeep_core::{Shape, Value};
    use serde_json::json;

    #[test]
    fn test_union_errors_keep_order() {
        let error = CheckError::UnionNoMatch {
            errors: vec![
                CheckError::IncorrectType {
                    expected: Descriptor::string(),
                    got: Value::from(1),
                },
                CheckError::ObjectIllegalExtraKey { key: "x".into() },
            ],
        };
        assert_eq!(
            error_to_json(&error).unwrap(),
            json!({
                "e": "UnionNoMatch",
                "errors": [
                    {"e": "IncorrectType", "expected": {"t": "String"}, "got": 1},
                    {"e": "ObjectIllegalExtraKey", "key": "x"}
                ]
            })
        );
    }

    #[test]
    fn test_record_and_literal_mismatch() {
        let descriptor = Descriptor::record_of(Descriptor::union([
            Descriptor::from("read"),
            Descriptor::from("write"),
        ]));
        let value = Value::object([("alice", Value::from("read")), ("bob", Value::from("admin"))]);
        let error = gatekeep_core::check(&descriptor, &value).unwrap_err();
        assert_eq!(
            error_to_json(&error).unwrap(),
            json!({
                "e": "RecordError",
                "key": "bob",
                "error": {
                    "e": "UnionNoMatch",
                    "errors": [
                        {"e": "IncorrectValue", "expected": "read", "got": "admin"},
                        {"e": "IncorrectValue", "expected": "write", "got": "admin"}
                    ]
                }
            })
        );
    }

    #[test]
    fn test_nested_shape_descriptor() {
        let descriptor = Descriptor::from(
            Shape::new()
                .field("inner", Shape::new().field("flag", Descriptor::boolean()))
                .field("list", Descriptor::array_of(Descriptor::number())),
        );
        assert_eq!(
            descriptor_to_json(&descriptor).unwrap(),
            json!({"v": {"inner": {"v": {"flag": {"t": "Boolean"}}}, "list": {"t": "Array"}}})
        );
    }

    #[test]
    fn test_pretty_output_starts_with_kind() {
        let error = CheckError::ObjectRequiredKeyMissing { key: "id".into() };
        let text = error_to_string_pretty(&error).unwrap();
        assert_eq!(text, "{\n  \"e\": \"ObjectRequiredKeyMissing\",\n  \"key\": \"id\"\n}");
    }
}
