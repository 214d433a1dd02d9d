//! # Human-Readable Rendering
//!
//! Turns a [`CheckError`] tree into indented English sentences, one line per
//! node. Each nesting level adds two spaces of indentation; union
//! alternatives are marked with a `-  ` bullet instead.
//!
//! ```text
//! The key "users" of this object is invalid:
//!   The array element #1 doesn't match the specified type:
//!     The value x isn't assignable to type Number
//! ```

use gatekeep_core::{CheckError, Descriptor, Value};

const NEST: &str = "  ";
const BULLET: &str = "-  ";

/// Render an error tree as multi-line text.
pub fn render(error: &CheckError) -> String {
    let mut out = String::new();
    render_into(&mut out, error, "");
    out
}

fn render_into(out: &mut String, error: &CheckError, indent: &str) {
    out.push_str(indent);
    match error {
        CheckError::ArrayError { error, index } => {
            out.push_str(&format!(
                "The array element #{index} doesn't match the specified type:\n"
            ));
            render_into(out, error, &format!("{indent}{NEST}"));
        }
        CheckError::CheckerFailed { result } => {
            out.push_str(&format!("Checker function failed: {result}"));
        }
        CheckError::IncorrectType { expected, got } => match expected.tag_name() {
            Some(tag) => out.push_str(&format!("The value {got} isn't assignable to type {tag}")),
            None => out.push_str(&format!(
                "The value {got} doesn't match {}",
                type_label(expected)
            )),
        },
        CheckError::IncorrectValue { expected, got } => {
            out.push_str(&format!("The value {got} isn't {expected}"));
        }
        CheckError::ObjectError { error, key } => {
            out.push_str(&format!("The key \"{key}\" of this object is invalid:\n"));
            render_into(out, error, &format!("{indent}{NEST}"));
        }
        CheckError::ObjectIllegalExtraKey { key } => {
            out.push_str(&format!("This object has an extra key \"{key}\""));
        }
        CheckError::ObjectRequiredKeyMissing { key } => {
            out.push_str(&format!(
                "The required key \"{key}\" is missing from this object"
            ));
        }
        CheckError::RecordError { error, key } => {
            out.push_str(&format!(
                "The key \"{key}\" doesn't match the Record type:\n"
            ));
            render_into(out, error, &format!("{indent}{NEST}"));
        }
        CheckError::UnionNoMatch { errors } => {
            out.push_str("The value isn't assignable to any of the union types:\n");
            let bullet = format!("{indent}{BULLET}");
            for (i, alternative) in errors.iter().enumerate() {
                if i > 0 {
                    out.push('\n');
                }
                render_into(out, alternative, &bullet);
            }
        }
    }
}

/// Short label for a descriptor: `<Tag>` for tagged descriptors, compact
/// JSON of the payload for untagged ones, with nested descriptors of a shape
/// replaced by their own labels.
pub fn type_label(descriptor: &Descriptor) -> String {
    if let Some(tag) = descriptor.tag_name() {
        return format!("<{tag}>");
    }
    match descriptor {
        Descriptor::Shape(shape) if shape.is_array_like() => {
            let elements = shape
                .fields()
                .map(|(_, element)| serde_json::Value::String(type_label(element)))
                .collect();
            serde_json::Value::Array(elements).to_string()
        }
        Descriptor::Shape(shape) => {
            let fields: serde_json::Map<String, serde_json::Value> = shape
                .fields()
                .map(|(key, field)| (key.to_string(), serde_json::Value::String(type_label(field))))
                .collect();
            serde_json::Value::Object(fields).to_string()
        }
        Descriptor::Literal(value) => literal_json(value),
        _ => serde_json::Value::String("[Function]".to_string()).to_string(),
    }
}

fn literal_json(value: &Value) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| value.to_string())
}
