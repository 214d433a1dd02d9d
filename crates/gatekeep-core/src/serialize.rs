//! Wire serialization of values, descriptors and checker results.
//!
//! Descriptors serialize as a single-entry map: `{"t": <tag>}` for tagged
//! kinds, `{"v": <payload>}` for untagged ones. Values serialize as plain
//! JSON-compatible data; anything without a JSON form (`undefined`, `NaN`,
//! infinities) becomes `null`.

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::descriptor::{Descriptor, Shape};
use crate::error::CheckerResult;
use crate::value::{Boxed, Value};

/// Largest magnitude below which every integral `f64` is exact.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

fn serialize_number<S: Serializer>(n: f64, serializer: S) -> Result<S::Ok, S::Error> {
    if !n.is_finite() {
        serializer.serialize_unit()
    } else if n.fract() == 0.0 && n.abs() < MAX_SAFE_INTEGER {
        serializer.serialize_i64(n as i64)
    } else {
        serializer.serialize_f64(n)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Undefined | Value::Null => serializer.serialize_unit(),
            Value::Bool(b) | Value::Boxed(Boxed::Bool(b)) => serializer.serialize_bool(*b),
            Value::Number(n) | Value::Boxed(Boxed::Number(n)) => serialize_number(*n, serializer),
            Value::String(s) | Value::Boxed(Boxed::String(s)) => serializer.serialize_str(s),
            Value::Symbol(sym) => serializer.collect_str(sym),
            Value::Function(func) => serializer.collect_str(&format_args!("[Function: {}]", func.name())),
            Value::Array(items) => serializer.collect_seq(items),
            Value::Object(map) => serializer.collect_map(map.iter()),
        }
    }
}

struct ShapeFields<'a>(&'a Shape);

impl Serialize for ShapeFields<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0.is_array_like() {
            serializer.collect_seq(self.0.fields().map(|(_, element)| element))
        } else {
            serializer.collect_map(self.0.fields())
        }
    }
}

impl Serialize for Descriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        match self {
            Descriptor::Predicate(_) => map.serialize_entry("v", "[Function]")?,
            Descriptor::Shape(shape) => map.serialize_entry("v", &ShapeFields(shape))?,
            Descriptor::Literal(value) => map.serialize_entry("v", value)?,
            tagged => map.serialize_entry("t", tagged.tag_name().unwrap_or_default())?,
        }
        map.end()
    }
}

impl Serialize for CheckerResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CheckerResult::False => serializer.serialize_bool(false),
            CheckerResult::Message(message) => serializer.serialize_str(message),
        }
    }
}
