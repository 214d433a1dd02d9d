//! # Descriptor Model
//!
//! A [`Descriptor`] describes the set of runtime values it accepts. The model
//! is a closed sum type with two families:
//!
//! - **Tagged descriptors** — `Void`, `Any`, `Nullish`, `Boolean`, the five
//!   primitive families with their checker forms, `ArrayOf`, `RecordOf`,
//!   `WithOptional` and `Union`. The variant itself is the discriminant, so
//!   ordinary data can never be mistaken for a tagged descriptor.
//! - **Untagged descriptors** — an inline [`Predicate`], a structural
//!   [`Shape`] (exact-shape object match), or a [`Literal`](Descriptor::Literal)
//!   matched by strict equality.
//!
//! ## Wildcard Key
//!
//! A `Shape` may declare a catch-all entry under [`WILDCARD`]. It applies to
//! every value key the shape does not declare by name and never takes part in
//! the required-key completeness check. The wildcard lives in its own slot,
//! so no string key can collide with it.

use std::fmt;
use std::sync::Arc;

use crate::error::{CheckerResult, DescriptorError};
use crate::value::{Function, PropertyMap, Symbol, Value};

/// Label used for the wildcard entry in synthetic error keys and listings.
pub const WILDCARD_LABEL: &str = "[DefaultKey]";

// ---------------------------------------------------------------------------
// Verdict / Predicate
// ---------------------------------------------------------------------------

/// Outcome of a user predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The value is accepted.
    Pass,
    /// The value is rejected without an explanation.
    Fail,
    /// The value is rejected with a message.
    Reason(String),
}

impl Verdict {
    /// Map the verdict onto the checker outcome recorded in errors.
    pub fn into_result(self) -> Result<(), CheckerResult> {
        match self {
            Self::Pass => Ok(()),
            Self::Fail => Err(CheckerResult::False),
            Self::Reason(message) => Err(CheckerResult::Message(message)),
        }
    }
}

impl From<bool> for Verdict {
    fn from(accepted: bool) -> Self {
        if accepted {
            Self::Pass
        } else {
            Self::Fail
        }
    }
}

/// Any string is a rejection, including the empty string.
impl From<String> for Verdict {
    fn from(message: String) -> Self {
        Self::Reason(message)
    }
}

impl From<&str> for Verdict {
    fn from(message: &str) -> Self {
        Self::Reason(message.to_string())
    }
}

impl From<Result<(), String>> for Verdict {
    fn from(result: Result<(), String>) -> Self {
        match result {
            Ok(()) => Self::Pass,
            Err(message) => Self::Reason(message),
        }
    }
}

/// Interpret the return value of a host callable: only `true` accepts, a
/// string rejects with that message, anything else rejects plainly.
impl From<Value> for Verdict {
    fn from(value: Value) -> Self {
        match value {
            Value::Bool(true) => Self::Pass,
            Value::String(message) => Self::Reason(message),
            _ => Self::Fail,
        }
    }
}

type PredicateFn = dyn Fn(&Value) -> Verdict + Send + Sync;

/// A user predicate over runtime values. Compared by identity.
#[derive(Clone)]
pub struct Predicate(Arc<PredicateFn>);

impl Predicate {
    pub fn new<F, R>(f: F) -> Self
    where
        F: Fn(&Value) -> R + Send + Sync + 'static,
        R: Into<Verdict>,
    {
        Self(Arc::new(move |value: &Value| -> Verdict { f(value).into() }))
    }

    pub fn evaluate(&self, value: &Value) -> Verdict {
        (self.0)(value)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Predicate(..)")
    }
}

impl PartialEq for Predicate {
    fn eq(&self, other: &Self) -> bool {
        Arc::as_ptr(&self.0) as *const u8 == Arc::as_ptr(&other.0) as *const u8
    }
}

/// A callable value used as a descriptor becomes an inline predicate.
impl From<Function> for Predicate {
    fn from(func: Function) -> Self {
        Self::new(move |value| func.call(value))
    }
}

// ---------------------------------------------------------------------------
// Family / Checker
// ---------------------------------------------------------------------------

/// Primitive family a checker verifies before running its predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    String,
    Number,
    Symbol,
    Function,
    Object,
}

impl Family {
    /// Whether `value` belongs to this family. Strings and numbers admit
    /// their boxed wrappers; `Object` admits any non-null object but not
    /// callables.
    pub fn admits(self, value: &Value) -> bool {
        match self {
            Self::String => value.as_str().is_some(),
            Self::Number => value.as_number().is_some(),
            Self::Symbol => matches!(value, Value::Symbol(_)),
            Self::Function => value.is_callable(),
            Self::Object => value.is_object(),
        }
    }

    /// Tag name of the bare descriptor of this family.
    pub fn tag_name(self) -> &'static str {
        match self {
            Self::String => "String",
            Self::Number => "Number",
            Self::Symbol => "Symbol",
            Self::Function => "Function",
            Self::Object => "Object",
        }
    }

    /// Tag name of the checker descriptor of this family.
    pub fn checker_tag_name(self) -> &'static str {
        match self {
            Self::String => "StringChecker",
            Self::Number => "NumberChecker",
            Self::Symbol => "SymbolChecker",
            Self::Function => "FunctionChecker",
            Self::Object => "ObjectChecker",
        }
    }
}

/// A predicate bound to the primitive family it expects.
#[derive(Debug, Clone, PartialEq)]
pub struct Checker {
    family: Family,
    predicate: Predicate,
}

impl Checker {
    pub fn family(&self) -> Family {
        self.family
    }

    pub fn predicate(&self) -> &Predicate {
        &self.predicate
    }
}

// ---------------------------------------------------------------------------
// Shape
// ---------------------------------------------------------------------------

/// Key of a structural shape entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ShapeKey {
    Named(String),
    Wildcard,
}

/// The catch-all key for undeclared properties.
pub const WILDCARD: ShapeKey = ShapeKey::Wildcard;

impl From<&str> for ShapeKey {
    fn from(key: &str) -> Self {
        Self::Named(key.to_string())
    }
}

impl From<String> for ShapeKey {
    fn from(key: String) -> Self {
        Self::Named(key)
    }
}

/// A structural mapping from keys to descriptors, plus an optional wildcard.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Shape {
    fields: PropertyMap<Descriptor>,
    wildcard: Option<Box<Descriptor>>,
    array_like: bool,
}

impl Shape {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn field(mut self, key: impl Into<ShapeKey>, descriptor: impl Into<Descriptor>) -> Self {
        self.insert(key, descriptor);
        self
    }

    /// Declare an entry, returning the descriptor it replaces.
    pub fn insert(
        &mut self,
        key: impl Into<ShapeKey>,
        descriptor: impl Into<Descriptor>,
    ) -> Option<Descriptor> {
        let descriptor = descriptor.into();
        self.array_like = false;
        match key.into() {
            ShapeKey::Named(name) => self.fields.insert(name, descriptor),
            ShapeKey::Wildcard => self.wildcard.replace(Box::new(descriptor)).map(|old| *old),
        }
    }

    /// Descriptor declared under a named key.
    pub fn get(&self, key: &str) -> Option<&Descriptor> {
        self.fields.get(key)
    }

    pub fn declares(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn wildcard(&self) -> Option<&Descriptor> {
        self.wildcard.as_deref()
    }

    pub fn has_wildcard(&self) -> bool {
        self.wildcard.is_some()
    }

    /// Whether the shape was normalized from an array literal. Its keys are
    /// then exactly the element indices, and the wire form is a sequence.
    /// Any later insert or merge turns it into a plain shape.
    pub fn is_array_like(&self) -> bool {
        self.array_like
    }

    fn from_elements<I: IntoIterator<Item = Descriptor>>(elements: I) -> Self {
        Self {
            fields: elements
                .into_iter()
                .enumerate()
                .map(|(index, element)| (index.to_string(), element))
                .collect(),
            wildcard: None,
            array_like: true,
        }
    }

    /// Named keys in enumeration order. The wildcard is never included.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.fields.keys()
    }

    /// Named entries in enumeration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Descriptor)> + '_ {
        self.fields.iter()
    }

    /// Number of named entries.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.wildcard.is_none()
    }

    /// Shallow merge where `other` wins on overlapping keys, the wildcard
    /// slot included.
    pub fn merge(mut self, other: Shape) -> Shape {
        let Shape {
            fields, wildcard, ..
        } = other;
        self.array_like = false;
        for (key, descriptor) in fields.into_entries() {
            self.fields.insert(key, descriptor);
        }
        if wildcard.is_some() {
            self.wildcard = wildcard;
        }
        self
    }
}

impl<K: Into<ShapeKey>> FromIterator<(K, Descriptor)> for Shape {
    fn from_iter<I: IntoIterator<Item = (K, Descriptor)>>(iter: I) -> Self {
        let mut shape = Shape::new();
        for (key, descriptor) in iter {
            shape.insert(key, descriptor);
        }
        shape
    }
}

/// Shallow right-biased merge of structural shapes.
///
/// A single shape is returned unchanged; no shapes give an empty shape.
pub fn join<I: IntoIterator<Item = Shape>>(shapes: I) -> Shape {
    let mut shapes = shapes.into_iter();
    let Some(first) = shapes.next() else {
        return Shape::new();
    };
    shapes.fold(first, Shape::merge)
}

/// The two key sets of an optional-object descriptor.
///
/// `optional` always contains every entry of `required`.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionalShape {
    required: Shape,
    optional: Shape,
}

impl OptionalShape {
    pub fn required(&self) -> &Shape {
        &self.required
    }

    pub fn optional(&self) -> &Shape {
        &self.optional
    }
}

// ---------------------------------------------------------------------------
// Descriptor
// ---------------------------------------------------------------------------

/// A declarative description of accepted runtime values.
#[derive(Debug, Clone, PartialEq)]
pub enum Descriptor {
    /// `undefined` or `null`.
    Void,
    /// Anything.
    Any,
    /// Any falsy value.
    Nullish,
    Boolean,
    String,
    Number,
    Symbol,
    Function,
    Object,
    /// A primitive family refined by a predicate.
    Checker(Checker),
    ArrayOf(Box<Descriptor>),
    RecordOf(Box<Descriptor>),
    WithOptional(OptionalShape),
    /// Ordered alternatives; the first match wins.
    Union(Vec<Descriptor>),
    /// Untagged inline predicate.
    Predicate(Predicate),
    /// Untagged exact-shape object match.
    Shape(Shape),
    /// Untagged literal, matched by strict equality.
    Literal(Value),
}

impl Descriptor {
    pub fn void() -> Self {
        Self::Void
    }

    pub fn any() -> Self {
        Self::Any
    }

    /// Accepts every falsy value, not only `null`/`undefined`.
    pub fn nullish() -> Self {
        Self::Nullish
    }

    pub fn boolean() -> Self {
        Self::Boolean
    }

    pub fn string() -> Self {
        Self::String
    }

    pub fn number() -> Self {
        Self::Number
    }

    pub fn symbol() -> Self {
        Self::Symbol
    }

    pub fn function() -> Self {
        Self::Function
    }

    pub fn object() -> Self {
        Self::Object
    }

    /// A string (primitive or boxed) accepted by `predicate`.
    pub fn string_of<F, R>(predicate: F) -> Self
    where
        F: Fn(&str) -> R + Send + Sync + 'static,
        R: Into<Verdict>,
    {
        Self::checker(Family::String, move |value| match value.as_str() {
            Some(s) => predicate(s).into(),
            None => Verdict::Fail,
        })
    }

    /// A number (primitive or boxed) accepted by `predicate`.
    pub fn number_of<F, R>(predicate: F) -> Self
    where
        F: Fn(f64) -> R + Send + Sync + 'static,
        R: Into<Verdict>,
    {
        Self::checker(Family::Number, move |value| match value.as_number() {
            Some(n) => predicate(n).into(),
            None => Verdict::Fail,
        })
    }

    pub fn symbol_of<F, R>(predicate: F) -> Self
    where
        F: Fn(&Symbol) -> R + Send + Sync + 'static,
        R: Into<Verdict>,
    {
        Self::checker(Family::Symbol, move |value| match value {
            Value::Symbol(sym) => predicate(sym).into(),
            _ => Verdict::Fail,
        })
    }

    pub fn function_of<F, R>(predicate: F) -> Self
    where
        F: Fn(&Function) -> R + Send + Sync + 'static,
        R: Into<Verdict>,
    {
        Self::checker(Family::Function, move |value| match value {
            Value::Function(func) => predicate(func).into(),
            _ => Verdict::Fail,
        })
    }

    /// A non-null object accepted by `predicate`.
    pub fn object_of<F, R>(predicate: F) -> Self
    where
        F: Fn(&Value) -> R + Send + Sync + 'static,
        R: Into<Verdict>,
    {
        Self::checker(Family::Object, move |value| predicate(value).into())
    }

    fn checker<F>(family: Family, predicate: F) -> Self
    where
        F: Fn(&Value) -> Verdict + Send + Sync + 'static,
    {
        Self::Checker(Checker {
            family,
            predicate: Predicate::new(predicate),
        })
    }

    pub fn array_of(element: impl Into<Descriptor>) -> Self {
        Self::ArrayOf(Box::new(element.into()))
    }

    pub fn record_of(values: impl Into<Descriptor>) -> Self {
        Self::RecordOf(Box::new(values.into()))
    }

    /// An object with `required` keys that must be present and `optional`
    /// keys that may be. Every required entry is merged into the optional
    /// set, optional entries winning on overlap.
    ///
    /// # Errors
    ///
    /// Returns [`DescriptorError::WildcardInRequired`] if `required` declares
    /// the wildcard key; catch-all entries belong in `optional`.
    pub fn with_optional(required: Shape, optional: Shape) -> Result<Self, DescriptorError> {
        if required.has_wildcard() {
            tracing::debug!(
                required_keys = required.len(),
                "rejected optional-object descriptor with a wildcard in its required shape"
            );
            return Err(DescriptorError::WildcardInRequired);
        }
        let optional = required.clone().merge(optional);
        Ok(Self::WithOptional(OptionalShape { required, optional }))
    }

    pub fn union<I: IntoIterator<Item = Descriptor>>(alternatives: I) -> Self {
        Self::Union(alternatives.into_iter().collect())
    }

    /// An untagged inline predicate.
    pub fn predicate<F, R>(predicate: F) -> Self
    where
        F: Fn(&Value) -> R + Send + Sync + 'static,
        R: Into<Verdict>,
    {
        Self::Predicate(Predicate::new(predicate))
    }

    /// A literal descriptor. Composite values are normalized the way the
    /// matcher reads them: objects, arrays and boxed wrappers become shapes
    /// of their own entries, callables become inline predicates.
    pub fn literal(value: impl Into<Value>) -> Self {
        match value.into() {
            Value::Function(func) => Self::Predicate(func.into()),
            Value::Array(items) => Self::Shape(Shape::from_elements(
                items.into_iter().map(|item| Self::literal(item)),
            )),
            value if value.is_object() => Self::Shape(
                value
                    .own_entries()
                    .into_iter()
                    .map(|(key, item)| (key.into_owned(), Self::literal(item.into_owned())))
                    .collect(),
            ),
            value => Self::Literal(value),
        }
    }

    /// Tag name of a tagged descriptor; `None` for untagged ones.
    pub fn tag_name(&self) -> Option<&'static str> {
        let name = match self {
            Self::Void => "Void",
            Self::Any => "Any",
            Self::Nullish => "Nullish",
            Self::Boolean => "Boolean",
            Self::String => Family::String.tag_name(),
            Self::Number => Family::Number.tag_name(),
            Self::Symbol => Family::Symbol.tag_name(),
            Self::Function => Family::Function.tag_name(),
            Self::Object => Family::Object.tag_name(),
            Self::Checker(checker) => checker.family().checker_tag_name(),
            Self::ArrayOf(_) => "Array",
            Self::RecordOf(_) => "Record",
            Self::WithOptional(_) => "ObjectOptional",
            Self::Union(_) => "Union",
            Self::Predicate(_) | Self::Shape(_) | Self::Literal(_) => return None,
        };
        Some(name)
    }

    pub fn is_tagged(&self) -> bool {
        self.tag_name().is_some()
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(tag) = self.tag_name() {
            return f.write_str(tag);
        }
        match self {
            Self::Predicate(_) => f.write_str("[Function]"),
            Self::Literal(Value::String(s)) => write!(f, "{s:?}"),
            Self::Literal(value) => write!(f, "{value}"),
            Self::Shape(shape) => {
                let mut keys: Vec<&str> = shape.keys().collect();
                if shape.has_wildcard() {
                    keys.push(WILDCARD_LABEL);
                }
                write!(f, "{{{}}}", keys.join(", "))
            }
            _ => Ok(()),
        }
    }
}

impl From<Shape> for Descriptor {
    fn from(shape: Shape) -> Self {
        Self::Shape(shape)
    }
}

impl From<Predicate> for Descriptor {
    fn from(predicate: Predicate) -> Self {
        Self::Predicate(predicate)
    }
}

impl From<Value> for Descriptor {
    fn from(value: Value) -> Self {
        Self::literal(value)
    }
}

impl From<&str> for Descriptor {
    fn from(s: &str) -> Self {
        Self::Literal(Value::from(s))
    }
}

impl From<String> for Descriptor {
    fn from(s: String) -> Self {
        Self::Literal(Value::String(s))
    }
}

impl From<f64> for Descriptor {
    fn from(n: f64) -> Self {
        Self::Literal(Value::Number(n))
    }
}

impl From<i32> for Descriptor {
    fn from(n: i32) -> Self {
        Self::Literal(Value::from(n))
    }
}

impl From<bool> for Descriptor {
    fn from(b: bool) -> Self {
        Self::Literal(Value::Bool(b))
    }
}
