//! # Runtime Values
//!
//! The dynamic value model inspected by the matcher. `Value` mirrors the
//! runtime values of a dynamically typed host: `undefined`, `null`, booleans,
//! IEEE-754 numbers, strings, identity-compared symbols and callables, arrays,
//! plain objects, and the boxed primitive wrappers (`new String("x")` and
//! friends).
//!
//! ## Key Order
//!
//! Objects are [`PropertyMap`]s. Iteration follows the host's own-key order:
//! canonical array-index keys in ascending numeric order first, then every
//! other key in insertion order. The matcher relies on this order for its
//! short-circuit behavior, so it is part of the observable contract.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

// ---------------------------------------------------------------------------
// PropertyMap
// ---------------------------------------------------------------------------

/// An insertion-ordered, string-keyed map with host enumeration order.
///
/// Used for plain object values and for the named fields of a structural
/// [`Shape`](crate::Shape). Lookups and inserts go through a position index,
/// so building an object of `n` keys is linear in `n`.
#[derive(Clone)]
pub struct PropertyMap<V> {
    entries: Vec<(String, V)>,
    positions: HashMap<String, usize>,
}

impl<V> Default for PropertyMap<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            positions: HashMap::new(),
        }
    }
}

impl<V: fmt::Debug> fmt::Debug for PropertyMap<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(k, v)| (k, v)))
            .finish()
    }
}

/// Entry-wise comparison in insertion order.
impl<V: PartialEq> PartialEq for PropertyMap<V> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<V> PropertyMap<V> {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a property. Replacing an existing key keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        let key = key.into();
        match self.positions.get(&key) {
            Some(&position) => Some(std::mem::replace(&mut self.entries[position].1, value)),
            None => {
                self.positions.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<String>, value: V) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.positions.get(key).map(|&position| &self.entries[position].1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.positions.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consume the map, yielding entries in insertion order.
    pub(crate) fn into_entries(self) -> Vec<(String, V)> {
        self.entries
    }

    /// Iterate entries in host enumeration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> + '_ {
        self.ordered().into_iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterate keys in host enumeration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.iter().map(|(k, _)| k)
    }

    fn ordered(&self) -> Vec<&(String, V)> {
        let mut indexed: Vec<(u32, &(String, V))> = self
            .entries
            .iter()
            .filter_map(|entry| array_index(&entry.0).map(|i| (i, entry)))
            .collect();
        indexed.sort_by_key(|(i, _)| *i);

        indexed
            .into_iter()
            .map(|(_, entry)| entry)
            .chain(
                self.entries
                    .iter()
                    .filter(|entry| array_index(&entry.0).is_none()),
            )
            .collect()
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for PropertyMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K: Into<String>, V> Extend<(K, V)> for PropertyMap<V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

/// Parse a canonical array-index key (`"0"`, `"17"`, never `"01"`).
fn array_index(key: &str) -> Option<u32> {
    if key.is_empty() || (key.len() > 1 && key.starts_with('0')) {
        return None;
    }
    if !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    key.parse::<u32>().ok().filter(|&i| i != u32::MAX)
}

/// A plain object value.
pub type Object = PropertyMap<Value>;

// ---------------------------------------------------------------------------
// Symbol
// ---------------------------------------------------------------------------

static NEXT_SYMBOL_ID: AtomicU64 = AtomicU64::new(1);

/// A unique identity token. Two symbols are equal only if one is a clone of
/// the other, regardless of description.
#[derive(Debug, Clone)]
pub struct Symbol {
    id: u64,
    description: Option<Arc<str>>,
}

impl Symbol {
    /// Create a fresh symbol with a description.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            id: NEXT_SYMBOL_ID.fetch_add(1, Ordering::Relaxed),
            description: Some(Arc::from(description.into())),
        }
    }

    /// Create a fresh symbol without a description.
    pub fn anonymous() -> Self {
        Self {
            id: NEXT_SYMBOL_ID.fetch_add(1, Ordering::Relaxed),
            description: None,
        }
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.description().unwrap_or_default())
    }
}

// ---------------------------------------------------------------------------
// Function
// ---------------------------------------------------------------------------

type NativeFn = dyn Fn(&Value) -> Value + Send + Sync;

/// A callable value. Compared by identity: clones are equal, two separately
/// constructed functions never are.
#[derive(Clone)]
pub struct Function {
    name: Arc<str>,
    body: Arc<NativeFn>,
}

impl Function {
    pub fn new<F>(name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        Self {
            name: Arc::from(name.into()),
            body: Arc::new(body),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invoke the function with a single argument.
    pub fn call(&self, argument: &Value) -> Value {
        (self.body)(argument)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        Arc::as_ptr(&self.body) as *const u8 == Arc::as_ptr(&other.body) as *const u8
    }
}

// ---------------------------------------------------------------------------
// Boxed primitive wrappers
// ---------------------------------------------------------------------------

/// An object wrapping a primitive (`new Boolean(..)`, `new Number(..)`,
/// `new String(..)`). Object-typed, but admitted by the matching primitive
/// descriptor.
#[derive(Debug, Clone)]
pub enum Boxed {
    Bool(bool),
    Number(f64),
    String(String),
}

impl PartialEq for Boxed {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => same_number(*a, *b),
            (Self::String(a), Self::String(b)) => a == b,
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Value
// ---------------------------------------------------------------------------

/// A dynamically typed runtime value.
///
/// `PartialEq` is structural and treats `NaN` as equal to itself so that
/// error trees compare reliably. Host `===` semantics live in
/// [`Value::strict_equals`].
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Symbol(Symbol),
    Function(Function),
    Array(Vec<Value>),
    Object(Object),
    Boxed(Boxed),
}

impl Value {
    /// Build an object value from key/value pairs.
    pub fn object<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Self::Object(entries.into_iter().collect())
    }

    /// Build an array value.
    pub fn array<I: IntoIterator<Item = Value>>(items: I) -> Self {
        Self::Array(items.into_iter().collect())
    }

    /// Build a callable value.
    pub fn function<F>(name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        Self::Function(Function::new(name, body))
    }

    /// The host `typeof` name.
    pub fn type_of(&self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Symbol(_) => "symbol",
            Self::Function(_) => "function",
            Self::Null | Self::Array(_) | Self::Object(_) | Self::Boxed(_) => "object",
        }
    }

    /// `undefined` or `null`.
    pub fn is_nullish(&self) -> bool {
        matches!(self, Self::Undefined | Self::Null)
    }

    /// Host truthiness. `undefined`, `null`, `false`, `0`, `-0`, `NaN` and
    /// `""` are falsy; everything else is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Undefined | Self::Null => false,
            Self::Bool(b) => *b,
            Self::Number(n) => !(n.is_nan() || *n == 0.0),
            Self::String(s) => !s.is_empty(),
            Self::Symbol(_)
            | Self::Function(_)
            | Self::Array(_)
            | Self::Object(_)
            | Self::Boxed(_) => true,
        }
    }

    /// Non-null and `typeof` is `"object"`.
    pub fn is_object(&self) -> bool {
        matches!(self, Self::Array(_) | Self::Object(_) | Self::Boxed(_))
    }

    pub fn is_callable(&self) -> bool {
        matches!(self, Self::Function(_))
    }

    /// Neither an object nor a callable.
    pub fn is_primitive(&self) -> bool {
        !(self.is_object() || self.is_callable())
    }

    /// String content, unwrapping a boxed string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) | Self::Boxed(Boxed::String(s)) => Some(s),
            _ => None,
        }
    }

    /// Numeric content, unwrapping a boxed number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) | Self::Boxed(Boxed::Number(n)) => Some(*n),
            _ => None,
        }
    }

    /// Boolean content, unwrapping a boxed boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) | Self::Boxed(Boxed::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    /// Host `===`. `NaN` is not equal to itself, `0 === -0`, symbols and
    /// functions compare by identity, objects never compare equal here
    /// because the matcher only applies strict equality to primitives.
    pub fn strict_equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Self::Undefined, Self::Undefined) | (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Symbol(a), Self::Symbol(b)) => a == b,
            (Self::Function(a), Self::Function(b)) => a == b,
            _ => false,
        }
    }

    /// Own enumerable entries in enumeration order.
    ///
    /// Arrays enumerate their indices, boxed strings their UTF-16 code units
    /// (an unpaired surrogate half reads as U+FFFD). Every other non-object
    /// value has no own entries.
    pub fn own_entries(&self) -> Vec<(Cow<'_, str>, Cow<'_, Value>)> {
        match self {
            Self::Object(map) => map
                .iter()
                .map(|(k, v)| (Cow::Borrowed(k), Cow::Borrowed(v)))
                .collect(),
            Self::Array(items) => items
                .iter()
                .enumerate()
                .map(|(i, v)| (Cow::Owned(i.to_string()), Cow::Borrowed(v)))
                .collect(),
            Self::Boxed(Boxed::String(s)) => s
                .encode_utf16()
                .enumerate()
                .map(|(i, unit)| {
                    let unit = String::from_utf16_lossy(&[unit]);
                    (Cow::Owned(i.to_string()), Cow::Owned(Value::String(unit)))
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Whether `key` is one of the value's own enumerable keys.
    pub fn has_own(&self, key: &str) -> bool {
        match self {
            Self::Object(map) => map.contains_key(key),
            Self::Array(items) => array_index(key).is_some_and(|i| (i as usize) < items.len()),
            Self::Boxed(Boxed::String(s)) => {
                array_index(key).is_some_and(|i| (i as usize) < s.encode_utf16().count())
            }
            _ => false,
        }
    }
}

fn same_number(a: f64, b: f64) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Undefined, Self::Undefined) | (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => same_number(*a, *b),
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Symbol(a), Self::Symbol(b)) => a == b,
            (Self::Function(a), Self::Function(b)) => a == b,
            (Self::Array(a), Self::Array(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => a == b,
            (Self::Boxed(a), Self::Boxed(b)) => a == b,
            _ => false,
        }
    }
}

/// Format a number the way the host's `String(n)` does: `NaN`, `Infinity`,
/// `-Infinity`, `-0` printed as `0`, shortest round-trip digits, and
/// exponent notation (`1e+21`, `1.5e-7`) outside `[1e-6, 1e21)`.
pub(crate) fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let sign = if n > 0.0 { "" } else { "-" };
        format!("{sign}Infinity")
    } else if n == 0.0 {
        "0".to_string()
    } else if n.abs() >= 1e21 || n.abs() < 1e-6 {
        let formatted = format!("{n:e}");
        match formatted.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{mantissa}e+{exponent}")
            }
            _ => formatted,
        }
    } else {
        n.to_string()
    }
}

/// Host `String(v)` conversion.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => f.write_str("undefined"),
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => f.write_str(&format_number(*n)),
            Self::String(s) => f.write_str(s),
            Self::Symbol(sym) => write!(f, "{sym}"),
            Self::Function(func) => write!(f, "function {}() {{ [native code] }}", func.name()),
            Self::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    if !item.is_nullish() {
                        write!(f, "{item}")?;
                    }
                }
                Ok(())
            }
            Self::Object(_) => f.write_str("[object Object]"),
            Self::Boxed(Boxed::Bool(b)) => write!(f, "{b}"),
            Self::Boxed(Boxed::Number(n)) => f.write_str(&format_number(*n)),
            Self::Boxed(Boxed::String(s)) => f.write_str(s),
        }
    }
}

// ---------------------------------------------------------------------------
// Conversions from Rust primitives
// ---------------------------------------------------------------------------

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<Symbol> for Value {
    fn from(sym: Symbol) -> Self {
        Self::Symbol(sym)
    }
}

impl From<Function> for Value {
    fn from(func: Function) -> Self {
        Self::Function(func)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::Array(items)
    }
}

impl From<Object> for Value {
    fn from(map: Object) -> Self {
        Self::Object(map)
    }
}

impl From<Boxed> for Value {
    fn from(boxed: Boxed) -> Self {
        Self::Boxed(boxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_map_enumeration_order() {
        let map: Object = [
            ("b", Value::from(1)),
            ("10", Value::from(2)),
            ("a", Value::from(3)),
            ("2", Value::from(4)),
            ("01", Value::from(5)),
        ]
        .into_iter()
        .collect();
        let keys: Vec<&str> = map.keys().collect();
        assert_eq!(keys, vec!["2", "10", "b", "a", "01"]);
    }

    #[test]
    fn test_property_map_replace_keeps_position() {
        let mut map = Object::new().with("x", Value::from(1)).with("y", Value::from(2));
        let old = map.insert("x", Value::from(3));
        assert_eq!(old, Some(Value::from(1)));
        let entries: Vec<(&str, &Value)> = map.iter().collect();
        assert_eq!(entries[0], ("x", &Value::from(3)));
        assert_eq!(entries[1], ("y", &Value::from(2)));
    }

    #[test]
    fn test_property_map_lookup_after_many_inserts() {
        let mut map: Object = (0..1_000).map(|i| (format!("k{i}"), Value::from(i))).collect();
        assert_eq!(map.insert("k500", Value::Null), Some(Value::from(500)));
        assert_eq!(map.len(), 1_000);
        assert_eq!(map.get("k500"), Some(&Value::Null));
        assert_eq!(map.keys().nth(500), Some("k500"));
        assert!(map.contains_key("k999"));
        assert!(!map.contains_key("k1000"));
    }

    #[test]
    fn test_truthiness() {
        for falsy in [
            Value::Undefined,
            Value::Null,
            Value::Bool(false),
            Value::from(0),
            Value::Number(-0.0),
            Value::Number(f64::NAN),
            Value::from(""),
        ] {
            assert!(!falsy.is_truthy(), "{falsy:?} should be falsy");
        }
        for truthy in [
            Value::Bool(true),
            Value::from(-1),
            Value::from("0"),
            Value::array([]),
            Value::Object(Object::new()),
            Value::Boxed(Boxed::Bool(false)),
            Value::Symbol(Symbol::anonymous()),
        ] {
            assert!(truthy.is_truthy(), "{truthy:?} should be truthy");
        }
    }

    #[test]
    fn test_type_of() {
        assert_eq!(Value::Null.type_of(), "object");
        assert_eq!(Value::Boxed(Boxed::String("x".into())).type_of(), "object");
        assert_eq!(Value::function("f", |_| Value::Undefined).type_of(), "function");
        assert_eq!(Value::Undefined.type_of(), "undefined");
    }

    #[test]
    fn test_strict_equals_nan_and_zero() {
        let nan = Value::Number(f64::NAN);
        assert!(!nan.strict_equals(&nan));
        assert!(Value::Number(0.0).strict_equals(&Value::Number(-0.0)));
        assert_eq!(nan, nan.clone());
    }

    #[test]
    fn test_symbol_identity() {
        let a = Symbol::new("tag");
        let b = Symbol::new("tag");
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
        assert_eq!(a.to_string(), "Symbol(tag)");
        assert_eq!(Symbol::anonymous().to_string(), "Symbol()");
    }

    #[test]
    fn test_function_identity() {
        let f = Function::new("f", |v| v.clone());
        let g = Function::new("f", |v| v.clone());
        assert_eq!(f, f.clone());
        assert_ne!(f, g);
        assert_eq!(f.call(&Value::from(7)), Value::from(7));
    }

    #[test]
    fn test_own_entries() {
        let array = Value::array([Value::from("a"), Value::from("b")]);
        let keys: Vec<String> = array
            .own_entries()
            .into_iter()
            .map(|(k, _)| k.into_owned())
            .collect();
        assert_eq!(keys, vec!["0", "1"]);
        assert!(array.has_own("1"));
        assert!(!array.has_own("2"));

        let boxed = Value::Boxed(Boxed::String("hi".into()));
        let entries = boxed.own_entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].1.as_ref(), &Value::from("i"));

        // Astral characters take two UTF-16 code units.
        let astral = Value::Boxed(Boxed::String("a\u{1F600}".into()));
        assert_eq!(astral.own_entries().len(), 3);
        assert!(astral.has_own("2"));
        assert!(!astral.has_own("3"));

        assert!(Value::from(5).own_entries().is_empty());
        assert!(Value::function("f", |_| Value::Null).own_entries().is_empty());
    }

    #[test]
    fn test_display_matches_host_string_conversion() {
        assert_eq!(Value::from(1).to_string(), "1");
        assert_eq!(Value::from(1.5).to_string(), "1.5");
        assert_eq!(Value::Number(-0.0).to_string(), "0");
        assert_eq!(Value::Number(f64::NAN).to_string(), "NaN");
        assert_eq!(Value::Number(f64::NEG_INFINITY).to_string(), "-Infinity");
        assert_eq!(Value::Number(1e21).to_string(), "1e+21");
        assert_eq!(Value::Number(-1.5e22).to_string(), "-1.5e+22");
        assert_eq!(Value::Number(1e-7).to_string(), "1e-7");
        assert_eq!(Value::Number(1e20).to_string(), "100000000000000000000");
        assert_eq!(Value::Number(0.000001).to_string(), "0.000001");
        assert_eq!(Value::Undefined.to_string(), "undefined");
        assert_eq!(
            Value::array([Value::from(1), Value::Null, Value::from("x")]).to_string(),
            "1,,x"
        );
        assert_eq!(Value::Object(Object::new()).to_string(), "[object Object]");
        assert_eq!(
            Value::function("check", |_| Value::Null).to_string(),
            "function check() { [native code] }"
        );
    }
}
