//! # Matcher
//!
//! The recursive [`check`] algorithm. Pure and reentrant: all state lives on
//! the call stack and in the returned error tree.
//!
//! ## Traversal Order
//!
//! Predicates run in a fixed depth-first order. Array elements go in index
//! order, object and record entries in the value's own-key enumeration order
//! (not the descriptor's), union alternatives left to right.
//!
//! ## Policies
//!
//! - `ArrayOf` and `RecordOf` short-circuit on the first failing element.
//! - `Union` is exhaustive on failure: every alternative's error is kept.
//! - Untagged shapes are strict; undeclared keys are rejected unless the
//!   shape declares a wildcard.
//!
//! ## Recursion
//!
//! There is no cycle detection and no depth limit. Checking extremely deep
//! values or descriptors can exhaust the stack; bounding depth is the
//! caller's responsibility.

use crate::descriptor::{Descriptor, Family, OptionalShape, Predicate, Shape, WILDCARD_LABEL};
use crate::error::CheckError;
use crate::value::{Boxed, Value};

/// Whether undeclared keys are rejected by [`check_keys`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyMode {
    Strict,
    Lenient,
}

/// Check `value` against `descriptor`.
///
/// Returns `Ok(())` on conformance, otherwise the error tree describing the
/// first failure path (all failure paths, for unions).
pub fn check(descriptor: &Descriptor, value: &Value) -> Result<(), CheckError> {
    match descriptor {
        Descriptor::Void => admit(value.is_nullish(), descriptor, value),
        Descriptor::Any => Ok(()),
        Descriptor::Nullish => admit(!value.is_truthy(), descriptor, value),
        Descriptor::Boolean => admit(
            matches!(value, Value::Bool(_) | Value::Boxed(Boxed::Bool(_))),
            descriptor,
            value,
        ),
        Descriptor::String => admit(Family::String.admits(value), descriptor, value),
        Descriptor::Number => admit(Family::Number.admits(value), descriptor, value),
        Descriptor::Symbol => admit(Family::Symbol.admits(value), descriptor, value),
        Descriptor::Function => admit(Family::Function.admits(value), descriptor, value),
        Descriptor::Object => admit(Family::Object.admits(value), descriptor, value),

        Descriptor::Checker(checker) => {
            admit(checker.family().admits(value), descriptor, value)?;
            run_predicate(checker.predicate(), value)
        }

        Descriptor::ArrayOf(element) => {
            let Value::Array(items) = value else {
                return Err(incorrect_type(descriptor, value));
            };
            for (index, item) in items.iter().enumerate() {
                check(element, item).map_err(|error| error.at_index(index))?;
            }
            Ok(())
        }

        Descriptor::RecordOf(values) => {
            admit(value.is_object(), descriptor, value)?;
            for (key, item) in value.own_entries() {
                check(values, &item).map_err(|error| error.at_record_key(key))?;
            }
            Ok(())
        }

        Descriptor::WithOptional(shape) => check_with_optional(descriptor, shape, value),
        Descriptor::Union(alternatives) => check_union(alternatives, value),

        Descriptor::Predicate(predicate) => run_predicate(predicate, value),
        Descriptor::Shape(shape) => check_shape(descriptor, shape, value),
        Descriptor::Literal(expected) => check_literal(descriptor, expected, value),
    }
}

fn incorrect_type(descriptor: &Descriptor, value: &Value) -> CheckError {
    CheckError::IncorrectType {
        expected: descriptor.clone(),
        got: value.clone(),
    }
}

fn admit(accepted: bool, descriptor: &Descriptor, value: &Value) -> Result<(), CheckError> {
    if accepted {
        Ok(())
    } else {
        Err(incorrect_type(descriptor, value))
    }
}

fn run_predicate(predicate: &Predicate, value: &Value) -> Result<(), CheckError> {
    predicate
        .evaluate(value)
        .into_result()
        .map_err(|result| CheckError::CheckerFailed { result })
}

fn check_union(alternatives: &[Descriptor], value: &Value) -> Result<(), CheckError> {
    let mut errors = Vec::with_capacity(alternatives.len());
    for alternative in alternatives {
        match check(alternative, value) {
            Ok(()) => return Ok(()),
            Err(error) => errors.push(error),
        }
    }
    tracing::trace!(alternatives = errors.len(), "no union alternative matched");
    Err(CheckError::UnionNoMatch { errors })
}

/// Optional-object matching in three passes: declared values (lenient),
/// required-key presence, then the strict unknown-key gate. The strict pass
/// validates declared values a second time.
fn check_with_optional(
    descriptor: &Descriptor,
    shape: &OptionalShape,
    value: &Value,
) -> Result<(), CheckError> {
    admit(value.is_object(), descriptor, value)?;

    check_keys(shape.optional(), value, KeyMode::Lenient)?;
    require_keys(shape.required(), value)?;
    check_keys(shape.optional(), value, KeyMode::Strict)
}

fn check_shape(descriptor: &Descriptor, shape: &Shape, value: &Value) -> Result<(), CheckError> {
    if value.is_primitive() {
        return Err(incorrect_type(descriptor, value));
    }
    check_keys(shape, value, KeyMode::Strict)?;
    require_keys(shape, value)
}

fn check_literal(descriptor: &Descriptor, expected: &Value, value: &Value) -> Result<(), CheckError> {
    if !expected.is_primitive() {
        // Built directly rather than through `Descriptor::literal`.
        return check(&Descriptor::literal(expected.clone()), value);
    }
    if !value.is_primitive() {
        return Err(incorrect_type(descriptor, value));
    }
    if let (Value::Number(got), Value::Number(want)) = (value, expected) {
        if got.is_nan() && want.is_nan() {
            return Ok(());
        }
    }
    if value.strict_equals(expected) {
        Ok(())
    } else {
        Err(CheckError::IncorrectValue {
            expected: expected.clone(),
            got: value.clone(),
        })
    }
}

/// Check every own entry of `value` against `shape`.
///
/// Declared keys recurse into their descriptor; undeclared keys fall through
/// to the wildcard under the synthetic key `"<key> -> [DefaultKey]"`; anything
/// else is an extra key in strict mode and skipped in lenient mode.
fn check_keys(shape: &Shape, value: &Value, mode: KeyMode) -> Result<(), CheckError> {
    for (key, item) in value.own_entries() {
        if let Some(field) = shape.get(&key) {
            check(field, &item).map_err(|error| error.at_object_key(key))?;
        } else if let Some(wildcard) = shape.wildcard() {
            check(wildcard, &item)
                .map_err(|error| error.at_object_key(format!("{key} -> {WILDCARD_LABEL}")))?;
        } else if mode == KeyMode::Strict {
            return Err(CheckError::ObjectIllegalExtraKey {
                key: key.into_owned(),
            });
        }
    }
    Ok(())
}

fn require_keys(shape: &Shape, value: &Value) -> Result<(), CheckError> {
    match shape.keys().find(|key| !value.has_own(key)) {
        Some(key) => Err(CheckError::ObjectRequiredKeyMissing {
            key: key.to_string(),
        }),
        None => Ok(()),
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn primitive() -> impl Strategy<Value = Value> {
        prop_oneof![
            Just(Value::Undefined),
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<f64>().prop_map(Value::Number),
            (-5i32..5).prop_map(Value::from),
            "[a-z]{0,6}".prop_map(Value::String),
        ]
    }

    fn runtime_value() -> impl Strategy<Value = Value> {
        primitive().prop_recursive(3, 32, 6, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
                prop::collection::btree_map("[a-z]{1,3}", inner, 0..6)
                    .prop_map(|entries| Value::Object(entries.into_iter().collect())),
            ]
        })
    }

    fn descriptor() -> impl Strategy<Value = Descriptor> {
        let leaf = prop_oneof![
            Just(Descriptor::void()),
            Just(Descriptor::any()),
            Just(Descriptor::nullish()),
            Just(Descriptor::boolean()),
            Just(Descriptor::string()),
            Just(Descriptor::number()),
            Just(Descriptor::object()),
            Just(Descriptor::number_of(|n| n >= 0.0)),
            Just(Descriptor::string_of(|s| if s.is_empty() { Err("empty".to_string()) } else { Ok(()) })),
            primitive().prop_map(|v| Descriptor::literal(v)),
        ];
        leaf.prop_recursive(3, 24, 4, |inner| {
            prop_oneof![
                inner.clone().prop_map(|d| Descriptor::array_of(d)),
                inner.clone().prop_map(|d| Descriptor::record_of(d)),
                prop::collection::vec(inner.clone(), 0..4).prop_map(|ds| Descriptor::union(ds)),
                prop::collection::btree_map("[a-z]{1,3}", inner, 0..4)
                    .prop_map(|fields| Descriptor::Shape(fields.into_iter().collect())),
            ]
        })
    }

    proptest! {
        /// Checking never panics and repeated checks agree.
        #[test]
        fn check_is_total_and_idempotent(d in descriptor(), v in runtime_value()) {
            let first = check(&d, &v);
            let second = check(&d, &v);
            prop_assert_eq!(first, second);
        }

        /// `Any` accepts every value.
        #[test]
        fn any_accepts_everything(v in runtime_value()) {
            prop_assert!(check(&Descriptor::any(), &v).is_ok());
        }

        /// A union succeeds exactly when some alternative succeeds, and on
        /// failure reports one error per alternative.
        #[test]
        fn union_matches_iff_some_alternative_matches(
            ds in prop::collection::vec(descriptor(), 0..4),
            v in runtime_value(),
        ) {
            let any_match = ds.iter().any(|d| check(d, &v).is_ok());
            match check(&Descriptor::union(ds.clone()), &v) {
                Ok(()) => prop_assert!(any_match),
                Err(CheckError::UnionNoMatch { errors }) => {
                    prop_assert!(!any_match);
                    prop_assert_eq!(errors.len(), ds.len());
                }
                Err(other) => prop_assert!(false, "unexpected error kind: {}", other.kind()),
            }
        }

        /// `ArrayOf` reports the first failing index, or succeeds when every
        /// element passes.
        #[test]
        fn array_of_reports_first_failure(
            d in descriptor(),
            items in prop::collection::vec(runtime_value(), 0..8),
        ) {
            let first_failure = items.iter().position(|item| check(&d, item).is_err());
            let result = check(&Descriptor::array_of(d), &Value::Array(items));
            match (first_failure, result) {
                (None, Ok(())) => {}
                (Some(expected), Err(CheckError::ArrayError { index, .. })) => {
                    prop_assert_eq!(index, expected);
                }
                (expected, other) => prop_assert!(false, "mismatch: {:?} vs {:?}", expected, other),
            }
        }

        /// A value always matches itself used as a literal descriptor,
        /// NaN included.
        #[test]
        fn value_matches_its_own_literal(v in runtime_value()) {
            prop_assert!(check(&Descriptor::literal(v.clone()), &v).is_ok());
        }
    }
}
