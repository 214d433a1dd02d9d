//! # Error Types — Structured Check Diagnostics
//!
//! Two failure domains, kept apart:
//!
//! - [`CheckError`] — a validation failure. Always returned as a value from
//!   [`check`](crate::check), never raised. Wrapper kinds own their nested
//!   child, so the tree mirrors the path taken through the value.
//! - [`DescriptorError`] — descriptor misuse detected at construction time.
//!
//! `CheckError` serializes to the wire shape `{"e": <kind>, ...fields}`.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::descriptor::Descriptor;
use crate::value::Value;

/// A single conformance failure, possibly wrapping a nested failure.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "e")]
pub enum CheckError {
    /// The value is not of the kind the descriptor accepts.
    #[error("value `{got}` is not assignable to {expected}")]
    IncorrectType {
        /// The descriptor that rejected the value.
        expected: Descriptor,
        /// The rejected value.
        got: Value,
    },

    /// The value differs from a literal descriptor.
    #[error("value `{got}` is not `{expected}`")]
    IncorrectValue {
        /// The literal the value was compared against.
        expected: Value,
        /// The rejected value.
        got: Value,
    },

    /// No union alternative matched. One error per alternative, in order.
    #[error("value matches none of the {} union alternatives", .errors.len())]
    UnionNoMatch { errors: Vec<CheckError> },

    /// The first failing array element.
    #[error("array element #{index} is invalid")]
    ArrayError {
        #[source]
        error: Box<CheckError>,
        index: usize,
    },

    /// The first failing record entry.
    #[error("record key \"{key}\" is invalid")]
    RecordError {
        #[source]
        error: Box<CheckError>,
        key: String,
    },

    /// A declared (or wildcard-covered) object key holds an invalid value.
    #[error("object key \"{key}\" is invalid")]
    ObjectError {
        #[source]
        error: Box<CheckError>,
        key: String,
    },

    #[error("required key \"{key}\" is missing")]
    ObjectRequiredKeyMissing { key: String },

    #[error("unexpected extra key \"{key}\"")]
    ObjectIllegalExtraKey { key: String },

    /// A predicate rejected the value.
    #[error("checker rejected the value: {result}")]
    CheckerFailed { result: CheckerResult },
}

impl CheckError {
    /// The wire name of this error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::IncorrectType { .. } => "IncorrectType",
            Self::IncorrectValue { .. } => "IncorrectValue",
            Self::UnionNoMatch { .. } => "UnionNoMatch",
            Self::ArrayError { .. } => "ArrayError",
            Self::RecordError { .. } => "RecordError",
            Self::ObjectError { .. } => "ObjectError",
            Self::ObjectRequiredKeyMissing { .. } => "ObjectRequiredKeyMissing",
            Self::ObjectIllegalExtraKey { .. } => "ObjectIllegalExtraKey",
            Self::CheckerFailed { .. } => "CheckerFailed",
        }
    }

    /// The nested error of a wrapper kind.
    pub fn nested(&self) -> Option<&CheckError> {
        match self {
            Self::ArrayError { error, .. }
            | Self::RecordError { error, .. }
            | Self::ObjectError { error, .. } => Some(error),
            _ => None,
        }
    }

    pub(crate) fn at_index(self, index: usize) -> Self {
        Self::ArrayError {
            error: Box::new(self),
            index,
        }
    }

    pub(crate) fn at_record_key(self, key: impl Into<String>) -> Self {
        Self::RecordError {
            error: Box::new(self),
            key: key.into(),
        }
    }

    pub(crate) fn at_object_key(self, key: impl Into<String>) -> Self {
        Self::ObjectError {
            error: Box::new(self),
            key: key.into(),
        }
    }
}

/// What a rejecting predicate returned: plain `false` or a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckerResult {
    False,
    Message(String),
}

impl fmt::Display for CheckerResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::False => f.write_str("false"),
            Self::Message(message) => f.write_str(message),
        }
    }
}

/// Descriptor misuse, detected when the descriptor is built.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DescriptorError {
    /// The required shape of an optional-object descriptor declared the
    /// wildcard key.
    #[error("the required shape may not declare the wildcard key; move it to the optional shape")]
    WildcardInRequired,
}

/// Failure converting foreign document values into runtime values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValueConversionError {
    /// A mapping key that has no string form.
    #[error("unsupported YAML map key type: {0}")]
    UnsupportedKey(String),
}
