//! # Type Guards
//!
//! A [`TypeGuard`] binds a descriptor so it can be applied repeatedly, either
//! for the full error tree ([`TypeGuard::check`]) or as a boolean filter
//! ([`TypeGuard::is_valid`]).

use crate::descriptor::Descriptor;
use crate::error::CheckError;
use crate::matcher::check;
use crate::value::Value;

/// A reusable validator bound to one descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeGuard {
    descriptor: Descriptor,
}

impl TypeGuard {
    pub fn new(descriptor: impl Into<Descriptor>) -> Self {
        Self {
            descriptor: descriptor.into(),
        }
    }

    /// Check `value`, returning the error tree on rejection.
    pub fn check(&self, value: &Value) -> Result<(), CheckError> {
        check(&self.descriptor, value).map_err(|err| {
            tracing::debug!(kind = err.kind(), "type guard rejected value");
            err
        })
    }

    /// Whether `value` conforms. Discards the error tree.
    pub fn is_valid(&self, value: &Value) -> bool {
        check(&self.descriptor, value).is_ok()
    }

    pub fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }
}

impl From<Descriptor> for TypeGuard {
    fn from(descriptor: Descriptor) -> Self {
        Self::new(descriptor)
    }
}

/// Shorthand for [`TypeGuard::new`].
pub fn guard(descriptor: impl Into<Descriptor>) -> TypeGuard {
    TypeGuard::new(descriptor)
}
