//! # gatekeep-core — Declarative Runtime Type Validation
//!
//! Describes the expected shape of dynamically typed values with composable
//! [`Descriptor`]s and checks arbitrary runtime [`Value`]s against them. A
//! failed check yields a structured [`CheckError`] tree that pinpoints where
//! and why the value diverged.
//!
//! ```
//! use gatekeep_core::{check, Descriptor, Shape, Value};
//!
//! let user = Descriptor::from(
//!     Shape::new()
//!         .field("name", Descriptor::string())
//!         .field("tags", Descriptor::array_of(Descriptor::string())),
//! );
//! let value = Value::object([
//!     ("name", Value::from("ada")),
//!     ("tags", Value::array([Value::from("admin")])),
//! ]);
//! assert!(check(&user, &value).is_ok());
//! ```
//!
//! ## Key Design Principles
//!
//! 1. **Errors are values.** [`check`] never panics on a non-conforming
//!    value and never raises; the first failure path comes back as data.
//!
//! 2. **Closed descriptor model.** Tagged descriptors are enum variants, so a
//!    plain literal or structural shape can never be mistaken for one.
//!
//! 3. **Deterministic traversal.** Predicates run in value key order, array
//!    index order and union declaration order. See [`matcher`].
//!
//! 4. **Strict shapes.** Structural shapes reject undeclared keys unless a
//!    [`WILDCARD`] entry covers them.
//!
//! ## Crate Policy
//!
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - Descriptors and values are `Send + Sync`; checks share no state.

pub mod descriptor;
pub mod error;
pub mod guard;
pub mod matcher;
pub mod value;

mod convert;
mod serialize;

// Re-export primary types for ergonomic imports.
pub use descriptor::{
    join, Checker, Descriptor, Family, OptionalShape, Predicate, Shape, ShapeKey, Verdict,
    WILDCARD, WILDCARD_LABEL,
};
pub use error::{CheckError, CheckerResult, DescriptorError, ValueConversionError};
pub use guard::{guard, TypeGuard};
pub use matcher::check;
pub use value::{Boxed, Function, Object, PropertyMap, Symbol, Value};
