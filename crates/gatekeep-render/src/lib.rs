//! # gatekeep-render — Error Presentation
//!
//! Formats the [`CheckError`](gatekeep_core::CheckError) trees produced by
//! `gatekeep-core`:
//!
//! - [`text`]: indented English sentences for people.
//! - [`json`]: the `{"e": ...}` / `{"t": ...}` / `{"v": ...}` wire form for
//!   machines.
//!
//! Both are pure functions of the error value.

pub mod json;
pub mod text;

pub use json::{descriptor_to_json, error_to_json, error_to_string_pretty};
pub use text::{render, type_label};
