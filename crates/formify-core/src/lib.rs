//! # formify-core — Foundational Types for formify
//!
//! This crate is the leaf of the formify workspace. It defines the value
//! model every validator converts into, the sentinel that marks "no value",
//! the error hierarchy shared by all crates, and a generic dict-like adapter.
//!
//! ## Key Design Principles
//!
//! 1. **`Undefined` is not `Null`.** Absence of a value is a distinct
//!    variant of [`Value`], never an empty string, zero or `Null`. Code that
//!    asks "was anything provided?" matches on `Value::Undefined`, it never
//!    relies on truthiness.
//!
//! 2. **Two error tiers.** [`FieldError`] describes a problem with one input
//!    value and may be collected into a field's error list. [`FormError`]
//!    describes a structural fault (binding twice, unbinding a detached
//!    validator, a misconfigured field type) and always propagates.
//!
//! 3. **Mapping capability, not inheritance.** Any container implementing the
//!    five-method [`MappingAccess`] trait gets the whole [`DictLike`] surface
//!    for free.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `formify-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

#![deny(missing_docs)]

pub mod error;
pub mod mapping;
pub mod undefined;
pub mod value;

// Re-export primary types for ergonomic imports.
pub use error::{FieldError, FormError, FormResult};
pub use mapping::{DictLike, MappingAccess};
pub use undefined::Undefined;
pub use value::{Value, ValueType};
