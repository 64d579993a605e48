//! # formify-validator — Validator Binding & Processing Engine
//!
//! Schemas are declared once as lists of prototype validators and
//! instantiated many times. Each instantiation binds every prototype to a
//! fresh owner, and the bound instances convert raw (often textual) input
//! into typed [`Value`](formify_core::Value)s and collect per-field errors.
//!
//! ## Lifecycle (`validator`, `owner`)
//!
//! - [`Validator::bind`] produces a bound instance stored in the owner's
//!   bound-validator map and returned as a [`SharedValidator`].
//! - Bound instances refer to their owner through [`OwnerRef`], a weak
//!   handle; dropping the owner orphans them instead of keeping it alive.
//! - [`Validator::process`] runs the typecheck, prevalidate, conversion,
//!   postvalidate pipeline; [`Validator::is_valid`] adds the required check
//!   and the `validate` listeners.
//!
//! ## Extension Points (`fields`, `event`, `visitor`)
//!
//! - [`FieldType`] supplies target type, type check and string conversion.
//! - Listeners attached through [`ValidatorBuilder::on`] transform values at
//!   each stage; [`ValidatorBuilder::on_bind`] replaces the bind strategy.
//! - [`ValidatorVisitor`] dispatches over the closed [`FieldKind`] set.
//!
//! ## Schemas (`schema`, `descriptor`)
//!
//! [`Schema`] and [`Form`] group validators; descriptors load schemas from
//! YAML or JSON.
//!
//! ## Crate Policy
//!
//! - Depends only on `formify-core` internally.
//! - Single-threaded: shared state is `Rc`/`RefCell`, nothing is `Send`.
//! - Errors the caller must see are never collected into field errors.

pub mod config;
pub mod descriptor;
pub mod event;
pub mod fields;
pub mod owner;
pub mod schema;
pub mod validator;
pub mod visitor;

pub use config::{DefaultValue, Label, ValidatorBuilder, ValidatorConfig};
pub use descriptor::{FieldDescriptor, SchemaDescriptor};
pub use event::{AliasMode, Binder, Event, EventSlots, Hooks, Listener, Priority};
pub use fields::{BooleanField, FieldKind, FieldType, FloatField, IntegerField, ListField, StringField};
pub use owner::{Owner, OwnerRef, SharedValidator};
pub use schema::{Form, Schema};
pub use validator::{Validator, REQUIRED_MESSAGE};
pub use visitor::{DescribeVisitor, ValidatorVisitor};
