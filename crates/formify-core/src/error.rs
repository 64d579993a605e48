//! # Error Types — Two-Tier Error Hierarchy
//!
//! All errors use `thiserror` for derive-based `Display` and `Error`
//! implementations.
//!
//! ## Design
//!
//! - [`FieldError`] is about one input value. A bound validator turns it
//!   into an entry of its error list; an unbound validator returns it to the
//!   caller.
//! - [`FormError`] is about the program. Binding faults and a field type that
//!   cannot produce its own target type are never collected, they always
//!   reach the caller.

use std::fmt;

use thiserror::Error;

/// A problem with a single input value.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FieldError {
    /// A hook rejected the value as semantically invalid.
    #[error("{0}")]
    Invalid(String),

    /// Text could not be converted into the field's target type.
    #[error("unable to convert '{value}' to desired type")]
    Conversion {
        /// The offending input, rendered as text.
        value: String,
    },

    /// The value has a shape the conversion step cannot handle.
    #[error("{0}")]
    Type(String),
}

impl FieldError {
    /// A [`FieldError::Invalid`] with `message`.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }

    /// A [`FieldError::Conversion`] naming the rejected input.
    pub fn conversion(value: impl fmt::Display) -> Self {
        Self::Conversion {
            value: value.to_string(),
        }
    }

    /// Errors collected by the validation stages (prevalidate, postvalidate,
    /// validate).
    pub fn is_value_error(&self) -> bool {
        matches!(self, Self::Invalid(_) | Self::Conversion { .. })
    }

    /// Errors collected by the string conversion stage.
    pub fn is_type_error(&self) -> bool {
        matches!(self, Self::Type(_) | Self::Conversion { .. })
    }
}

/// Top-level error type for formify.
#[derive(Error, Debug)]
pub enum FormError {
    /// `bind` was called on a validator that already has an owner.
    #[error("validator already bound: {validator} -> {owner}")]
    AlreadyBound {
        /// The validator that was asked to bind.
        validator: String,
        /// The owner it is currently bound to.
        owner: String,
    },

    /// An operation that needs an owner was called on a detached validator.
    #[error("validator not bound: {0}")]
    NotBound(String),

    /// A field type's conversion produced a value it does not accept itself.
    /// This is a defect in the field type, not in the input.
    #[error("validator {validator} was unable to convert {value} to valid type")]
    TypeMismatch {
        /// The misbehaving validator.
        validator: String,
        /// The value left after conversion.
        value: String,
    },

    /// Lookup of an absent key in a mapping.
    #[error("key not found: {0}")]
    KeyNotFound(String),

    /// A schema descriptor could not be parsed or is inconsistent.
    #[error("invalid schema descriptor: {0}")]
    Descriptor(String),

    /// A per-field error that was not collected.
    #[error(transparent)]
    Field(#[from] FieldError),

    /// IO error reading a descriptor.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for formify operations.
pub type FormResult<T> = Result<T, FormError>;
