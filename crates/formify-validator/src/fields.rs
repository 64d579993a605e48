//! # Field Types
//!
//! A field type supplies the type-specific half of the processing pipeline:
//! the target type, the instance check, the string conversion and an
//! optional reshaping step run before conversion. The validator drives the
//! pipeline and owns state; the field type is stateless.
//!
//! ## Built-ins
//!
//! | Type | Target | Accepts before conversion |
//! |------|--------|---------------------------|
//! | [`StringField`] | `str` | numbers and booleans (rendered as text) |
//! | [`IntegerField`] | `int` | floats without a fractional part |
//! | [`FloatField`] | `float` | integers |
//! | [`BooleanField`] | `bool` | `0` / `1` |
//! | [`ListField`] | element's | a list of element inputs |
//!
//! Every built-in treats `null` as absence (it becomes `Undefined`) and
//! rejects any other shape with a collectable [`FieldError::Invalid`].

use std::fmt;
use std::rc::Rc;

use formify_core::{FieldError, Value, ValueType};
use serde::{Deserialize, Serialize};

/// Closed set of field kinds, used as the visitor dispatch tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    String,
    Integer,
    Float,
    Boolean,
    List,
    /// Any field type defined outside this crate.
    Custom,
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Boolean => "boolean",
            Self::List => "list",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Type-specific behavior of a field.
///
/// For multivalue types every method except [`FieldType::prevalidate`]
/// works on a single element; the validator applies them element-wise.
pub trait FieldType: fmt::Debug {
    /// Visitor dispatch tag.
    fn kind(&self) -> FieldKind;

    /// Display name of the type, e.g. `Integer`.
    fn name(&self) -> &str;

    /// The type processed values must have.
    fn target_type(&self) -> ValueType;

    /// `true` if the field holds an ordered sequence of values.
    fn multivalue(&self) -> bool {
        false
    }

    /// Element type of a multivalue field.
    fn element(&self) -> Option<&dyn FieldType> {
        None
    }

    /// Does `value` already have the target type?
    fn typecheck(&self, value: &Value) -> bool {
        value.value_type() == Some(self.target_type())
    }

    /// Reshape input that is neither the target type nor a string.
    fn prevalidate(&self, value: Value) -> Result<Value, FieldError> {
        Ok(value)
    }

    /// Convert text into the target type.
    fn from_string(&self, text: &str) -> Result<Value, FieldError> {
        self.target_type().construct_from_str(text)
    }
}

fn unsupported(expected: ValueType, value: &Value) -> FieldError {
    FieldError::invalid(format!("expected {expected}, got {}", value.type_name()))
}

// ─── Scalars ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default)]
pub struct StringField;

impl FieldType for StringField {
    fn kind(&self) -> FieldKind {
        FieldKind::String
    }

    fn name(&self) -> &str {
        "String"
    }

    fn target_type(&self) -> ValueType {
        ValueType::Str
    }

    fn prevalidate(&self, value: Value) -> Result<Value, FieldError> {
        match value {
            Value::Null => Ok(Value::Undefined),
            Value::Bool(_) | Value::Int(_) | Value::Float(_) => Ok(Value::Str(value.to_string())),
            Value::List(_) | Value::Map(_) => Err(unsupported(ValueType::Str, &value)),
            other => Ok(other),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct IntegerField;

impl FieldType for IntegerField {
    fn kind(&self) -> FieldKind {
        FieldKind::Integer
    }

    fn name(&self) -> &str {
        "Integer"
    }

    fn target_type(&self) -> ValueType {
        ValueType::Int
    }

    fn prevalidate(&self, value: Value) -> Result<Value, FieldError> {
        match value {
            Value::Null => Ok(Value::Undefined),
            Value::Float(n) if n.fract() == 0.0 && n.abs() < i64::MAX as f64 => Ok(Value::Int(n as i64)),
            Value::Bool(_) | Value::Float(_) | Value::List(_) | Value::Map(_) => {
                Err(unsupported(ValueType::Int, &value))
            }
            other => Ok(other),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FloatField;

impl FieldType for FloatField {
    fn kind(&self) -> FieldKind {
        FieldKind::Float
    }

    fn name(&self) -> &str {
        "Float"
    }

    fn target_type(&self) -> ValueType {
        ValueType::Float
    }

    fn prevalidate(&self, value: Value) -> Result<Value, FieldError> {
        match value {
            Value::Null => Ok(Value::Undefined),
            Value::Int(n) => Ok(Value::Float(n as f64)),
            Value::Bool(_) | Value::List(_) | Value::Map(_) => Err(unsupported(ValueType::Float, &value)),
            other => Ok(other),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanField;

impl BooleanField {
    const TRUE_WORDS: [&'static str; 4] = ["true", "yes", "on", "1"];
    const FALSE_WORDS: [&'static str; 4] = ["false", "no", "off", "0"];
}

impl FieldType for BooleanField {
    fn kind(&self) -> FieldKind {
        FieldKind::Boolean
    }

    fn name(&self) -> &str {
        "Boolean"
    }

    fn target_type(&self) -> ValueType {
        ValueType::Bool
    }

    fn prevalidate(&self, value: Value) -> Result<Value, FieldError> {
        match value {
            Value::Null => Ok(Value::Undefined),
            Value::Int(0) => Ok(Value::Bool(false)),
            Value::Int(1) => Ok(Value::Bool(true)),
            Value::Int(_) | Value::Float(_) | Value::List(_) | Value::Map(_) => {
                Err(unsupported(ValueType::Bool, &value))
            }
            other => Ok(other),
        }
    }

    fn from_string(&self, text: &str) -> Result<Value, FieldError> {
        let word = text.trim().to_ascii_lowercase();
        if Self::TRUE_WORDS.contains(&word.as_str()) {
            Ok(Value::Bool(true))
        } else if Self::FALSE_WORDS.contains(&word.as_str()) {
            Ok(Value::Bool(false))
        } else {
            Err(FieldError::conversion(text))
        }
    }
}

// ─── Sequences ───────────────────────────────────────────────────────

/// Multivalue field holding a list of `element` values.
#[derive(Debug, Clone)]
pub struct ListField {
    element: Rc<dyn FieldType>,
    name: String,
}

impl ListField {
    pub fn new(element: impl FieldType + 'static) -> Self {
        Self::of(Rc::new(element))
    }

    pub fn of(element: Rc<dyn FieldType>) -> Self {
        let name = format!("List[{}]", element.name());
        Self { element, name }
    }
}

impl FieldType for ListField {
    fn kind(&self) -> FieldKind {
        FieldKind::List
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn target_type(&self) -> ValueType {
        self.element.target_type()
    }

    fn multivalue(&self) -> bool {
        true
    }

    fn element(&self) -> Option<&dyn FieldType> {
        Some(self.element.as_ref())
    }

    fn typecheck(&self, value: &Value) -> bool {
        self.element.typecheck(value)
    }

    /// Reshapes each element; elements that turn out absent are dropped.
    fn prevalidate(&self, value: Value) -> Result<Value, FieldError> {
        match value {
            Value::Null => Ok(Value::Undefined),
            Value::List(items) => {
                let mut kept = Vec::with_capacity(items.len());
                for item in items {
                    let item = self.element.prevalidate(item)?;
                    if item.is_defined() {
                        kept.push(item);
                    }
                }
                Ok(Value::List(kept))
            }
            other => Ok(other),
        }
    }

    fn from_string(&self, text: &str) -> Result<Value, FieldError> {
        self.element.from_string(text)
    }
}
