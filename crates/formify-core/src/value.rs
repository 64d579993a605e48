//! # Value Model
//!
//! Raw input reaching a validator is rarely typed: form posts and query
//! strings deliver text, JSON and YAML documents deliver loosely typed trees.
//! [`Value`] is the dynamic representation flowing through every processing
//! stage, and [`ValueType`] names the target type a field converts into.
//!
//! ## Interop
//!
//! `Value` converts from `serde_json::Value` and implements `Serialize` /
//! `Deserialize`, so any self-describing serde format (JSON, YAML) can feed
//! the validators directly. `Undefined` serializes as `null`; it has no
//! representation in those formats.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::FieldError;
use crate::undefined::Undefined;

/// A dynamically typed input or output value.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    /// No value at all. Distinct from every other variant, including `Null`.
    #[default]
    Undefined,
    /// Explicit null.
    Null,
    /// Boolean.
    Bool(bool),
    /// 64-bit signed integer.
    Int(i64),
    /// 64-bit float.
    Float(f64),
    /// UTF-8 string.
    Str(String),
    /// Ordered sequence.
    List(Vec<Value>),
    /// String-keyed mapping with deterministic key order.
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// Returns `true` only for the `Undefined` sentinel.
    pub fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    /// Returns `true` for every value except `Undefined`.
    pub fn is_defined(&self) -> bool {
        !self.is_undefined()
    }

    /// The concrete type of this value, or `None` for `Undefined`.
    pub fn value_type(&self) -> Option<ValueType> {
        match self {
            Self::Undefined => None,
            Self::Null => Some(ValueType::Null),
            Self::Bool(_) => Some(ValueType::Bool),
            Self::Int(_) => Some(ValueType::Int),
            Self::Float(_) => Some(ValueType::Float),
            Self::Str(_) => Some(ValueType::Str),
            Self::List(_) => Some(ValueType::List),
            Self::Map(_) => Some(ValueType::Map),
        }
    }

    /// Type name used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        self.value_type().map_or("undefined", |t| t.as_str())
    }

    /// The payload of a `Str`, `None` for every other variant.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The payload of a `Int`, `None` for every other variant.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// The payload of a `Float`, `None` for every other variant.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// The payload of a `Bool`, `None` for every other variant.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The payload of a `List`, `None` for every other variant.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// The payload of a `Map`, `None` for every other variant.
    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    /// Strings render raw (no quotes) so that error messages quote exactly
    /// what the user typed.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => fmt::Display::fmt(&Undefined, f),
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::Str(s) => f.write_str(s),
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Map(map) => {
                f.write_str("{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                f.write_str("}")
            }
        }
    }
}

// ─── Conversions ─────────────────────────────────────────────────────

impl From<Undefined> for Value {
    fn from(_: Undefined) -> Self {
        Self::Undefined
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Int(i64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Self::Int(i64::from(n))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    /// `None` maps to `Null`, never to `Undefined`.
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Self::Null, Into::into)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Self::Map(map)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                None => Self::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Self::Str(s),
            serde_json::Value::Array(items) => {
                Self::List(items.into_iter().map(Self::from).collect())
            }
            serde_json::Value::Object(obj) => {
                Self::Map(obj.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

impl From<Value> for serde_json::Value {
    /// Lossy at the edges: `Undefined` and non-finite floats become `null`.
    fn from(value: Value) -> Self {
        match value {
            Value::Undefined | Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Int(n) => Self::from(n),
            Value::Float(n) => serde_json::Number::from_f64(n).map_or(Self::Null, Self::Number),
            Value::Str(s) => Self::String(s),
            Value::List(items) => Self::Array(items.into_iter().map(Self::from).collect()),
            Value::Map(map) => Self::Object(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect()),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Undefined | Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Int(n) => serializer.serialize_i64(*n),
            Self::Float(n) => serializer.serialize_f64(*n),
            Self::Str(s) => serializer.serialize_str(s),
            Self::List(items) => items.serialize(serializer),
            Self::Map(map) => map.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Self::from)
    }
}

// ─── Value Types ─────────────────────────────────────────────────────

/// The concrete type a field converts its input into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    /// [`Value::Null`].
    Null,
    /// [`Value::Bool`].
    Bool,
    /// [`Value::Int`].
    Int,
    /// [`Value::Float`].
    Float,
    /// [`Value::Str`].
    Str,
    /// [`Value::List`].
    List,
    /// [`Value::Map`].
    Map,
}

impl ValueType {
    /// Returns the snake_case identifier for this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::Str => "str",
            Self::List => "list",
            Self::Map => "map",
        }
    }

    /// Construct a value of this type from text.
    ///
    /// This is the default string conversion used by field types that do
    /// not provide their own. Numeric types ignore surrounding whitespace.
    ///
    /// # Errors
    ///
    /// - [`FieldError::Conversion`] when the text does not parse.
    /// - [`FieldError::Type`] when the type has no textual constructor.
    pub fn construct_from_str(&self, text: &str) -> Result<Value, FieldError> {
        match self {
            Self::Str => Ok(Value::Str(text.to_owned())),
            Self::Int => text
                .trim()
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|_| FieldError::conversion(text)),
            Self::Float => text
                .trim()
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|_| FieldError::conversion(text)),
            Self::Null | Self::Bool | Self::List | Self::Map => Err(FieldError::Type(format!(
                "cannot construct {self} from a string"
            ))),
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undefined_has_no_type() {
        assert_eq!(Value::Undefined.value_type(), None);
        assert_eq!(Value::Undefined.type_name(), "undefined");
        assert_eq!(Value::Null.value_type(), Some(ValueType::Null));
    }

    #[test]
    fn option_none_is_null_not_undefined() {
        let v: Value = Option::<i64>::None.into();
        assert_eq!(v, Value::Null);
        assert!(v.is_defined());
    }

    #[test]
    fn int_construction_trims_whitespace() {
        assert_eq!(ValueType::Int.construct_from_str(" 42 ").unwrap(), Value::Int(42));
    }

    #[test]
    fn int_construction_failure_is_conversion_error() {
        let err = ValueType::Int.construct_from_str("abc").unwrap_err();
        assert_eq!(err, FieldError::conversion("abc"));
        assert_eq!(err.to_string(), "unable to convert 'abc' to desired type");
    }

    #[test]
    fn list_has_no_textual_constructor() {
        let err = ValueType::List.construct_from_str("a,b").unwrap_err();
        assert!(matches!(err, FieldError::Type(_)));
    }

    #[test]
    fn json_numbers_keep_integer_precision() {
        let v = Value::from(serde_json::json!({"n": 9007199254740993_i64, "x": 1.5}));
        let map = v.as_map().unwrap();
        assert_eq!(map["n"], Value::Int(9_007_199_254_740_993));
        assert_eq!(map["x"], Value::Float(1.5));
    }

    #[test]
    fn undefined_serializes_as_null() {
        let json = serde_json::to_string(&Value::List(vec![Value::Undefined, Value::Int(1)])).unwrap();
        assert_eq!(json, "[null,1]");
    }

    #[test]
    fn deserializes_from_json_document() {
        let v: Value = serde_json::from_str(r#"{"tags": ["a", "b"], "age": "42"}"#).unwrap();
        assert_eq!(v.as_map().unwrap()["age"], Value::from("42"));
        assert_eq!(v.as_map().unwrap()["tags"], Value::from(vec!["a", "b"]));
    }

    #[test]
    fn display_renders_strings_raw() {
        assert_eq!(Value::from("abc").to_string(), "abc");
        assert_eq!(Value::from(vec![1, 2]).to_string(), "[1, 2]");
    }
}
