//! # Undefined — The "No Value" Sentinel
//!
//! `Undefined` marks the absence of a value, as opposed to any value that
//! happens to be empty (`Null`, `""`, `0`, an empty list). It is a
//! zero-sized type: every `Undefined` is the same value, so comparison is
//! identity comparison.
//!
//! Inside the dynamic value model the sentinel travels as
//! [`Value::Undefined`](crate::Value::Undefined); `Value::from(Undefined)`
//! produces it and `Value::is_undefined()` tests for it.

use std::fmt;

use crate::value::Value;

/// The process-wide "no value" marker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Undefined;

impl Undefined {
    /// Stable textual representation of the sentinel.
    pub const TEXT: &'static str = "Undefined";
}

impl fmt::Display for Undefined {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(Self::TEXT)
    }
}

impl PartialEq<Value> for Undefined {
    fn eq(&self, other: &Value) -> bool {
        other.is_undefined()
    }
}

impl PartialEq<Undefined> for Value {
    fn eq(&self, _other: &Undefined) -> bool {
        self.is_undefined()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_stable() {
        assert_eq!(Undefined.to_string(), "Undefined");
        assert_eq!(format!("{}", Value::Undefined), "Undefined");
    }

    #[test]
    fn only_undefined_equals_the_sentinel() {
        assert_eq!(Value::from(Undefined), Undefined);
        assert_ne!(Value::Null, Undefined);
        assert_ne!(Value::from(""), Undefined);
        assert_ne!(Value::from(0), Undefined);
        assert_ne!(Value::List(vec![]), Undefined);
    }
}
