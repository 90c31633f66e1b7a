//! Scalar Values
//!
//! Benchmark metadata and result records are maps from string keys to a
//! small closed set of scalar variants. Filters and rendering compare values
//! after stringification, so `Display` defines the canonical text form.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A scalar metadata or result value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Boolean flag
    Bool(bool),
    /// Numeric value (integers are stored as whole floats)
    Num(f64),
    /// Free-form string
    Str(String),
}

impl Value {
    /// Numeric view of this value, if it has one.
    ///
    /// Strings that parse as numbers count as numeric so that axis sorting
    /// can order `"2"` before `"10"`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Num(n) => Some(*n),
            Value::Str(s) => s.trim().parse().ok(),
            Value::Bool(_) => None,
        }
    }

    /// String view without allocating, when the value is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            // Whole numbers print without a trailing ".0" so that command
            // templates and filter comparisons see "3", not "3.0".
            Value::Num(n) if n.fract() == 0.0 && n.is_finite() && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            Value::Num(n) => write!(f, "{}", n),
            Value::Str(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Num(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Num(n as f64)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Num(n as f64)
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Num(n as f64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_numbers_display_without_fraction() {
        assert_eq!(Value::Num(3.0).to_string(), "3");
        assert_eq!(Value::Num(-16.0).to_string(), "-16");
        assert_eq!(Value::Num(1.5).to_string(), "1.5");
    }

    #[test]
    fn numeric_strings_have_a_numeric_view() {
        assert_eq!(Value::Str("10".into()).as_f64(), Some(10.0));
        assert_eq!(Value::Str("2.5".into()).as_f64(), Some(2.5));
        assert_eq!(Value::Str("fast".into()).as_f64(), None);
        assert_eq!(Value::Bool(true).as_f64(), None);
    }

    #[test]
    fn serializes_as_bare_scalars() {
        assert_eq!(serde_json::to_string(&Value::Num(2.5)).unwrap(), "2.5");
        assert_eq!(
            serde_json::to_string(&Value::Str("x".into())).unwrap(),
            "\"x\""
        );
        assert_eq!(serde_json::to_string(&Value::Bool(true)).unwrap(), "true");
    }
}
