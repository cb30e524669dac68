//! Cell values.

use std::fmt;

use serde::Serialize;

/// A single dataset cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Text(String),
    Number(f64),
    /// Empty cell or a value that could not be produced.
    Missing,
}

impl Value {
    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }

    /// Convert a raw CSV field; empty fields are missing.
    pub(crate) fn from_field(field: &str) -> Self {
        if field.is_empty() {
            Value::Missing
        } else {
            Value::Text(field.to_string())
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    /// Text content, if this is a text cell.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric view with coercion: numeric text parses, anything else
    /// (including NaN) is treated as missing.
    pub fn as_f64(&self) -> Option<f64> {
        let n = match self {
            Value::Number(n) => *n,
            Value::Text(s) => s.trim().parse::<f64>().ok()?,
            Value::Missing => return None,
        };
        if n.is_nan() {
            None
        } else {
            Some(n)
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => f.write_str(s),
            Value::Number(n) => write!(f, "{}", n),
            Value::Missing => Ok(()),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_field_is_missing() {
        assert!(Value::from_field("").is_missing());
        assert_eq!(Value::from_field(" "), Value::text(" "));
    }

    #[test]
    fn numeric_coercion() {
        assert_eq!(Value::text(" 0.25 ").as_f64(), Some(0.25));
        assert_eq!(Value::text("-1").as_f64(), Some(-1.0));
        assert_eq!(Value::text("positive").as_f64(), None);
        assert_eq!(Value::Number(f64::NAN).as_f64(), None);
        assert_eq!(Value::Missing.as_f64(), None);
    }

    #[test]
    fn display_and_json() {
        assert_eq!(Value::Number(0.5).to_string(), "0.5");
        assert_eq!(Value::Missing.to_string(), "");
        assert_eq!(serde_json::to_string(&Value::Missing).unwrap(), "null");
        assert_eq!(serde_json::to_string(&Value::text("ok")).unwrap(), "\"ok\"");
    }
}
