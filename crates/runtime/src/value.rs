//! Typed parameter values and best-effort coercion.

use std::collections::BTreeMap;

use serde::Serialize;

/// Raw key/value parameters extracted from a directive.
pub type Params = BTreeMap<String, Value>;

/// A coerced parameter value.
///
/// Untagged serialization so params embed naturally into JSON payloads.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Numeric view; integers widen to float.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

/// Coerce a textual token into a typed value.
///
/// First match wins: an integer pattern becomes `Int`, anything that
/// parses as a float becomes `Float`, everything else stays a `Str`.
/// There is no failure mode; the string form is the universal fallback.
pub fn coerce(raw: &str) -> Value {
    if is_integer(raw) {
        if let Ok(n) = raw.parse::<i64>() {
            return Value::Int(n);
        }
    }
    if let Ok(f) = raw.parse::<f64>() {
        return Value::Float(f);
    }
    Value::Str(raw.to_string())
}

fn is_integer(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_coerce_to_int() {
        assert_eq!(coerce("5000"), Value::Int(5000));
        assert_eq!(coerce("-12"), Value::Int(-12));
        assert_eq!(coerce("0"), Value::Int(0));
    }

    #[test]
    fn decimals_coerce_to_float() {
        assert_eq!(coerce("120000.5"), Value::Float(120000.5));
        assert_eq!(coerce("-0.25"), Value::Float(-0.25));
    }

    #[test]
    fn everything_else_stays_text() {
        assert_eq!(coerce("Cochabamba"), Value::Str("Cochabamba".into()));
        assert_eq!(coerce("12abc"), Value::Str("12abc".into()));
        assert_eq!(coerce("-"), Value::Str("-".into()));
        assert_eq!(coerce(""), Value::Str(String::new()));
    }

    #[test]
    fn int_widens_through_as_f64() {
        assert_eq!(Value::Int(5000).as_f64(), Some(5000.0));
        assert_eq!(Value::Str("x".into()).as_f64(), None);
    }
}
