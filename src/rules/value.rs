//! Dynamic values looked up from fields and properties.
//!
//! A lookup that finds nothing returns `None`; `Value` itself has no null
//! variant so absence can never be mistaken for a concrete value.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

static NUMERIC_STRING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[ \t\n\r\x0B\x0C]*[+-]?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[eE][+-]?[0-9]+)?[ \t\n\r\x0B\x0C]*$")
        .expect("numeric string regex is valid")
});

/// A concrete field or property value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

/// Numeric reading of a string, keeping integers exact when possible
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    fn as_f64(self) -> f64 {
        match self {
            Number::Int(i) => i as f64,
            Number::Float(f) => f,
        }
    }

    fn loose_eq(self, other: Number) -> bool {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => a == b,
            (a, b) => a.as_f64() == b.as_f64(),
        }
    }
}

pub(crate) fn parse_numeric(s: &str) -> Option<Number> {
    if !NUMERIC_STRING.is_match(s) {
        return None;
    }
    let trimmed = s.trim_matches(|c: char| c.is_ascii_whitespace() || c == '\x0B');
    if let Ok(i) = trimmed.parse::<i64>() {
        return Some(Number::Int(i));
    }
    trimmed.parse::<f64>().ok().map(Number::Float)
}

/// Truthiness of a string when compared against a boolean
fn string_truthy(s: &str) -> bool {
    !(s.is_empty() || s == "0")
}

impl Value {
    /// Interpret a literal typed on the command line or in a config file.
    ///
    /// `true`/`false` become booleans, integers and decimals become numbers,
    /// anything else stays a string.
    pub fn parse_literal(literal: &str) -> Self {
        match literal {
            "true" => return Value::Bool(true),
            "false" => return Value::Bool(false),
            _ => {}
        }
        if let Ok(i) = literal.parse::<i64>() {
            return Value::Int(i);
        }
        if literal == literal.trim() {
            if let Some(Number::Float(f)) = parse_numeric(literal) {
                return Value::Float(f);
            }
        }
        Value::String(literal.to_string())
    }

    /// Loose comparison with a literal string, coercing numeric strings.
    ///
    /// Numbers compare numerically against numeric strings and textually
    /// against anything else. Booleans compare against the string's truthiness.
    pub fn loose_eq_str(&self, literal: &str) -> bool {
        match self {
            Value::Bool(b) => *b == string_truthy(literal),
            Value::Int(i) => match parse_numeric(literal) {
                Some(n) => Number::Int(*i).loose_eq(n),
                None => i.to_string() == literal,
            },
            Value::Float(f) => match parse_numeric(literal) {
                Some(n) => Number::Float(*f).loose_eq(n),
                None => self.to_string() == literal,
            },
            Value::String(s) => match (parse_numeric(s), parse_numeric(literal)) {
                (Some(a), Some(b)) => a.loose_eq(b),
                _ => s == literal,
            },
        }
    }

    /// Strict comparison: only a string with identical content is equal
    pub fn strict_eq_str(&self, literal: &str) -> bool {
        matches!(self, Value::String(s) if s == literal)
    }
}

/// Textual form used when a value is tested against a raw pattern
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(true) => write!(f, "1"),
            Value::Bool(false) => Ok(()),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) if x.is_finite() && x.fract() == 0.0 && x.abs() < 1e15 => {
                write!(f, "{}", *x as i64)
            }
            Value::Float(x) => write!(f, "{}", x),
            Value::String(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loose_eq_numeric_coercion() {
        assert!(Value::Int(1).loose_eq_str("1"));
        assert!(Value::Int(1).loose_eq_str("1.0"));
        assert!(Value::Int(10).loose_eq_str("1e1"));
        assert!(Value::Float(0.5).loose_eq_str(".5"));
        assert!(Value::from("01").loose_eq_str("1"));
        assert!(Value::from(" 1").loose_eq_str("1"));
        assert!(!Value::Int(1).loose_eq_str("2"));
    }

    #[test]
    fn test_loose_eq_non_numeric_strings() {
        assert!(Value::from("ok").loose_eq_str("ok"));
        assert!(!Value::from("ok").loose_eq_str("OK"));
        assert!(!Value::Int(1).loose_eq_str("1abc"));
        assert!(!Value::from("abc").loose_eq_str("0"));
    }

    #[test]
    fn test_loose_eq_bool_uses_truthiness() {
        assert!(Value::Bool(true).loose_eq_str("yes"));
        assert!(Value::Bool(false).loose_eq_str("0"));
        assert!(!Value::Bool(false).loose_eq_str("1"));
    }

    #[test]
    fn test_strict_eq_requires_string() {
        assert!(Value::from("1").strict_eq_str("1"));
        assert!(!Value::Int(1).strict_eq_str("1"));
        assert!(!Value::Bool(true).strict_eq_str("1"));
    }

    #[test]
    fn test_parse_literal() {
        assert_eq!(Value::parse_literal("42"), Value::Int(42));
        assert_eq!(Value::parse_literal("-1.5"), Value::Float(-1.5));
        assert_eq!(Value::parse_literal("true"), Value::Bool(true));
        assert_eq!(Value::parse_literal("inf"), Value::from("inf"));
        assert_eq!(Value::parse_literal("hello"), Value::from("hello"));
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Bool(true).to_string(), "1");
        assert_eq!(Value::Bool(false).to_string(), "");
        assert_eq!(Value::Float(2.0).to_string(), "2");
        assert_eq!(Value::Float(2.5).to_string(), "2.5");
        assert_eq!(Value::Int(-3).to_string(), "-3");
    }
}
