//! Self-describing status-report values
//!
//! INFO fields are untyped text; a field value is either a scalar
//! (integer, float, or free string) or a comma-separated `key=value`
//! list that becomes a nested map. Coercion is shape-driven: numeric
//! parse first, string fallback, never an error.

use std::collections::HashMap;

/// A parsed status-report field value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Str(String),
    Map(HashMap<String, Value>),
}

impl Value {
    /// Get as integer
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Get as float, widening integers
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Get as string slice
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Get as nested map
    pub fn as_map(&self) -> Option<&HashMap<String, Value>> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }
}

/// Coerce a raw field value into a typed [`Value`].
///
/// A value containing both a list separator (`,`) and an assignment
/// (`=`) is a nested `key=value` list; each token splits at its last
/// `=` and recurses. Anything else takes the scalar path: integer
/// parse, then float parse, then the string as-is. Tokens without an
/// `=` are dropped rather than failing the whole value.
pub fn coerce(raw: &str) -> Value {
    if !raw.contains(',') || !raw.contains('=') {
        if let Ok(i) = raw.parse::<i64>() {
            return Value::Int(i);
        }
        if let Ok(f) = raw.parse::<f64>() {
            return Value::Float(f);
        }
        Value::Str(raw.to_string())
    } else {
        let mut map = HashMap::new();
        for item in raw.split(',') {
            if let Some((k, v)) = item.rsplit_once('=') {
                map.insert(k.to_string(), coerce(v));
            }
        }
        Value::Map(map)
    }
}
