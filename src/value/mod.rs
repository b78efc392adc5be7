//! Value Module
//!
//! Typed setting values and their storage encoding.
//!
//! ## Responsibilities
//! - Closed variant over the six supported kinds
//! - Format tags and kind → tag inference
//! - Encode/decode between values and their storage-safe string form
//!
//! ## Storage Forms
//! ```text
//! ┌──────────┬──────────────────────┬──────────────────────────────┐
//! │ Format   │ Stored as            │ Decoded from                 │
//! ├──────────┼──────────────────────┼──────────────────────────────┤
//! │ string   │ as-is                │ as-is                        │
//! │ array    │ JSON array           │ JSON array                   │
//! │ hash     │ JSON object          │ JSON object                  │
//! │ boolean  │ "true" / "false"     │ "true" → true, else false    │
//! │ integer  │ decimal              │ numeric prefix, else 0       │
//! │ float    │ decimal              │ numeric prefix, else 0.0     │
//! └──────────┴──────────────────────┴──────────────────────────────┘
//! ```

mod codec;
mod format;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

pub use codec::{decode, decode_as, encode, encode_as, parse_float_prefix, parse_int_prefix};
pub use format::FormatTag;

/// A decoded setting value.
///
/// Nested array and hash members use the same six kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    // Variant order drives untagged deserialization: integers must be tried
    // before floats.
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Array(Vec<Value>),
    Hash(BTreeMap<String, Value>),
}

impl Value {
    /// The canonical format tag for this value's kind.
    pub fn format(&self) -> FormatTag {
        FormatTag::infer(self)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Float view; integers widen.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_hash(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Hash(map) => Some(map),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => f.write_str(s),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Array(_) | Value::Hash(_) => {
                let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
                f.write_str(&json)
            }
        }
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i64::from(i))
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Value::Integer(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Value::Hash(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions() {
        assert_eq!(Value::from("x"), Value::String("x".into()));
        assert_eq!(Value::from(3), Value::Integer(3));
        assert_eq!(Value::from(vec!["a", "b"]).as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_accessors() {
        assert_eq!(Value::from(5).as_f64(), Some(5.0));
        assert_eq!(Value::from(5).as_str(), None);
        assert_eq!(Value::from(true).as_bool(), Some(true));
    }

    #[test]
    fn test_untagged_json_numbers() {
        let v: Value = serde_json::from_str("[1, 1.5, true, \"s\"]").unwrap();
        assert_eq!(
            v,
            Value::Array(vec![
                Value::Integer(1),
                Value::Float(1.5),
                Value::Boolean(true),
                Value::String("s".into()),
            ])
        );
    }

    #[test]
    fn test_json_null_rejected() {
        assert!(serde_json::from_str::<Value>("[null]").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::from(vec![1, 2]).to_string(), "[1,2]");
        assert_eq!(Value::from("plain").to_string(), "plain");
    }
}
