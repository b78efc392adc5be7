//! Format tags
//!
//! The closed set of storage formats and the inference table mapping a
//! value's kind to its canonical tag.

use std::fmt;
use std::str::FromStr;

use crate::error::{ConfigError, Result};

use super::Value;

/// Storage format selecting the codec rule for a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatTag {
    String,
    Array,
    Hash,
    Boolean,
    Integer,
    Float,
}

impl FormatTag {
    /// Every recognized tag, in inference precedence order.
    pub const ALL: [FormatTag; 6] = [
        FormatTag::String,
        FormatTag::Array,
        FormatTag::Hash,
        FormatTag::Boolean,
        FormatTag::Integer,
        FormatTag::Float,
    ];

    /// The tag as written to the format column.
    pub fn as_str(&self) -> &'static str {
        match self {
            FormatTag::String => "string",
            FormatTag::Array => "array",
            FormatTag::Hash => "hash",
            FormatTag::Boolean => "boolean",
            FormatTag::Integer => "integer",
            FormatTag::Float => "float",
        }
    }

    /// Canonical tag for a value that was stored without an explicit format.
    pub fn infer(value: &Value) -> FormatTag {
        match value {
            Value::String(_) => FormatTag::String,
            Value::Array(_) => FormatTag::Array,
            Value::Hash(_) => FormatTag::Hash,
            Value::Boolean(_) => FormatTag::Boolean,
            Value::Integer(_) => FormatTag::Integer,
            Value::Float(_) => FormatTag::Float,
        }
    }
}

impl fmt::Display for FormatTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormatTag {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        FormatTag::ALL
            .into_iter()
            .find(|tag| tag.as_str() == s)
            .ok_or_else(|| ConfigError::InvalidFormat(format!("unknown format tag '{}'", s)))
    }
}
