//! Value codec
//!
//! Stateless conversion between [`Value`]s and their storage-safe string form.

use std::collections::BTreeMap;

use crate::error::{ConfigError, Result};

use super::{FormatTag, Value};

// =============================================================================
// Encoding
// =============================================================================

/// Encode a value into its stored form under `format`.
///
/// The value's kind must match the format. NaN and infinities are rejected
/// at any depth, since neither form decodes back to the same value.
pub fn encode(value: &Value, format: FormatTag) -> Result<String> {
    check_finite(value)?;
    match (format, value) {
        (FormatTag::String, Value::String(s)) => Ok(s.clone()),
        (FormatTag::Array, Value::Array(items)) => Ok(serde_json::to_string(items)?),
        (FormatTag::Hash, Value::Hash(map)) => Ok(serde_json::to_string(map)?),
        (FormatTag::Boolean, Value::Boolean(b)) => {
            Ok(if *b { "true" } else { "false" }.to_string())
        }
        (FormatTag::Integer, Value::Integer(i)) => Ok(i.to_string()),
        (FormatTag::Float, Value::Float(f)) => Ok(f.to_string()),
        (format, value) => Err(ConfigError::FormatMismatch {
            format,
            found: value.format(),
        }),
    }
}

fn check_finite(value: &Value) -> Result<()> {
    match value {
        Value::Float(f) if !f.is_finite() => Err(ConfigError::Serialization(format!(
            "non-finite float {} cannot be stored",
            f
        ))),
        Value::Array(items) => items.iter().try_for_each(check_finite),
        Value::Hash(map) => map.values().try_for_each(check_finite),
        _ => Ok(()),
    }
}

/// Encode under a format given by its column spelling.
pub fn encode_as(value: &Value, tag: &str) -> Result<String> {
    encode(value, tag.parse()?)
}

// =============================================================================
// Decoding
// =============================================================================

/// Decode a stored string under `format`.
///
/// Booleans and numbers never fail; arrays and hashes fail on malformed JSON.
pub fn decode(raw: &str, format: FormatTag) -> Result<Value> {
    let value = match format {
        FormatTag::String => Value::String(raw.to_string()),
        FormatTag::Array => Value::Array(serde_json::from_str::<Vec<Value>>(raw)?),
        FormatTag::Hash => Value::Hash(serde_json::from_str::<BTreeMap<String, Value>>(raw)?),
        FormatTag::Boolean => Value::Boolean(raw == "true"),
        FormatTag::Integer => Value::Integer(parse_int_prefix(raw)),
        FormatTag::Float => Value::Float(parse_float_prefix(raw)),
    };
    Ok(value)
}

/// Decode under a format given by its column spelling.
pub fn decode_as(raw: &str, tag: &str) -> Result<Value> {
    decode(raw, tag.parse()?)
}

// =============================================================================
// Lenient Numeric Parsing
// =============================================================================

/// Parse the leading integer of `raw`, ignoring anything after it.
///
/// Leading whitespace and a single sign are accepted. No digits yields 0;
/// out-of-range values saturate.
pub fn parse_int_prefix(raw: &str) -> i64 {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let mut acc: i64 = 0;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        let d = i64::from(b - b'0');
        acc = match acc.checked_mul(10).and_then(|v| {
            if negative {
                v.checked_sub(d)
            } else {
                v.checked_add(d)
            }
        }) {
            Some(v) => v,
            None => return if negative { i64::MIN } else { i64::MAX },
        };
    }
    acc
}

/// Parse the leading decimal number of `raw`, ignoring anything after it.
///
/// Accepts an optional sign, digits, a fractional part and an exponent.
/// No numeric prefix yields 0.0.
pub fn parse_float_prefix(raw: &str) -> f64 {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'-') | Some(b'+')) {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut mantissa_digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        // "1." keeps only "1"
        if frac_end > frac_start {
            mantissa_digits += frac_end - frac_start;
            end = frac_end;
        }
    }

    if mantissa_digits == 0 {
        return 0.0;
    }

    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'-') | Some(b'+')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse().unwrap_or(0.0)
}
