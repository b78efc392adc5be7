//! Codec Tests
//!
//! Tests for value encoding/decoding across every format tag.

use std::collections::BTreeMap;

use atlasconfig::value::{decode, decode_as, encode, encode_as};
use atlasconfig::{ConfigError, FormatTag, Value};

// =============================================================================
// Helper Functions
// =============================================================================

fn round_trip(value: Value, format: FormatTag) {
    let encoded = encode(&value, format).unwrap();
    let decoded = decode(&encoded, format).unwrap();
    assert_eq!(decoded, value, "round trip through {} via {:?}", format, encoded);
}

fn hash(pairs: &[(&str, Value)]) -> Value {
    let map: BTreeMap<String, Value> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect();
    Value::Hash(map)
}

// =============================================================================
// Round Trip Tests
// =============================================================================

#[test]
fn test_round_trip_scalars() {
    round_trip(Value::from("hello world"), FormatTag::String);
    round_trip(Value::from(""), FormatTag::String);
    round_trip(Value::from(true), FormatTag::Boolean);
    round_trip(Value::from(false), FormatTag::Boolean);
    round_trip(Value::from(0), FormatTag::Integer);
    round_trip(Value::Integer(i64::MIN), FormatTag::Integer);
    round_trip(Value::Integer(i64::MAX), FormatTag::Integer);
    round_trip(Value::from(-2.75), FormatTag::Float);
    round_trip(Value::from(1.0e-9), FormatTag::Float);
}

#[test]
fn test_round_trip_empty_collections() {
    round_trip(Value::Array(vec![]), FormatTag::Array);
    round_trip(Value::Hash(BTreeMap::new()), FormatTag::Hash);
}

#[test]
fn test_round_trip_nested_array() {
    let value = Value::Array(vec![
        Value::from("a"),
        Value::from(1),
        Value::from(2.5),
        Value::from(false),
        Value::from(vec!["x", "y"]),
        hash(&[("inner", Value::from(3))]),
    ]);
    round_trip(value, FormatTag::Array);
}

#[test]
fn test_round_trip_nested_hash() {
    let value = hash(&[
        ("name", Value::from("svc")),
        ("ports", Value::from(vec![80, 443])),
        ("tls", hash(&[("enabled", Value::from(true)), ("ratio", Value::from(0.5))])),
    ]);
    round_trip(value, FormatTag::Hash);
}

#[test]
fn test_array_preserves_order() {
    let decoded = decode("[\"c\",\"a\",\"b\"]", FormatTag::Array).unwrap();
    assert_eq!(decoded, Value::from(vec!["c", "a", "b"]));
}

#[test]
fn test_whole_float_stays_float() {
    let encoded = encode(&Value::from(2.0), FormatTag::Float).unwrap();
    assert_eq!(decode(&encoded, FormatTag::Float).unwrap(), Value::Float(2.0));

    let in_array = encode(&Value::from(vec![2.0]), FormatTag::Array).unwrap();
    assert_eq!(
        decode(&in_array, FormatTag::Array).unwrap(),
        Value::Array(vec![Value::Float(2.0)])
    );
}

// =============================================================================
// Format Rejection Tests
// =============================================================================

#[test]
fn test_unknown_tag_rejected_for_any_value() {
    let values = [
        Value::from("s"),
        Value::from(1),
        Value::from(true),
        Value::Array(vec![]),
    ];
    for tag in ["yaml", "", "Integer", "bool", "json"] {
        for value in &values {
            let err = encode_as(value, tag).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidFormat(_)));
        }
        let err = decode_as("1", tag).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidFormat(_)));
    }
}

#[test]
fn test_known_tag_by_name() {
    assert_eq!(encode_as(&Value::from(5), "integer").unwrap(), "5");
    assert_eq!(decode_as("5", "integer").unwrap(), Value::Integer(5));
}

#[test]
fn test_kind_mismatch_rejected() {
    let err = encode(&Value::from(vec![1]), FormatTag::Hash).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::FormatMismatch {
            format: FormatTag::Hash,
            found: FormatTag::Array
        }
    ));
}

#[test]
fn test_malformed_collection_payload() {
    let err = decode("[1, 2", FormatTag::Array).unwrap_err();
    assert!(matches!(err, ConfigError::Serialization(_)));

    let err = decode("[1, 2]", FormatTag::Hash).unwrap_err();
    assert!(matches!(err, ConfigError::Serialization(_)));
}

#[test]
fn test_non_finite_floats_rejected() {
    for f in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        let err = encode(&Value::Float(f), FormatTag::Float).unwrap_err();
        assert!(matches!(err, ConfigError::Serialization(_)), "{} encoded", f);
    }
}

#[test]
fn test_nested_non_finite_floats_rejected() {
    let array = Value::Array(vec![Value::from(1.5), Value::Float(f64::NAN)]);
    assert!(matches!(
        encode(&array, FormatTag::Array),
        Err(ConfigError::Serialization(_))
    ));

    let deep = hash(&[("limits", hash(&[("max", Value::Float(f64::INFINITY))]))]);
    assert!(matches!(
        encode(&deep, FormatTag::Hash),
        Err(ConfigError::Serialization(_))
    ));

    let mixed = Value::Array(vec![hash(&[("low", Value::Float(f64::NEG_INFINITY))])]);
    assert!(encode_as(&mixed, "array").is_err());
}

// =============================================================================
// Lenient Decoding Tests
// =============================================================================

#[test]
fn test_lenient_numeric_decode() {
    assert_eq!(decode("not-a-number", FormatTag::Integer).unwrap(), Value::Integer(0));
    assert_eq!(decode("not-a-number", FormatTag::Float).unwrap(), Value::Float(0.0));
    assert_eq!(decode("12abc", FormatTag::Integer).unwrap(), Value::Integer(12));
    assert_eq!(decode("1.5x", FormatTag::Float).unwrap(), Value::Float(1.5));
}

#[test]
fn test_boolean_decode() {
    assert_eq!(decode("true", FormatTag::Boolean).unwrap(), Value::Boolean(true));
    for raw in ["false", "", "yes", "1", "True", " true"] {
        assert_eq!(
            decode(raw, FormatTag::Boolean).unwrap(),
            Value::Boolean(false),
            "{:?}",
            raw
        );
    }
}
