//! Serialization Codec Module
//!
//! Converts values to their stored text form and back.
//!
//! # Persisted layout
//! - Strings, numbers and booleans are stored as their plain text
//!   (`"en"` is stored as `en`, `42` as `42`, `true` as `true`).
//! - Everything else (objects, arrays, null) is stored as compact JSON.
//!   Values pass through [`serde_json::Value`] first, so object keys are
//!   written in sorted order, struct fields included.
//!
//! Decoding parses JSON first and falls back to the raw text, so a string
//! whose text is itself valid JSON (`"42"`, `"true"`) reads back as the
//! parsed value.

use serde::Serialize;
use serde_json::Value;

use crate::error::Result;

/// Encodes `value` into the string written to the medium.
///
/// Fails only when `value` has no JSON representation (for example a map
/// with non-string keys).
pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let encoded = match serde_json::to_value(value)? {
        Value::String(text) => text,
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        composite => serde_json::to_string(&composite)?,
    };
    Ok(encoded)
}

/// Attempts to parse `raw` as JSON. `None` means "not structured text".
pub fn try_parse_structured(raw: &str) -> Option<Value> {
    serde_json::from_str(raw).ok()
}

/// Produces the candidate value for `raw`: the parsed JSON when it parses,
/// the raw text as a string otherwise.
pub fn decode_candidate(raw: &str) -> Value {
    try_parse_structured(raw).unwrap_or_else(|| Value::String(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    #[test]
    fn test_encode_scalars_as_plain_text() {
        assert_eq!(encode("en").unwrap(), "en");
        assert_eq!(encode("hello@world").unwrap(), "hello@world");
        assert_eq!(encode(&42).unwrap(), "42");
        assert_eq!(encode(&-123).unwrap(), "-123");
        assert_eq!(encode(&1.5).unwrap(), "1.5");
        assert_eq!(encode(&true).unwrap(), "true");
        assert_eq!(encode(&false).unwrap(), "false");
    }

    #[test]
    fn test_encode_composites_as_json() {
        assert_eq!(encode(&vec![true, false, true]).unwrap(), "[true,false,true]");
        assert_eq!(encode(&["en", "es", "fr"]).unwrap(), r#"["en","es","fr"]"#);
        assert_eq!(
            encode(&json!({"id": "123", "name": "Alice"})).unwrap(),
            r#"{"id":"123","name":"Alice"}"#
        );
        assert_eq!(encode(&Option::<u8>::None).unwrap(), "null");
    }

    #[test]
    fn test_encode_sorts_object_keys() {
        assert_eq!(
            encode(&json!({"name": "Alice", "id": "123", "details": {"z": 1, "a": 2}})).unwrap(),
            r#"{"details":{"a":2,"z":1},"id":"123","name":"Alice"}"#
        );
    }

    #[test]
    fn test_encode_rejects_non_string_map_keys() {
        let mut map = HashMap::new();
        map.insert(vec![1u8], 1u8);
        assert!(encode(&map).is_err());
    }

    #[test]
    fn test_try_parse_structured() {
        assert_eq!(try_parse_structured("42"), Some(json!(42)));
        assert_eq!(try_parse_structured("true"), Some(json!(true)));
        assert_eq!(try_parse_structured("[1,2]"), Some(json!([1, 2])));
        assert_eq!(try_parse_structured("oops"), None);
        assert_eq!(try_parse_structured("{broken"), None);
    }

    #[test]
    fn test_decode_candidate_falls_back_to_text() {
        assert_eq!(decode_candidate("oops"), json!("oops"));
        assert_eq!(decode_candidate(r#"{"a":1}"#), json!({"a": 1}));
        assert_eq!(decode_candidate("42"), json!(42));
    }
}
