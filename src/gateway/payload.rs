//! Backend response payload normalization.
//!
//! The backend's body is read as text and interpreted as JSON when possible:
//! a JSON string value is emitted verbatim, any other JSON value is
//! re-serialized, and anything that fails to parse falls back to the raw
//! text. Parse failure is not an error.

use serde_json::Value;

/// Normalize a backend body into the gateway's response body.
///
/// Round-trips preserve structural equality, not necessarily the exact
/// byte layout of the backend's serialization.
pub fn normalize_payload(raw: &[u8]) -> String {
    let text = String::from_utf8_lossy(raw);
    match serde_json::from_str::<Value>(&text) {
        Ok(Value::String(s)) => s,
        Ok(value) => value.to_string(),
        Err(_) => text.into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_object_is_reserialized() {
        let body = normalize_payload(b"{ \"a\" : 1 }");
        let value: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value, serde_json::json!({"a": 1}));
    }

    #[test]
    fn json_string_is_unquoted() {
        assert_eq!(normalize_payload(b"\"hello\""), "hello");
    }

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(normalize_payload(b"plain text"), "plain text");
    }

    #[test]
    fn empty_body_passes_through() {
        assert_eq!(normalize_payload(b""), "");
    }

    #[test]
    fn json_array_and_number_survive() {
        assert_eq!(normalize_payload(b"[1, 2, 3]"), "[1,2,3]");
        assert_eq!(normalize_payload(b"42"), "42");
    }

    #[test]
    fn invalid_utf8_does_not_panic() {
        let body = normalize_payload(&[0xff, 0xfe, b'x']);
        assert!(body.ends_with('x'));
    }
}
