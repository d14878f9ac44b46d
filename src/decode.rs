//! Conversion of raw GraphQL payloads into declared record types.
//!
//! Decoding is strict: a required field that is missing or has an
//! incompatible type is an [`Error::Decode`] naming the offending location,
//! never a silently defaulted value. Fields that may legitimately be absent
//! are declared `Option` (or `#[serde(default)]`) on the record types
//! themselves.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Error, Result};

/// Decode `value` into `T`, first descending into the named root field when
/// given (the usual shape of a GraphQL `data` object).
pub(crate) fn value_at<T: DeserializeOwned>(value: Value, root: Option<&str>) -> Result<T> {
    match root {
        Some(field) => decode(take_field(value, field)?, field),
        None => decode(value, "data"),
    }
}

/// Pull `field` out of a JSON object.
pub(crate) fn take_field(mut value: Value, field: &str) -> Result<Value> {
    match value {
        Value::Object(ref mut map) => map.remove(field).ok_or_else(|| Error::Decode {
            path: field.to_string(),
            message: "field is missing from the response".to_string(),
        }),
        other => Err(Error::Decode {
            path: field.to_string(),
            message: format!("expected an object, got {}", other),
        }),
    }
}

/// Decode with the serde error folded into the typed taxonomy; the serde
/// message names the offending field.
pub(crate) fn decode<T: DeserializeOwned>(value: Value, path: &str) -> Result<T> {
    serde_json::from_value(value).map_err(|e| Error::Decode {
        path: path.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Record {
        id: String,
        #[serde(default)]
        note: Option<String>,
    }

    #[test]
    fn test_decode_with_optional_defaults() {
        let record: Record = decode(json!({ "id": "r1" }), "record").unwrap();
        assert_eq!(record.id, "r1");
        assert!(record.note.is_none());
    }

    #[test]
    fn test_missing_required_field_names_it() {
        let result: Result<Record> = decode(json!({ "note": "hi" }), "record");
        match result {
            Err(Error::Decode { path, message }) => {
                assert_eq!(path, "record");
                assert!(message.contains("missing field `id`"), "{}", message);
            }
            other => panic!("expected a decode error, got {:?}", other),
        }
    }

    #[test]
    fn test_take_field() {
        let value = take_field(json!({ "races": [1, 2] }), "races").unwrap();
        assert_eq!(value, json!([1, 2]));

        let missing = take_field(json!({}), "races");
        assert!(matches!(missing, Err(Error::Decode { .. })));
    }

    #[test]
    fn test_value_at_descends_into_root() {
        let data = json!({ "record": { "id": "r2" } });
        let record: Record = value_at(data, Some("record")).unwrap();
        assert_eq!(record.id, "r2");
    }
}
