//! Recursive decoding of attribute values into plain values

use crate::error::{ConvertError, Result};
use crate::unmarshal::attribute::{json_kind, parse_map, AttributeValue};
use crate::unmarshal::number::parse_number;
use crate::unmarshal::value::{DecodedMap, DecodedValue};
use serde_json::{Map, Value};

impl AttributeValue {
    /// Decode into a plain value, consuming the wire value
    pub fn into_decoded(self) -> Result<DecodedValue> {
        let decoded = match self {
            AttributeValue::S(s) => DecodedValue::String(s),
            AttributeValue::N(literal) => DecodedValue::Number(decode_number(&literal)?),
            AttributeValue::B(bytes) => DecodedValue::Bytes(bytes),
            AttributeValue::Bool(b) => DecodedValue::Bool(b),
            AttributeValue::Null => DecodedValue::Null,
            AttributeValue::L(items) => DecodedValue::List(
                items
                    .into_iter()
                    .enumerate()
                    .map(|(i, item)| item.into_decoded().map_err(|e| e.within_index(i)))
                    .collect::<Result<_>>()?,
            ),
            AttributeValue::M(map) => DecodedValue::Map(
                map.into_iter()
                    .map(|(key, value)| match value.into_decoded() {
                        Ok(decoded) => Ok((key, decoded)),
                        Err(e) => Err(e.within_key(&key)),
                    })
                    .collect::<Result<_>>()?,
            ),
            AttributeValue::Ss(items) => {
                DecodedValue::List(items.into_iter().map(DecodedValue::String).collect())
            }
            AttributeValue::Ns(items) => DecodedValue::List(
                items
                    .iter()
                    .enumerate()
                    .map(|(i, literal)| {
                        decode_number(literal)
                            .map(DecodedValue::Number)
                            .map_err(|e| e.within_index(i))
                    })
                    .collect::<Result<_>>()?,
            ),
            AttributeValue::Bs(blobs) => {
                DecodedValue::List(blobs.into_iter().map(DecodedValue::Bytes).collect())
            }
        };

        Ok(decoded)
    }
}

fn decode_number(literal: &str) -> Result<serde_json::Number> {
    parse_number(literal).map_err(ConvertError::malformed)
}

/// Decode one attribute value
pub fn decode(value: &AttributeValue) -> Result<DecodedValue> {
    value.clone().into_decoded()
}

/// Parse and decode one wire value
pub fn decode_value(value: &Value) -> Result<DecodedValue> {
    AttributeValue::from_json(value)?.into_decoded()
}

/// Parse and decode a whole image, key by key.
///
/// Any malformed attribute fails the image; the error names its path.
pub fn decode_image(image: &Map<String, Value>) -> Result<DecodedMap> {
    parse_map(image)?
        .into_iter()
        .map(|(key, value)| match value.into_decoded() {
            Ok(decoded) => Ok((key, decoded)),
            Err(e) => Err(e.within_key(&key)),
        })
        .collect()
}

/// Decode an image as delivered in a stream record.
///
/// Records are deserialized without checking the image's shape, so an image
/// that is not a JSON object fails here, as a malformed value of that record.
pub fn decode_raw_image(image: &Value) -> Result<DecodedMap> {
    match image {
        Value::Object(map) => decode_image(map),
        other => Err(ConvertError::malformed(format!(
            "image must be an object, found {}",
            json_kind(other)
        ))),
    }
}

/// Decode an image that may be absent. Absent in, absent out.
pub fn decode_optional_image(image: Option<&Map<String, Value>>) -> Result<Option<DecodedMap>> {
    image.map(decode_image).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode_json(value: Value) -> Result<Value> {
        decode_value(&value).map(Value::from)
    }

    fn image(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_scalars() {
        assert_eq!(decode_json(json!({"S": "x"})).unwrap(), json!("x"));
        assert_eq!(decode_json(json!({"N": "42"})).unwrap(), json!(42));
        assert_eq!(decode_json(json!({"N": "-3.5"})).unwrap(), json!(-3.5));
        assert_eq!(decode_json(json!({"BOOL": true})).unwrap(), json!(true));
        assert_eq!(decode_json(json!({"NULL": true})).unwrap(), Value::Null);
    }

    #[test]
    fn test_binary_is_kept_verbatim() {
        let decoded = decode_value(&json!({"B": "AAEC/w=="})).unwrap();
        assert_eq!(decoded.as_bytes(), Some(&[0u8, 1, 2, 255][..]));
        assert_eq!(Value::from(decoded), json!("AAEC/w=="));
    }

    #[test]
    fn test_recursive_map_and_list() {
        let decoded = decode_json(json!({
            "M": {
                "a": {"S": "1"},
                "b": {"L": [{"N": "1"}, {"N": "2"}]}
            }
        }))
        .unwrap();
        assert_eq!(decoded, json!({"a": "1", "b": [1, 2]}));
    }

    #[test]
    fn test_sets_preserve_input_order() {
        assert_eq!(decode_json(json!({"SS": ["x", "y"]})).unwrap(), json!(["x", "y"]));
        assert_eq!(decode_json(json!({"NS": ["2", "1"]})).unwrap(), json!([2, 1]));
        assert_eq!(
            decode_json(json!({"BS": ["aGk=", "eW8="]})).unwrap(),
            json!(["aGk=", "eW8="])
        );
    }

    #[test]
    fn test_large_integer_precision() {
        let decoded = decode_value(&json!({"N": "9007199254740993"})).unwrap();
        let DecodedValue::Number(n) = decoded else {
            panic!("expected a number");
        };
        assert_eq!(n.as_i64(), Some(9_007_199_254_740_993));
        assert_eq!(n.to_string(), "9007199254740993");
    }

    #[test]
    fn test_malformed_inputs_fail() {
        assert!(matches!(
            decode_value(&json!({})),
            Err(ConvertError::MalformedValue { .. })
        ));
        assert!(matches!(
            decode_value(&json!({"N": "abc"})),
            Err(ConvertError::MalformedValue { .. })
        ));
        assert!(matches!(
            decode_value(&json!({"NS": ["1", "two"]})),
            Err(ConvertError::MalformedValue { .. })
        ));
    }

    #[test]
    fn test_number_error_path() {
        let err = decode_image(&image(json!({
            "payload": {"M": {"location": {"M": {"latitude": {"N": "north"}}}}}
        })))
        .unwrap_err();
        assert_eq!(err.path(), Some("payload.location.latitude"));

        let err = decode_image(&image(json!({"scores": {"NS": ["1", "x"]}}))).unwrap_err();
        assert_eq!(err.path(), Some("scores[1]"));
    }

    #[test]
    fn test_malformed_key_is_never_dropped() {
        let result = decode_image(&image(json!({
            "good": {"S": "ok"},
            "bad": {"NOPE": 1}
        })));
        let err = result.unwrap_err();
        assert_eq!(err.path(), Some("bad"));
    }

    #[test]
    fn test_image_keeps_key_order() {
        let decoded = decode_image(&image(json!({
            "zeta": {"N": "1"},
            "alpha": {"N": "2"},
            "mid": {"N": "3"}
        })))
        .unwrap();
        let keys: Vec<&str> = decoded.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_absent_image() {
        assert_eq!(decode_optional_image(None).unwrap(), None);
        let present = image(json!({"id": {"S": "1"}}));
        let decoded = decode_optional_image(Some(&present)).unwrap().unwrap();
        assert_eq!(decoded["id"], DecodedValue::String("1".to_string()));
    }

    #[test]
    fn test_raw_image_must_be_an_object() {
        let decoded = decode_raw_image(&json!({"id": {"S": "1"}})).unwrap();
        assert_eq!(decoded["id"], DecodedValue::String("1".to_string()));

        let err = decode_raw_image(&json!([1, 2])).unwrap_err();
        assert_eq!(err.path(), Some(""));
        assert!(err.to_string().contains("image must be an object, found array"));
        assert!(decode_raw_image(&json!("text")).is_err());
    }

    #[test]
    fn test_deep_nesting() {
        let mut wire = json!({"S": "leaf"});
        for _ in 0..100 {
            wire = json!({"L": [wire]});
        }
        let mut decoded = decode_value(&wire).unwrap();
        for _ in 0..100 {
            let DecodedValue::List(mut items) = decoded else {
                panic!("expected a list");
            };
            decoded = items.remove(0);
        }
        assert_eq!(decoded, DecodedValue::String("leaf".to_string()));
    }

    #[test]
    fn test_decode_is_idempotent() {
        let parsed = AttributeValue::from_json(&json!({
            "M": {"tags": {"SS": ["a"]}, "n": {"N": "1.25"}}
        }))
        .unwrap();
        assert_eq!(decode(&parsed).unwrap(), decode(&parsed).unwrap());
    }

    #[test]
    fn test_ride_booked_image() {
        let decoded = decode_image(&image(json!({
            "entityId": {"S": "RIDE#0192"},
            "eventId": {"S": "0192"},
            "type": {"S": "RIDE_BOOKED"},
            "createdAt": {"S": "2025-01-01T00:00:00.000Z"},
            "payload": {"M": {
                "userId": {"S": "USER#1"},
                "location": {"M": {
                    "latitude": {"N": "35.6895"},
                    "longitude": {"N": "139.6917"}
                }}
            }}
        })))
        .unwrap();

        let payload = &decoded["payload"];
        assert_eq!(payload.get("userId").and_then(DecodedValue::as_str), Some("USER#1"));
        assert_eq!(
            Value::from(payload.get("location").unwrap().clone()),
            json!({"latitude": 35.6895, "longitude": 139.6917})
        );
    }
}
