//! Decoded values and their JSON rendering
//!
//! [`DecodedValue`] is what the unmarshaller produces. Bytes stay raw until
//! rendering, where [`BinaryEncoding`] picks base64 text or byte arrays.

use crate::config::BinaryEncoding;
use base64::Engine;
use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use serde_json::{Map, Number, Value};

/// A decoded mapping. Keeps the key order of the wire image.
pub type DecodedMap = IndexMap<String, DecodedValue>;

/// Plain nested value produced by the unmarshaller
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedValue {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Bytes(Vec<u8>),
    List(Vec<DecodedValue>),
    Map(DecodedMap),
}

impl DecodedValue {
    pub fn is_null(&self) -> bool {
        matches!(self, DecodedValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            DecodedValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            DecodedValue::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&DecodedMap> {
        match self {
            DecodedValue::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Look up a key when this is a map
    pub fn get(&self, key: &str) -> Option<&DecodedValue> {
        self.as_map().and_then(|m| m.get(key))
    }

    /// Convert into a `serde_json::Value`, rendering bytes as requested
    pub fn into_json(self, encoding: BinaryEncoding) -> Value {
        match self {
            DecodedValue::Null => Value::Null,
            DecodedValue::Bool(b) => Value::Bool(b),
            DecodedValue::Number(n) => Value::Number(n),
            DecodedValue::String(s) => Value::String(s),
            DecodedValue::Bytes(b) => bytes_to_json(&b, encoding),
            DecodedValue::List(items) => Value::Array(
                items.into_iter().map(|v| v.into_json(encoding)).collect(),
            ),
            DecodedValue::Map(map) => Value::Object(map_into_json(map, encoding)),
        }
    }
}

/// Convert a decoded image into a JSON object
pub fn map_into_json(map: DecodedMap, encoding: BinaryEncoding) -> Map<String, Value> {
    map.into_iter()
        .map(|(k, v)| (k, v.into_json(encoding)))
        .collect()
}

fn bytes_to_json(bytes: &[u8], encoding: BinaryEncoding) -> Value {
    match encoding {
        BinaryEncoding::Base64 => {
            Value::String(base64::engine::general_purpose::STANDARD.encode(bytes))
        }
        BinaryEncoding::Array => Value::Array(bytes.iter().map(|b| Value::from(*b)).collect()),
    }
}

impl From<DecodedValue> for Value {
    fn from(value: DecodedValue) -> Self {
        value.into_json(BinaryEncoding::default())
    }
}

// Serializes directly (bytes as base64) so consumers can write decoded
// values without going through an intermediate `Value`.
impl Serialize for DecodedValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DecodedValue::Null => serializer.serialize_unit(),
            DecodedValue::Bool(b) => serializer.serialize_bool(*b),
            DecodedValue::Number(n) => n.serialize(serializer),
            DecodedValue::String(s) => serializer.serialize_str(s),
            DecodedValue::Bytes(b) => serializer
                .serialize_str(&base64::engine::general_purpose::STANDARD.encode(b)),
            DecodedValue::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            DecodedValue::Map(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map {
                    out.serialize_entry(k, v)?;
                }
                out.end()
            }
        }
    }
}
