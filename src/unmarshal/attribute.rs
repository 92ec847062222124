//! The wire-side tagged union.
//!
//! A wire value is a JSON object whose key names the type:
//! `{"S": "text"}`, `{"N": "42"}`, `{"M": {"a": {"BOOL": true}}}` and so on.
//! Parsing picks the first recognized tag in [`Tag::ORDER`] and ignores any
//! other keys; a value with no recognized tag is rejected.

use crate::error::{ConvertError, Result};
use base64::Engine;
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::{Map, Value};

/// Recognized type tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    S,
    N,
    B,
    Bool,
    Null,
    L,
    M,
    Ss,
    Ns,
    Bs,
}

impl Tag {
    /// Resolution order when a value carries more than one recognized tag
    pub const ORDER: [Tag; 10] = [
        Tag::S,
        Tag::N,
        Tag::B,
        Tag::Bool,
        Tag::Null,
        Tag::L,
        Tag::M,
        Tag::Ss,
        Tag::Ns,
        Tag::Bs,
    ];

    /// The JSON key this tag is written under
    pub fn key(self) -> &'static str {
        match self {
            Tag::S => "S",
            Tag::N => "N",
            Tag::B => "B",
            Tag::Bool => "BOOL",
            Tag::Null => "NULL",
            Tag::L => "L",
            Tag::M => "M",
            Tag::Ss => "SS",
            Tag::Ns => "NS",
            Tag::Bs => "BS",
        }
    }
}

/// One attribute value as carried by the change stream
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Value")]
pub enum AttributeValue {
    S(String),
    /// Numeric literal, kept as text until decoded
    N(String),
    B(Vec<u8>),
    Bool(bool),
    Null,
    L(Vec<AttributeValue>),
    M(IndexMap<String, AttributeValue>),
    Ss(Vec<String>),
    Ns(Vec<String>),
    Bs(Vec<Vec<u8>>),
}

impl AttributeValue {
    /// Parse a wire value
    pub fn from_json(value: &Value) -> Result<Self> {
        let Value::Object(obj) = value else {
            return Err(ConvertError::malformed(format!(
                "expected a tagged object, found {}",
                json_kind(value)
            )));
        };

        let Some((tag, payload)) = Tag::ORDER
            .iter()
            .find_map(|tag| obj.get(tag.key()).map(|payload| (*tag, payload)))
        else {
            return Err(ConvertError::malformed(no_tag_reason(obj)));
        };

        let parsed = match tag {
            Tag::S => AttributeValue::S(expect_str(payload, tag)?.to_string()),
            Tag::N => AttributeValue::N(expect_str(payload, tag)?.to_string()),
            Tag::B => AttributeValue::B(decode_base64(expect_str(payload, tag)?)?),
            Tag::Bool => match payload {
                Value::Bool(b) => AttributeValue::Bool(*b),
                other => return Err(wrong_payload(tag, "a boolean", other)),
            },
            Tag::Null => AttributeValue::Null,
            Tag::L => {
                let items = expect_array(payload, tag)?
                    .iter()
                    .enumerate()
                    .map(|(i, item)| Self::from_json(item).map_err(|e| e.within_index(i)))
                    .collect::<Result<Vec<_>>>()?;
                AttributeValue::L(items)
            }
            Tag::M => AttributeValue::M(parse_map(expect_object(payload, tag)?)?),
            Tag::Ss => AttributeValue::Ss(string_items(payload, tag)?),
            Tag::Ns => AttributeValue::Ns(string_items(payload, tag)?),
            Tag::Bs => {
                let blobs = string_items(payload, tag)?
                    .iter()
                    .enumerate()
                    .map(|(i, s)| decode_base64(s).map_err(|e| e.within_index(i)))
                    .collect::<Result<Vec<_>>>()?;
                AttributeValue::Bs(blobs)
            }
        };

        Ok(parsed)
    }

    /// The tag this value is written under on the wire
    pub fn tag(&self) -> Tag {
        match self {
            AttributeValue::S(_) => Tag::S,
            AttributeValue::N(_) => Tag::N,
            AttributeValue::B(_) => Tag::B,
            AttributeValue::Bool(_) => Tag::Bool,
            AttributeValue::Null => Tag::Null,
            AttributeValue::L(_) => Tag::L,
            AttributeValue::M(_) => Tag::M,
            AttributeValue::Ss(_) => Tag::Ss,
            AttributeValue::Ns(_) => Tag::Ns,
            AttributeValue::Bs(_) => Tag::Bs,
        }
    }

    /// Render back into the wire form
    pub fn to_json(&self) -> Value {
        let payload = match self {
            AttributeValue::S(s) | AttributeValue::N(s) => Value::String(s.clone()),
            AttributeValue::B(b) => Value::String(encode_base64(b)),
            AttributeValue::Bool(b) => Value::Bool(*b),
            AttributeValue::Null => Value::Bool(true),
            AttributeValue::L(items) => Value::Array(items.iter().map(Self::to_json).collect()),
            AttributeValue::M(map) => Value::Object(
                map.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
            AttributeValue::Ss(items) | AttributeValue::Ns(items) => {
                Value::Array(items.iter().cloned().map(Value::String).collect())
            }
            AttributeValue::Bs(blobs) => Value::Array(
                blobs.iter().map(|b| Value::String(encode_base64(b))).collect(),
            ),
        };

        let mut obj = Map::new();
        obj.insert(self.tag().key().to_string(), payload);
        Value::Object(obj)
    }
}

impl TryFrom<Value> for AttributeValue {
    type Error = ConvertError;

    fn try_from(value: Value) -> Result<Self> {
        Self::from_json(&value)
    }
}

/// Parse every entry of a wire mapping (an image or an `M` payload)
pub fn parse_map(obj: &Map<String, Value>) -> Result<IndexMap<String, AttributeValue>> {
    obj.iter()
        .map(|(key, value)| {
            AttributeValue::from_json(value)
                .map(|parsed| (key.clone(), parsed))
                .map_err(|e| e.within_key(key))
        })
        .collect()
}

fn no_tag_reason(obj: &Map<String, Value>) -> String {
    if obj.is_empty() {
        "no recognized type tag (empty object)".to_string()
    } else {
        let keys: Vec<&str> = obj.keys().map(String::as_str).collect();
        format!("no recognized type tag (found keys: {})", keys.join(", "))
    }
}

fn expect_str<'a>(payload: &'a Value, tag: Tag) -> Result<&'a str> {
    payload
        .as_str()
        .ok_or_else(|| wrong_payload(tag, "a string", payload))
}

fn expect_array<'a>(payload: &'a Value, tag: Tag) -> Result<&'a Vec<Value>> {
    payload
        .as_array()
        .ok_or_else(|| wrong_payload(tag, "an array", payload))
}

fn expect_object<'a>(payload: &'a Value, tag: Tag) -> Result<&'a Map<String, Value>> {
    payload
        .as_object()
        .ok_or_else(|| wrong_payload(tag, "an object", payload))
}

fn string_items(payload: &Value, tag: Tag) -> Result<Vec<String>> {
    expect_array(payload, tag)?
        .iter()
        .enumerate()
        .map(|(i, item)| {
            item.as_str()
                .map(str::to_string)
                .ok_or_else(|| wrong_payload(tag, "an array of strings", item).within_index(i))
        })
        .collect()
}

fn decode_base64(text: &str) -> Result<Vec<u8>> {
    base64::engine::general_purpose::STANDARD
        .decode(text)
        .map_err(|e| ConvertError::malformed(format!("invalid base64: {}", e)))
}

fn encode_base64(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

fn wrong_payload(tag: Tag, expected: &str, found: &Value) -> ConvertError {
    ConvertError::malformed(format!(
        "`{}` payload must be {}, found {}",
        tag.key(),
        expected,
        json_kind(found)
    ))
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
