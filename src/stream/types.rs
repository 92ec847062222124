use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// A raw image: attribute name to wire-encoded attribute value
pub type Image = Map<String, Value>;

/// Kind of change a stream record describes
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventName {
    Insert,
    Modify,
    Remove,
    /// A name this crate does not know; kept as delivered
    Other(String),
}

impl From<String> for EventName {
    fn from(name: String) -> Self {
        match name.as_str() {
            "INSERT" => EventName::Insert,
            "MODIFY" => EventName::Modify,
            "REMOVE" => EventName::Remove,
            _ => EventName::Other(name),
        }
    }
}

impl From<EventName> for String {
    fn from(name: EventName) -> Self {
        match name {
            EventName::Insert => "INSERT".to_string(),
            EventName::Modify => "MODIFY".to_string(),
            EventName::Remove => "REMOVE".to_string(),
            EventName::Other(name) => name,
        }
    }
}

/// One change record of a stream batch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChangeRecord {
    #[serde(rename = "eventID", default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,

    #[serde(rename = "eventName", default, skip_serializing_if = "Option::is_none")]
    pub event_name: Option<EventName>,

    #[serde(rename = "eventVersion", default, skip_serializing_if = "Option::is_none")]
    pub event_version: Option<String>,

    #[serde(rename = "eventSource", default, skip_serializing_if = "Option::is_none")]
    pub event_source: Option<String>,

    #[serde(rename = "awsRegion", default, skip_serializing_if = "Option::is_none")]
    pub aws_region: Option<String>,

    #[serde(default)]
    pub dynamodb: StreamRecord,

    /// Fields outside the stream record schema (e.g. `eventSourceARN`),
    /// carried through when records are passed on
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The `dynamodb` section of a change record.
///
/// Images are held as raw JSON. Their shape is checked when they are
/// decoded, so one bad image fails its record rather than the batch read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StreamRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approximate_creation_date_time: Option<Number>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keys: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_image: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_image: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence_number: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream_view_type: Option<String>,

    /// Decoded `NewImage`, attached when records are annotated in place
    #[serde(
        rename = "convertedImage",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub converted_image: Option<Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ChangeRecord {
    /// Build a record around a post-change image
    pub fn with_new_image(event_name: EventName, image: Image) -> Self {
        ChangeRecord {
            event_name: Some(event_name),
            dynamodb: StreamRecord {
                new_image: Some(Value::Object(image)),
                ..StreamRecord::default()
            },
            ..ChangeRecord::default()
        }
    }

    pub fn with_event_id(mut self, id: impl Into<String>) -> Self {
        self.event_id = Some(id.into());
        self
    }

    pub fn new_image(&self) -> Option<&Value> {
        self.dynamodb.new_image.as_ref()
    }
}

/// The ways a batch is delivered: a bare array of records (pipe enrichment
/// input) or an `{"Records": [...]}` event envelope
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum BatchInput {
    Records(Vec<ChangeRecord>),
    Envelope {
        #[serde(rename = "Records")]
        records: Vec<ChangeRecord>,
    },
}

impl BatchInput {
    pub fn into_records(self) -> Vec<ChangeRecord> {
        match self {
            BatchInput::Records(records) | BatchInput::Envelope { records } => records,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn stream_record() -> Value {
        json!({
            "eventID": "c81e728d9d4c2f636f067f89cc14862c",
            "eventName": "INSERT",
            "eventVersion": "1.1",
            "eventSource": "aws:dynamodb",
            "awsRegion": "ap-northeast-1",
            "eventSourceARN": "arn:aws:dynamodb:ap-northeast-1:123456789012:table/Events/stream/2025",
            "dynamodb": {
                "ApproximateCreationDateTime": 1735689600,
                "Keys": {"entityId": {"S": "RIDE#1"}, "eventId": {"S": "1"}},
                "NewImage": {"entityId": {"S": "RIDE#1"}, "eventId": {"S": "1"}},
                "SequenceNumber": "111",
                "SizeBytes": 26,
                "StreamViewType": "NEW_IMAGE"
            }
        })
    }

    #[test]
    fn test_deserialize_stream_record() {
        let record: ChangeRecord = serde_json::from_value(stream_record()).unwrap();
        assert_eq!(record.event_name, Some(EventName::Insert));
        assert_eq!(record.event_id.as_deref(), Some("c81e728d9d4c2f636f067f89cc14862c"));
        assert_eq!(record.dynamodb.size_bytes, Some(26));
        assert!(record.new_image().unwrap().get("entityId").is_some());
        assert!(record.extra.contains_key("eventSourceARN"));
    }

    #[test]
    fn test_record_passes_through_unchanged() {
        let original = stream_record();
        let record: ChangeRecord = serde_json::from_value(original.clone()).unwrap();
        assert_eq!(serde_json::to_value(&record).unwrap(), original);
    }

    #[test]
    fn test_unknown_event_name_is_kept() {
        let record: ChangeRecord =
            serde_json::from_value(json!({"eventName": "TTL_EXPIRE", "dynamodb": {}})).unwrap();
        assert_eq!(record.event_name, Some(EventName::Other("TTL_EXPIRE".to_string())));
        assert_eq!(serde_json::to_value(&record).unwrap()["eventName"], "TTL_EXPIRE");
    }

    #[test]
    fn test_missing_dynamodb_section() {
        let record: ChangeRecord = serde_json::from_value(json!({"eventName": "REMOVE"})).unwrap();
        assert!(record.new_image().is_none());
    }

    #[test]
    fn test_non_object_image_still_deserializes() {
        let record: ChangeRecord = serde_json::from_value(json!({
            "eventID": "b",
            "dynamodb": {"NewImage": [1, 2], "Keys": "k"}
        }))
        .unwrap();
        assert_eq!(record.new_image(), Some(&json!([1, 2])));
        assert_eq!(record.dynamodb.keys, Some(json!("k")));
    }

    #[test]
    fn test_batch_envelopes() {
        let bare: BatchInput = serde_json::from_value(json!([stream_record()])).unwrap();
        assert_eq!(bare.into_records().len(), 1);

        let wrapped: BatchInput =
            serde_json::from_value(json!({"Records": [stream_record(), stream_record()]})).unwrap();
        assert_eq!(wrapped.into_records().len(), 2);
    }
}
