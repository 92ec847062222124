//! # ddb-stream-convert - DynamoDB stream image conversion
//!
//! Turns the type-tagged attribute values of DynamoDB stream records into
//! plain JSON, ready for consumers that know nothing about the wire format.
//!
//! ## Modules
//!
//! - **unmarshal**: decode `{"S": ...}`, `{"N": ...}`, `{"M": ...}` and friends
//!   into plain values
//! - **stream**: change records, image extraction and batch conversion
//!
//! ## Quick Start
//!
//! ### Decoding a single value
//!
//! ```rust
//! use ddb_stream_convert::unmarshal::decode_value;
//! use serde_json::{json, Value};
//!
//! # fn main() -> anyhow::Result<()> {
//! let wire = json!({"M": {"a": {"S": "1"}, "b": {"L": [{"N": "1"}, {"N": "2"}]}}});
//! let plain = Value::from(decode_value(&wire)?);
//!
//! assert_eq!(plain, json!({"a": "1", "b": [1, 2]}));
//! # Ok(())
//! # }
//! ```
//!
//! ### Converting a batch
//!
//! ```rust
//! use ddb_stream_convert::{ConvertConfig, Converter};
//! use ddb_stream_convert::stream::ChangeRecord;
//! use serde_json::json;
//!
//! # fn main() -> anyhow::Result<()> {
//! let records: Vec<ChangeRecord> = serde_json::from_value(json!([
//!     {"eventName": "INSERT", "dynamodb": {"NewImage": {"id": {"N": "1"}}}},
//!     {"eventName": "REMOVE", "dynamodb": {}}
//! ]))?;
//!
//! let converter = Converter::new(ConvertConfig::default());
//! let events = converter.transform(&records)?;
//!
//! // Only the INSERT carried a new image
//! assert_eq!(events.len(), 1);
//! # Ok(())
//! # }
//! ```

use anyhow::Result;
use std::io::{Read, Write};

pub mod config;
pub mod error;
pub mod stream;
pub mod unmarshal;

// Re-export commonly used types for convenience
pub use config::{BinaryEncoding, ConvertConfig, FailureMode};
pub use error::ConvertError;
pub use stream::{extract, BatchOutcome, ChangeRecord, Converter, OutputWriter};
pub use unmarshal::{decode, decode_image, AttributeValue, DecodedMap, DecodedValue};

/// Main entry point: read a batch, convert it and write `{"events": [...]}`
pub fn convert_json<R: Read, W: Write>(
    reader: R,
    writer: W,
    ndjson: bool,
    config: ConvertConfig,
) -> Result<BatchOutcome> {
    let records = stream::read_batch(reader, ndjson)?;
    let converter = Converter::new(config);
    let outcome = converter.convert(&records)?;

    let mut output = OutputWriter::new(writer, converter.config().binary_encoding).compact(true);
    output.write_outcome(outcome.clone())?;
    output.flush()?;

    Ok(outcome)
}
