//! Change-stream batches
//!
//! Records arrive in batches from the stream platform. The extractor picks
//! out each record's post-change image, the converter decodes the images and
//! packages the result for the next stage.

pub mod converter;
pub mod extractor;
pub mod input;
pub mod types;
pub mod writer;

pub use converter::{BatchOutcome, Converter, RecordFailure};
pub use extractor::{extract, extract_indexed};
pub use input::read_batch;
pub use types::{BatchInput, ChangeRecord, EventName, Image, StreamRecord};
pub use writer::OutputWriter;
