//! Batch orchestration: extract images, decode them, package the output.

use crate::config::{BinaryEncoding, ConvertConfig, FailureMode};
use crate::error::{ConvertError, Result};
use crate::stream::extractor::extract_indexed;
use crate::stream::types::ChangeRecord;
use crate::unmarshal::{decode_raw_image, map_into_json, DecodedMap};
use rayon::prelude::*;
use serde::Serialize;
use serde_json::{Map, Value};

/// A record whose image failed to decode
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordFailure {
    /// Position of the record in the input batch
    pub index: usize,

    #[serde(rename = "eventID", skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,

    /// Attribute path of the offending value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    pub error: String,
}

impl RecordFailure {
    /// Render as a failure entry; same shape as the derived `Serialize`
    pub fn into_json(self) -> Value {
        let mut out = Map::new();
        out.insert("index".to_string(), Value::from(self.index));
        if let Some(event_id) = self.event_id {
            out.insert("eventID".to_string(), Value::String(event_id));
        }
        if let Some(path) = self.path {
            out.insert("path".to_string(), Value::String(path));
        }
        out.insert("error".to_string(), Value::String(self.error));
        Value::Object(out)
    }
}

/// Result of converting one batch
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchOutcome {
    /// Decoded images, in batch order
    pub events: Vec<DecodedMap>,

    /// Records that failed. Always empty under [`FailureMode::FailBatch`].
    pub failures: Vec<RecordFailure>,
}

impl BatchOutcome {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Render as `{"events": [...]}`, with a `failures` list when any
    pub fn into_json(self, encoding: BinaryEncoding) -> Value {
        let mut out = Map::new();
        let events = self
            .events
            .into_iter()
            .map(|event| Value::Object(map_into_json(event, encoding)))
            .collect();
        out.insert("events".to_string(), Value::Array(events));

        if !self.failures.is_empty() {
            let failures = self.failures.into_iter().map(RecordFailure::into_json).collect();
            out.insert("failures".to_string(), Value::Array(failures));
        }

        Value::Object(out)
    }
}

/// Converts change-record batches into decoded images
pub struct Converter {
    config: ConvertConfig,
}

impl Converter {
    pub fn new(config: ConvertConfig) -> Self {
        Converter { config }
    }

    pub fn config(&self) -> &ConvertConfig {
        &self.config
    }

    /// Decode every post-change image in the batch.
    ///
    /// Fails on the first malformed image in batch order; no partial output.
    pub fn transform(&self, records: &[ChangeRecord]) -> Result<Vec<DecodedMap>> {
        let mut events = Vec::new();
        for (index, result) in self.decode_all(records) {
            match result {
                Ok(event) => events.push(event),
                Err(e) => {
                    let failure = failure_for(records, index, &e);
                    tracing::warn!(
                        index,
                        event_id = failure.event_id.as_deref().unwrap_or("-"),
                        error = %e,
                        "failing batch on malformed image"
                    );
                    return Err(e);
                }
            }
        }

        tracing::debug!(records = records.len(), events = events.len(), "converted batch");
        Ok(events)
    }

    /// Decode every post-change image, collecting failures per record
    /// instead of failing the batch
    pub fn transform_itemized(&self, records: &[ChangeRecord]) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();
        for (index, result) in self.decode_all(records) {
            match result {
                Ok(event) => outcome.events.push(event),
                Err(e) => {
                    let failure = failure_for(records, index, &e);
                    tracing::warn!(
                        index,
                        event_id = failure.event_id.as_deref().unwrap_or("-"),
                        error = %e,
                        "skipping malformed image"
                    );
                    outcome.failures.push(failure);
                }
            }
        }

        tracing::debug!(
            records = records.len(),
            events = outcome.events.len(),
            failures = outcome.failures.len(),
            "converted batch"
        );
        outcome
    }

    /// Convert a batch under the configured failure mode
    pub fn convert(&self, records: &[ChangeRecord]) -> Result<BatchOutcome> {
        match self.config.failure_mode {
            FailureMode::FailBatch => Ok(BatchOutcome {
                events: self.transform(records)?,
                failures: Vec::new(),
            }),
            FailureMode::ReportItems => Ok(self.transform_itemized(records)),
        }
    }

    /// Attach the decoded `NewImage` to each record as
    /// `dynamodb.convertedImage`, passing the records on otherwise untouched
    pub fn annotate(
        &self,
        mut records: Vec<ChangeRecord>,
    ) -> Result<(Vec<ChangeRecord>, Vec<RecordFailure>)> {
        let decoded = self.decode_all(&records);
        let mut failures = Vec::new();

        for (index, result) in decoded {
            match result {
                Ok(event) => {
                    let json = Value::Object(map_into_json(event, self.config.binary_encoding));
                    records[index].dynamodb.converted_image = Some(json);
                }
                Err(e) => {
                    let failure = failure_for(&records, index, &e);
                    tracing::warn!(index, error = %e, "could not annotate record");
                    if self.config.failure_mode == FailureMode::FailBatch {
                        return Err(e);
                    }
                    failures.push(failure);
                }
            }
        }

        Ok((records, failures))
    }

    /// Decode each image, keeping batch order whether or not the work is
    /// spread over the rayon pool
    fn decode_all(&self, records: &[ChangeRecord]) -> Vec<(usize, Result<DecodedMap>)> {
        let images = extract_indexed(records);
        if self.config.parallel {
            images
                .into_par_iter()
                .map(|(index, image)| (index, self.decode_one(index, image)))
                .collect()
        } else {
            images
                .into_iter()
                .map(|(index, image)| (index, self.decode_one(index, image)))
                .collect()
        }
    }

    fn decode_one(&self, index: usize, image: &Value) -> Result<DecodedMap> {
        let decoded = decode_raw_image(image)?;
        if self.config.log_images {
            let converted = serde_json::to_string(&decoded)?;
            tracing::info!(index, original = %image, converted = %converted, "converted image");
        }
        Ok(decoded)
    }
}

fn failure_for(records: &[ChangeRecord], index: usize, error: &ConvertError) -> RecordFailure {
    RecordFailure {
        index,
        event_id: records.get(index).and_then(|r| r.event_id.clone()),
        path: error.path().filter(|p| !p.is_empty()).map(str::to_string),
        error: error.to_string(),
    }
}
