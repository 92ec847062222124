//! Reading change-record batches

use crate::stream::types::{BatchInput, ChangeRecord};
use anyhow::{Context, Result};
use std::io::Read;

/// Read a whole batch from a reader.
///
/// With `ndjson` every non-empty line is one record. Otherwise the input is a
/// single document: a JSON array of records or an `{"Records": [...]}`
/// envelope.
pub fn read_batch<R: Read>(mut reader: R, ndjson: bool) -> Result<Vec<ChangeRecord>> {
    let mut content = Vec::new();
    reader
        .read_to_end(&mut content)
        .context("Failed to read input")?;

    if ndjson {
        parse_ndjson(&content)
    } else {
        parse_document(content)
    }
}

/// Parse one batch document, trying SIMD parsing first
pub fn parse_document(content: Vec<u8>) -> Result<Vec<ChangeRecord>> {
    // simd-json rewrites its buffer in place, so it gets a copy and the
    // fallback still sees the original bytes
    let mut scratch = content.clone();
    match simd_json::serde::from_slice::<BatchInput>(&mut scratch) {
        Ok(batch) => Ok(batch.into_records()),
        Err(simd_err) => {
            tracing::debug!(error = %simd_err, "simd parse failed, retrying with serde_json");
            let batch: BatchInput =
                serde_json::from_slice(&content).context("Failed to parse batch JSON")?;
            Ok(batch.into_records())
        }
    }
}

/// Parse newline-delimited records
pub fn parse_ndjson(content: &[u8]) -> Result<Vec<ChangeRecord>> {
    let text = std::str::from_utf8(content).context("Input is not valid UTF-8")?;
    let mut records = Vec::new();

    for (line_no, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let record: ChangeRecord = serde_json::from_str(line)
            .with_context(|| format!("Failed to parse record on line {}", line_no + 1))?;
        records.push(record);
    }

    Ok(records)
}
