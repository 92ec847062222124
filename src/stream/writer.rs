use crate::config::BinaryEncoding;
use crate::stream::converter::{BatchOutcome, RecordFailure};
use crate::stream::types::ChangeRecord;
use anyhow::{Context, Result};
use serde_json::Value;
use std::io::Write;

/// Writes converted batches as JSON documents
pub struct OutputWriter<W: Write> {
    writer: W,
    compact: bool,
    encoding: BinaryEncoding,
}

impl<W: Write> OutputWriter<W> {
    pub fn new(writer: W, encoding: BinaryEncoding) -> Self {
        OutputWriter {
            writer,
            compact: false,
            encoding,
        }
    }

    /// Write everything on a single line
    pub fn compact(mut self, compact: bool) -> Self {
        self.compact = compact;
        self
    }

    /// Write `{"events": [...]}` (plus `failures` when there are any)
    pub fn write_outcome(&mut self, outcome: BatchOutcome) -> Result<()> {
        let json = outcome.into_json(self.encoding);
        self.write_value(&json)
    }

    /// Write annotated records as `{"Records": [...]}`
    pub fn write_records(
        &mut self,
        records: &[ChangeRecord],
        failures: &[RecordFailure],
    ) -> Result<()> {
        let mut out = serde_json::Map::new();
        out.insert(
            "Records".to_string(),
            serde_json::to_value(records).context("Failed to serialize records")?,
        );
        if !failures.is_empty() {
            out.insert(
                "failures".to_string(),
                serde_json::to_value(failures).context("Failed to serialize failures")?,
            );
        }
        self.write_value(&Value::Object(out))
    }

    fn write_value(&mut self, value: &Value) -> Result<()> {
        let json = if self.compact {
            serde_json::to_string(value)
        } else {
            serde_json::to_string_pretty(value)
        }
        .context("Failed to serialize output")?;

        writeln!(self.writer, "{}", json).context("Failed to write output")
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush().context("Failed to flush writer")
    }
}
