//! ddb-convert: Convert DynamoDB stream records into plain JSON
//!
//! Usage:
//!   # Read a batch (JSON array or {"Records": [...]}) from a file
//!   ddb-convert batch.json
//!
//!   # Read from stdin, one record per line
//!   cat records.jsonl | ddb-convert --ndjson
//!
//!   # Keep the records, attach dynamodb.convertedImage to each
//!   ddb-convert --annotate batch.json
//!
//!   # Report malformed records instead of failing the whole batch
//!   ddb-convert --report-failures --parallel batch.json

// Use MiMalloc allocator for better performance (recommended by simd-json)
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::{Context, Result};
use clap::Parser;
use ddb_stream_convert::stream::{read_batch, Converter, OutputWriter};
use ddb_stream_convert::{BinaryEncoding, ConvertConfig, FailureMode};
use std::fs::File;
use std::io::{BufReader, Read};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "ddb-convert")]
#[command(about = "Convert DynamoDB stream records into plain JSON", long_about = None)]
struct Args {
    /// Input file (use stdin if omitted)
    #[arg(value_name = "FILE")]
    input: Option<String>,

    /// Process newline-delimited JSON (one record per line)
    #[arg(long)]
    ndjson: bool,

    /// Output the records themselves with `dynamodb.convertedImage` attached
    /// instead of an `{"events": [...]}` batch
    #[arg(long)]
    annotate: bool,

    /// Keep going past malformed records and list them under `failures`
    #[arg(long)]
    report_failures: bool,

    /// Render binary values as arrays of bytes instead of base64
    #[arg(long)]
    binary_as_array: bool,

    /// Decode images on all cores (output order is unchanged)
    #[arg(long)]
    parallel: bool,

    /// Compact output (no pretty-printing)
    #[arg(long)]
    compact: bool,

    /// Log every original image next to its converted form
    #[arg(long)]
    log_images: bool,

    /// Log level when RUST_LOG is not set
    #[arg(long, default_value = "warn")]
    log_level: String,
}

/// Filter used when RUST_LOG is not set. Image logs are emitted at info, so
/// `--log-images` lets this crate's info events through whatever the level.
fn log_filter(log_level: &str, log_images: bool) -> Result<EnvFilter> {
    let filter = EnvFilter::try_new(log_level)
        .with_context(|| format!("Invalid log level {}", log_level))?;
    if !log_images {
        return Ok(filter);
    }
    Ok(filter.add_directive("ddb_stream_convert=info".parse::<Directive>()?))
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => log_filter(&args.log_level, args.log_images)?,
    };

    // Logs go to stderr; stdout carries only the converted JSON
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Build config
    let mut config = ConvertConfig::default();
    if args.report_failures {
        config.failure_mode = FailureMode::ReportItems;
    }
    if args.binary_as_array {
        config.binary_encoding = BinaryEncoding::Array;
    }
    config.parallel = args.parallel;
    config.log_images = args.log_images;

    let reader = if let Some(file_path) = &args.input {
        let file = File::open(file_path).with_context(|| format!("Failed to open {}", file_path))?;
        Box::new(BufReader::new(file)) as Box<dyn Read>
    } else {
        Box::new(std::io::stdin()) as Box<dyn Read>
    };

    let records = read_batch(reader, args.ndjson)?;
    tracing::info!(records = records.len(), "read batch");

    let encoding = config.binary_encoding;
    let converter = Converter::new(config);
    let mut writer = OutputWriter::new(std::io::stdout().lock(), encoding).compact(args.compact);

    let failed = if args.annotate {
        let (records, failures) = converter.annotate(records)?;
        writer.write_records(&records, &failures)?;
        failures.len()
    } else {
        let outcome = converter.convert(&records)?;
        let failed = outcome.failures.len();
        writer.write_outcome(outcome)?;
        failed
    };
    writer.flush()?;

    if failed > 0 {
        tracing::warn!(failed, "some records could not be converted");
    }

    Ok(())
}
