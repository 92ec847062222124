//! Benchmark comparing sequential vs parallel batch conversion
//!
//! Builds a batch of ride-booking change records and converts it with and
//! without the rayon pool.

use ddb_stream_convert::stream::{ChangeRecord, EventName, Image};
use ddb_stream_convert::{AttributeValue, ConvertConfig, Converter};
use indexmap::IndexMap;
use std::time::Instant;

const RECORDS: usize = 10_000;

fn s(text: impl Into<String>) -> AttributeValue {
    AttributeValue::S(text.into())
}

fn n(value: impl ToString) -> AttributeValue {
    AttributeValue::N(value.to_string())
}

fn m<const K: usize>(entries: [(&str, AttributeValue); K]) -> AttributeValue {
    AttributeValue::M(
        entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect::<IndexMap<_, _>>(),
    )
}

fn image<const K: usize>(entries: [(&str, AttributeValue); K]) -> Image {
    entries
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_json()))
        .collect()
}

fn ride_record(i: usize) -> ChangeRecord {
    let image = image([
        ("entityId", s(format!("RIDE#{:08}", i))),
        ("eventId", s(format!("{:08}", i))),
        ("type", s("RIDE_BOOKED")),
        ("createdAt", s("2025-01-01T00:00:00.000Z")),
        (
            "payload",
            m([
                ("userId", s(format!("USER#{}", i % 500))),
                (
                    "location",
                    m([
                        ("latitude", n(35.0 + (i % 90) as f64 / 100.0)),
                        ("longitude", n(139.0 + (i % 180) as f64 / 100.0)),
                    ]),
                ),
                ("tags", AttributeValue::Ss(vec!["night".into(), "airport".into()])),
                ("fares", AttributeValue::Ns(vec!["12.5".into(), "3".into()])),
                ("history", AttributeValue::L((0..8).map(n).collect())),
            ]),
        ),
    ]);

    ChangeRecord::with_new_image(EventName::Insert, image).with_event_id(i.to_string())
}

fn main() -> anyhow::Result<()> {
    println!("=== Stream Conversion Benchmark ===\n");

    let records: Vec<ChangeRecord> = (0..RECORDS).map(ride_record).collect();

    println!("=== Benchmark 1: Sequential ===");
    let converter = Converter::new(ConvertConfig::default());
    let start = Instant::now();
    let sequential = converter.transform(&records)?;
    let sequential_duration = start.elapsed();

    println!("Time: {:?}", sequential_duration);
    println!("Images decoded: {}", sequential.len());
    println!(
        "Average per record: {:.2}us\n",
        sequential_duration.as_micros() as f64 / RECORDS as f64
    );

    println!("=== Benchmark 2: Parallel ({} threads) ===", rayon::current_num_threads());
    let converter = Converter::new(ConvertConfig {
        parallel: true,
        ..ConvertConfig::default()
    });
    let start = Instant::now();
    let parallel = converter.transform(&records)?;
    let parallel_duration = start.elapsed();

    println!("Time: {:?}", parallel_duration);
    println!("Images decoded: {}", parallel.len());
    println!(
        "Average per record: {:.2}us\n",
        parallel_duration.as_micros() as f64 / RECORDS as f64
    );

    anyhow::ensure!(sequential == parallel, "parallel output diverged from sequential");

    let speedup = sequential_duration.as_secs_f64() / parallel_duration.as_secs_f64();
    println!("=== Performance Analysis ===\n");
    println!("Speedup: {:.2}x", speedup);
    println!("Outputs identical and in batch order");

    Ok(())
}
