//! Benchmark for the binary encoders.
//!
//! Measures:
//! 1. Fixed-width encoders on native and textual values
//! 2. Timestamps in UTC and local mode
//! 3. `FromBase64` on the sized (in place) and the materialized path, by payload size

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use pg_binary_encoder::{CoderFlags, Encode, Encoder, HostObject, LocalZone, Time, Value};
use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};
use std::hint::black_box;

/// Host object that is only available as text, forcing the materialized path.
#[derive(Debug)]
struct Rendered(Vec<u8>);

impl HostObject for Rendered {
    fn type_name(&self) -> &'static str {
        "rendered"
    }

    fn to_text(&self) -> Vec<u8> {
        self.0.clone()
    }
}

fn base64_payload(rng: &mut StdRng, len: usize) -> String {
    use base64::Engine as _;

    let bytes: Vec<u8> = (0..len).map(|_| rng.random()).collect();
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

fn benchmark_fixed_width(c: &mut Criterion) {
    let mut group = c.benchmark_group("fixed_width");

    let cases = [
        ("boolean", Encoder::boolean(), Value::from(true)),
        ("int2", Encoder::int2(), Value::from(-1234i16)),
        ("int4", Encoder::int4(), Value::from(123_456_789i32)),
        ("int8", Encoder::int8(), Value::from(i64::MIN)),
        ("int8_from_text", Encoder::int8(), Value::from("-9223372036854775808")),
    ];
    for (name, encoder, value) in &cases {
        group.bench_function(*name, |b| {
            b.iter(|| black_box(encoder.encode(black_box(value)).unwrap()));
        });
    }

    group.finish();
}

fn benchmark_timestamp(c: &mut Criterion) {
    let mut group = c.benchmark_group("timestamp");

    let value = Value::from(
        Time::from_unix(1_700_000_000, 123_456_000)
            .unwrap()
            .with_utc_offset(3600)
            .unwrap(),
    );
    let utc = Encoder::timestamp(CoderFlags::TIMESTAMP_DB_UTC);
    let local = Encoder::timestamp_in(
        CoderFlags::TIMESTAMP_DB_LOCAL,
        LocalZone::fixed(-5 * 3600).unwrap(),
    );

    group.bench_function("utc", |b| {
        b.iter(|| black_box(utc.encode(black_box(&value)).unwrap()));
    });
    group.bench_function("local", |b| {
        b.iter(|| black_box(local.encode(black_box(&value)).unwrap()));
    });

    group.finish();
}

fn benchmark_from_base64(c: &mut Criterion) {
    let mut group = c.benchmark_group("from_base64");
    let mut rng = StdRng::seed_from_u64(42);
    let encoder = Encoder::from_base64(Encoder::string());

    for size in [16usize, 1024, 64 * 1024] {
        let text = base64_payload(&mut rng, size);
        let sized = Value::from(text.as_str());
        let materialized = Value::object(Rendered(text.into_bytes()));

        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::new("sized", size), &sized, |b, value| {
            b.iter(|| black_box(encoder.encode(black_box(value)).unwrap()));
        });
        group.bench_with_input(
            BenchmarkId::new("materialized", size),
            &materialized,
            |b, value| {
                b.iter(|| black_box(encoder.encode(black_box(value)).unwrap()));
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_fixed_width,
    benchmark_timestamp,
    benchmark_from_base64,
);
criterion_main!(benches);
