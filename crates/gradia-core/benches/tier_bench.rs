//! Benchmarks for the tier evaluator.

#![allow(clippy::unwrap_used, clippy::panic)]

use criterion::{criterion_group, criterion_main, Criterion};
use gradia_core::profile::{DEMOGRAPHIC_FIELDS, GENERAL_FIELDS, VERIFICATION_FIELD};
use gradia_core::{evaluate, FieldValue, ProfileRecord};
use std::hint::black_box;

fn full_record() -> ProfileRecord {
    let mut record = ProfileRecord::new();
    for field in GENERAL_FIELDS.iter().chain(DEMOGRAPHIC_FIELDS.iter()) {
        record.set(*field, FieldValue::text("x"));
    }
    record.set(VERIFICATION_FIELD, FieldValue::text("approved"));
    record
}

fn bench_evaluate(c: &mut Criterion) {
    let full = full_record();
    let empty = ProfileRecord::new();

    c.bench_function("evaluate_full_profile", |b| {
        b.iter(|| evaluate(black_box(&full)));
    });

    c.bench_function("evaluate_empty_profile", |b| {
        b.iter(|| evaluate(black_box(&empty)));
    });
}

criterion_group!(benches, bench_evaluate);
criterion_main!(benches);
