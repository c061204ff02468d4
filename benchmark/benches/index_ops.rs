// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Skip-list index microbenchmarks.
//!
//! Measures per-opcode cost on a pre-populated index at several sizes, and
//! trace replay throughput for a single worker.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::sync::Arc;
use std::time::Duration;
use tracebench_benchmark::harness::{numbered_key, populate};
use tracebench_core::engine::{scan, BenchContext, HoldGate, Worker};
use tracebench_core::index::KvIndex;
use tracebench_core::types::{Key, OpKind, Operation, Record};
use tracebench_core::SkipListIndex;

/// Index sizes to benchmark (in keys).
const INDEX_SIZES: &[u64] = &[1_000, 100_000, 1_000_000];

fn populated(size: u64) -> SkipListIndex {
    let index = SkipListIndex::with_capacity(size as usize * 2);
    populate(&index, size);
    index
}

fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("index_lookup");
    group.measurement_time(Duration::from_secs(5));
    group.throughput(Throughput::Elements(1));

    for &size in INDEX_SIZES {
        let index = populated(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let mut n = 0u64;
            b.iter(|| {
                n = (n + 7919) % size;
                black_box(index.lookup(&numbered_key(n)));
            });
        });
    }

    group.finish();
}

fn bench_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("index_update");
    group.measurement_time(Duration::from_secs(5));
    group.throughput(Throughput::Elements(1));

    for &size in INDEX_SIZES {
        let index = populated(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let mut n = 0u64;
            b.iter(|| {
                n = (n + 7919) % size;
                black_box(index.update(Record::zeroed(numbered_key(n))));
            });
        });
    }

    group.finish();
}

/// Insert into a fresh index per batch so every key is new.
fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("index_insert");
    group.measurement_time(Duration::from_secs(5));

    for &size in &INDEX_SIZES[..2] {
        group.throughput(Throughput::Elements(size));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| black_box(populate(&SkipListIndex::with_capacity(size as usize), size)));
        });
    }

    group.finish();
}

fn bench_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("index_scan");
    group.measurement_time(Duration::from_secs(5));
    group.throughput(Throughput::Elements(1));

    for &size in INDEX_SIZES {
        let index = populated(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let mut n = 0u64;
            b.iter(|| {
                n = (n + 7919) % size;
                let op = Operation {
                    kind: OpKind::Scan,
                    key: numbered_key(n),
                };
                black_box(scan(&index, &op));
            });
        });
    }

    group.finish();
}

/// Replay an in-memory read-heavy trace through a worker.
fn bench_replay(c: &mut Criterion) {
    let mut group = c.benchmark_group("worker_replay");
    group.measurement_time(Duration::from_secs(5));

    const LINES: u64 = 10_000;
    let index = Arc::new(SkipListIndex::with_capacity(LINES as usize));
    let mut trace = String::new();
    for n in 0..LINES {
        let payload = format!("{:08}", n);
        index.insert(Record::zeroed(Key::from_payload(payload.as_bytes())));
        let opcode = if n % 2 == 0 { 'r' } else { 'u' };
        trace.push_str(&format!("{} {}\n", opcode, payload));
    }
    let path = std::env::temp_dir().join(format!("tracebench_replay_{}", std::process::id()));
    std::fs::write(&path, &trace).expect("Failed to write trace");

    let ctx = Arc::new(
        BenchContext::new(1, Arc::new(HoldGate::new()), 1).expect("Failed to build context"),
    );
    let worker = Worker::init(0, Arc::clone(&index), ctx, &path).expect("Failed to init worker");

    group.throughput(Throughput::Elements(LINES));
    group.bench_function("read_update_50_50", |b| {
        b.iter(|| {
            worker
                .replay_bytes(black_box(trace.as_bytes()))
                .expect("Replay failed")
        });
    });
    group.finish();

    let _ = std::fs::remove_file(&path);
}

criterion_group!(
    benches,
    bench_lookup,
    bench_update,
    bench_insert,
    bench_scan,
    bench_replay,
);

criterion_main!(benches);
