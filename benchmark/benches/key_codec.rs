// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Trace line parsing microbenchmarks.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use tracebench_core::trace::TraceLines;
use tracebench_core::types::{Key, Operation};

fn sample_trace(lines: usize) -> Vec<u8> {
    let opcodes = [b'r', b'u', b'i', b's'];
    let mut trace = Vec::with_capacity(lines * 11);
    for n in 0..lines {
        trace.push(opcodes[n % opcodes.len()]);
        trace.push(b' ');
        trace.extend_from_slice(format!("{:08}", n).as_bytes());
        trace.push(b'\n');
    }
    trace
}

fn bench_operation_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("operation_parse");
    group.throughput(Throughput::Elements(1));

    group.bench_function("single_line", |b| {
        b.iter(|| black_box(Operation::parse(black_box(b"u 00001234"))));
    });
    group.bench_function("key_from_line", |b| {
        b.iter(|| black_box(Key::from_line(black_box(b"i 00001234"))));
    });

    group.finish();
}

fn bench_line_split(c: &mut Criterion) {
    let mut group = c.benchmark_group("trace_lines");
    let trace = sample_trace(100_000);
    group.throughput(Throughput::Bytes(trace.len() as u64));

    group.bench_function("split_and_parse_100k", |b| {
        b.iter(|| {
            let mut ops = 0usize;
            for line in TraceLines::new(black_box(&trace)) {
                if let Ok(Some(op)) = Operation::parse(line) {
                    black_box(op);
                    ops += 1;
                }
            }
            ops
        });
    });

    group.finish();
}

criterion_group!(benches, bench_operation_parse, bench_line_split);
criterion_main!(benches);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_trace_parses() {
        let trace = sample_trace(8);
        let ops: Vec<Operation> = TraceLines::new(&trace)
            .map(|line| Operation::parse(line).unwrap().unwrap())
            .collect();
        assert_eq!(ops.len(), 8);
        assert_eq!(ops[3].key, Key::from_payload(b"00000003"));
    }
}
