// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! CLI tool to run index micro-benchmarks and generate reports.

use std::hint::black_box;
use std::path::PathBuf;

use clap::Parser;
use tracebench_benchmark::harness::{numbered_key, populate, BenchmarkHarness};
use tracebench_benchmark::{
    BenchmarkCategory, BenchmarkReport, BenchmarkResult, JsonReporter, LatencyMetrics,
};
use tracebench_core::engine::scan;
use tracebench_core::index::KvIndex;
use tracebench_core::types::{OpKind, Operation, Record};
use tracebench_core::SkipListIndex;

#[derive(Parser)]
#[command(name = "run_benchmarks")]
#[command(about = "Run per-opcode index micro-benchmarks and write a JSON report")]
struct Args {
    /// Output directory for benchmark data
    #[arg(short, long, default_value = "data")]
    output: PathBuf,

    /// Keys loaded before measuring
    #[arg(short, long, default_value_t = 1_000_000)]
    keys: u64,

    /// Measured operations per opcode
    #[arg(short, long, default_value_t = 100_000)]
    iterations: u64,

    /// Run in quick mode (fewer keys and iterations)
    #[arg(long)]
    quick: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let (keys, iterations) = if args.quick {
        (10_000, 1_000)
    } else {
        (args.keys.max(1), args.iterations)
    };

    println!("Tracebench Index Micro-benchmarks");
    println!("=================================");
    println!("Output directory: {:?}", args.output);
    println!("Keys: {}  Iterations: {}", keys, iterations);
    println!();

    let reporter = JsonReporter::new(&args.output)?;
    let mut report = BenchmarkReport::new();

    let capacity = (keys + iterations * 2) as usize;
    let index = SkipListIndex::with_capacity(capacity);
    populate(&index, keys);

    let harness = BenchmarkHarness::new()
        .warmup(iterations / 10)
        .iterations(iterations);

    for kind in OpKind::ALL {
        let samples = match kind {
            OpKind::Read => harness.run(|i| {
                black_box(index.lookup(&numbered_key(i % keys)));
            }),
            OpKind::Update => harness.run(|i| {
                black_box(index.update(Record::zeroed(numbered_key(i % keys))));
            }),
            // Fresh keys above the loaded range.
            OpKind::Insert => harness.run(|i| {
                black_box(index.insert(Record::zeroed(numbered_key(keys + i))));
            }),
            OpKind::Scan => harness.run(|i| {
                let op = Operation {
                    kind: OpKind::Scan,
                    key: numbered_key(i % keys),
                };
                black_box(scan(&index, &op));
            }),
            OpKind::Delete => continue,
        };

        let result = BenchmarkResult::latency(
            format!("index_{}", kind.name()),
            BenchmarkCategory::IndexOp,
            samples,
        )
        .with_metadata("keys", keys)
        .with_metadata("opcode", kind.letter());

        println!("  ✓ {}", result.name);
        report.add_result(result);
    }

    let path = reporter.save(&report)?;
    println!();
    println!("Benchmark report saved to: {:?}", path);
    println!();

    print_summary(&report);
    Ok(())
}

fn print_summary(report: &BenchmarkReport) {
    println!("{:<20} {:>12} {:>12} {:>12}", "benchmark", "mean", "p50", "p99");
    for result in &report.results {
        if let Some(latency) = &result.latency {
            println!(
                "{:<20} {:>12} {:>12} {:>12}",
                result.name,
                LatencyMetrics::format_latency(latency.mean_ns as u64),
                LatencyMetrics::format_latency(latency.median_ns),
                LatencyMetrics::format_latency(latency.p99_ns),
            );
        }
    }
}
