// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Tracebench reporting and micro-benchmarks
//!
//! Turns run summaries into JSON reports and measures index operations in
//! isolation.
//!
//! # Benchmark Categories
//!
//! - **Run**: a full trace-driven run, written by `tracebench run --report-dir`
//! - **Index operations**: per-opcode latency on a pre-populated index
//! - **Key codec**: trace line parsing
//!
//! # Data Output
//!
//! Every report is a JSON file carrying a run id, timestamp and system info.

pub mod harness;
pub mod metrics;
pub mod reporter;

pub use harness::BenchmarkHarness;
pub use metrics::{
    BenchmarkCategory, BenchmarkReport, BenchmarkResult, LatencyMetrics, SystemInfo,
    ThroughputMetrics,
};
pub use reporter::{JsonReporter, ReporterError};
