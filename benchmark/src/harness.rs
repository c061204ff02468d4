// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Harness for single-threaded index micro-benchmarks.
//!
//! Times one call per sample, after an unmeasured warmup, so per-opcode
//! latency distributions can be compared without the trace engine.

use std::time::Instant;

use tracebench_core::index::KvIndex;
use tracebench_core::types::{Key, Record};

/// Warmup and measurement settings for a latency run.
pub struct BenchmarkHarness {
    warmup_iterations: u64,
    measurement_iterations: u64,
}

impl BenchmarkHarness {
    pub fn new() -> Self {
        Self {
            warmup_iterations: 1_000,
            measurement_iterations: 100_000,
        }
    }

    pub fn warmup(mut self, iterations: u64) -> Self {
        self.warmup_iterations = iterations;
        self
    }

    pub fn iterations(mut self, iterations: u64) -> Self {
        self.measurement_iterations = iterations;
        self
    }

    pub fn measurement_iterations(&self) -> u64 {
        self.measurement_iterations
    }

    /// Run `operation` once per sample and collect latencies in nanoseconds.
    ///
    /// The closure receives the iteration number (warmup iterations included)
    /// so it can pick a different key each time.
    pub fn run<F>(&self, mut operation: F) -> Vec<u64>
    where
        F: FnMut(u64),
    {
        for i in 0..self.warmup_iterations {
            operation(i);
        }

        let mut samples = Vec::with_capacity(self.measurement_iterations as usize);
        for i in 0..self.measurement_iterations {
            let start = Instant::now();
            operation(self.warmup_iterations + i);
            samples.push(start.elapsed().as_nanos() as u64);
        }
        samples
    }
}

impl Default for BenchmarkHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Timer for measuring individual operations.
pub struct Timer {
    start: Instant,
}

impl Timer {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Stop the timer and return elapsed nanoseconds.
    pub fn stop(self) -> u64 {
        self.start.elapsed().as_nanos() as u64
    }
}

/// Key number `n` as an 8-byte big-endian key, so numeric and key order agree.
pub fn numbered_key(n: u64) -> Key {
    Key::new(n.to_be_bytes())
}

/// Fill `index` with keys `0..count`; returns how many were accepted.
pub fn populate<I: KvIndex>(index: &I, count: u64) -> u64 {
    let timer = Timer::start();
    let accepted = (0..count)
        .filter(|&n| {
            index.insert(Record::zeroed(numbered_key(n))) == tracebench_core::IndexStatus::Ok
        })
        .count() as u64;
    tracing::debug!(count = accepted, elapsed_ns = timer.stop(), "Index populated");
    accepted
}
