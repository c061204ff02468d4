// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Sampling coordinator.
//!
//! Runs on the launching thread once the start barrier is released. Every
//! interval it sums per-worker throughput deltas and prints the rate; it
//! stops after the configured runtime of active (non-paused) time or as soon
//! as no worker is alive. Workers that are still replaying when sampling
//! ends are neither stopped nor joined.

use std::thread;
use std::time::{Duration, Instant};

use crate::engine::context::BenchContext;
use crate::stats::{IntervalSample, RunSummary};

/// Drives sampling for one run.
pub struct SamplingCoordinator<'a> {
    ctx: &'a BenchContext,
    runtime: Duration,
    interval: Duration,
}

impl<'a> SamplingCoordinator<'a> {
    pub fn new(ctx: &'a BenchContext, runtime: Duration, interval: Duration) -> Self {
        Self {
            ctx,
            runtime,
            interval,
        }
    }

    /// Sample until the runtime elapses or every worker is done.
    pub fn run(&self) -> RunSummary {
        let slots = self.ctx.slots();
        let gate = self.ctx.gate();
        let runtime_secs = self.runtime.as_secs_f64();

        let mut history = vec![0u64; slots.len()];
        let mut samples = Vec::new();
        let mut current_secs = 0.0f64;
        let mut temp_ops = 0u64;
        let mut temp_secs = 0.0f64;
        let mut stopped_early = false;
        let mut temp_throughput = None;

        while current_secs < runtime_secs {
            if gate.is_held() {
                tracing::info!(elapsed_secs = current_secs, "Sampling paused by quiescence gate");
                gate.await_release();
                tracing::info!("Sampling resumed");
            }

            let begin = Instant::now();
            thread::sleep(self.interval);
            let interval_secs = begin.elapsed().as_secs_f64();

            let mut ops = 0u64;
            let mut threads_alive = false;
            for (slot, last) in slots.iter().zip(history.iter_mut()) {
                let current = slot.throughput();
                ops += current.saturating_sub(*last);
                *last = current;
                threads_alive |= slot.is_alive();
            }

            current_secs += interval_secs;
            let ops_per_sec = ops as f64 / interval_secs;
            samples.push(IntervalSample {
                elapsed_secs: current_secs,
                interval_secs,
                ops,
                ops_per_sec,
            });
            println!(
                "[micro] >>> sec {:.6} throughput: {}",
                current_secs, ops_per_sec as u64
            );

            if !threads_alive {
                let rate = if temp_secs > 0.0 {
                    temp_ops as f64 / temp_secs
                } else {
                    0.0
                };
                println!("temp throughput: {}", rate as u64);
                temp_throughput = Some(rate);
                stopped_early = true;
                break;
            }
            temp_ops += ops;
            temp_secs = current_secs;
        }

        let summary = RunSummary::from_snapshots(
            slots.snapshot(),
            samples,
            current_secs,
            stopped_early,
            temp_throughput,
        );

        println!(
            "[micro] Throughput(op/s): {}",
            summary.throughput_ops_per_sec as u64
        );
        println!("[micro] Latency: {}", summary.avg_latency_secs);

        tracing::info!(
            total_ops = summary.total_ops,
            elapsed_secs = summary.elapsed_secs,
            throughput = summary.throughput_ops_per_sec,
            avg_latency_secs = summary.avg_latency_secs,
            stopped_early = summary.stopped_early,
            "Sampling finished"
        );

        summary
    }
}
