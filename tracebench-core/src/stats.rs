// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

use serde::{Deserialize, Serialize};

use crate::engine::WorkerSnapshot;

/// Throughput observed over one sampling interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntervalSample {
    /// Active seconds elapsed at the end of the interval.
    pub elapsed_secs: f64,
    /// Length of the interval in seconds.
    pub interval_secs: f64,
    /// Operations completed across all workers during the interval.
    pub ops: u64,
    pub ops_per_sec: f64,
}

/// Final aggregates of one benchmark run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub workers: Vec<WorkerSnapshot>,
    pub samples: Vec<IntervalSample>,
    /// Sum of every worker's throughput counter.
    pub total_ops: u64,
    /// Active (non-paused) seconds accrued by the coordinator.
    pub elapsed_secs: f64,
    /// total_ops / elapsed_secs.
    pub throughput_ops_per_sec: f64,
    /// Sum of latency sums over sum of latency counts, in seconds.
    pub avg_latency_secs: f64,
    /// True if sampling stopped because every worker finished.
    pub stopped_early: bool,
    /// Throughput accumulated over the intervals before the final one in
    /// which every worker had finished.
    pub temp_throughput_ops_per_sec: Option<f64>,
}

impl RunSummary {
    /// Aggregate worker snapshots taken at the end of sampling.
    pub fn from_snapshots(
        workers: Vec<WorkerSnapshot>,
        samples: Vec<IntervalSample>,
        elapsed_secs: f64,
        stopped_early: bool,
        temp_throughput_ops_per_sec: Option<f64>,
    ) -> Self {
        let total_ops: u64 = workers.iter().map(|w| w.throughput).sum();
        let latency_sum_ns: u64 = workers.iter().map(|w| w.latency_sum_ns).sum();
        let latency_count: u64 = workers.iter().map(|w| w.latency_count).sum();

        let throughput_ops_per_sec = if elapsed_secs > 0.0 {
            total_ops as f64 / elapsed_secs
        } else {
            0.0
        };
        let avg_latency_secs = if latency_count > 0 {
            latency_sum_ns as f64 / 1_000_000_000.0 / latency_count as f64
        } else {
            0.0
        };

        Self {
            workers,
            samples,
            total_ops,
            elapsed_secs,
            throughput_ops_per_sec,
            avg_latency_secs,
            stopped_early,
            temp_throughput_ops_per_sec,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::WorkerPhase;

    fn snapshot(id: usize, ops: u64, latency_ns: u64) -> WorkerSnapshot {
        WorkerSnapshot {
            thread_id: id,
            phase: WorkerPhase::Done,
            alive: false,
            throughput: ops,
            latency_sum_ns: latency_ns,
            latency_count: ops,
        }
    }

    #[test]
    fn test_aggregates() {
        let summary = RunSummary::from_snapshots(
            vec![snapshot(0, 300, 3_000), snapshot(1, 100, 5_000)],
            Vec::new(),
            2.0,
            true,
            None,
        );
        assert_eq!(summary.total_ops, 400);
        assert!((summary.throughput_ops_per_sec - 200.0).abs() < 1e-9);
        assert!((summary.avg_latency_secs - 20e-9).abs() < 1e-15);
    }

    #[test]
    fn test_zero_elapsed_and_no_ops() {
        let summary = RunSummary::from_snapshots(vec![snapshot(0, 0, 0)], Vec::new(), 0.0, false, None);
        assert_eq!(summary.throughput_ops_per_sec, 0.0);
        assert_eq!(summary.avg_latency_secs, 0.0);
    }
}
