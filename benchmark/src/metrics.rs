// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Metrics types for benchmark runs and index micro-benchmarks.
//!
//! A [`BenchmarkReport`] carries one run's [`RunSummary`] and configuration,
//! or a set of per-opcode micro-benchmark results, plus the machine it ran on.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use sysinfo::System;
use tracebench_core::{BenchConfig, RunSummary};
use uuid::Uuid;

/// Kinds of results a report can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BenchmarkCategory {
    /// Full trace-driven run
    Run,
    /// Single-threaded per-opcode index latency
    IndexOp,
    /// Trace line parsing
    KeyCodec,
}

impl std::fmt::Display for BenchmarkCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BenchmarkCategory::Run => write!(f, "run"),
            BenchmarkCategory::IndexOp => write!(f, "index_op"),
            BenchmarkCategory::KeyCodec => write!(f, "key_codec"),
        }
    }
}

/// Latency distribution over a set of samples.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatencyMetrics {
    pub min_ns: u64,
    pub max_ns: u64,
    pub mean_ns: f64,
    /// Median (p50) latency in nanoseconds
    pub median_ns: u64,
    pub p99_ns: u64,
    pub p999_ns: u64,
    pub std_dev_ns: f64,
}

impl LatencyMetrics {
    /// Calculate metrics from latency samples in nanoseconds.
    pub fn from_samples(mut samples: Vec<u64>) -> Self {
        if samples.is_empty() {
            return Self {
                min_ns: 0,
                max_ns: 0,
                mean_ns: 0.0,
                median_ns: 0,
                p99_ns: 0,
                p999_ns: 0,
                std_dev_ns: 0.0,
            };
        }

        samples.sort_unstable();
        let len = samples.len();
        let percentile = |p: f64| samples[((len as f64 * p) as usize).min(len - 1)];

        let mean_ns = samples.iter().sum::<u64>() as f64 / len as f64;
        let variance = samples
            .iter()
            .map(|&x| (x as f64 - mean_ns).powi(2))
            .sum::<f64>()
            / len as f64;

        Self {
            min_ns: samples[0],
            max_ns: samples[len - 1],
            mean_ns,
            median_ns: percentile(0.5),
            p99_ns: percentile(0.99),
            p999_ns: percentile(0.999),
            std_dev_ns: variance.sqrt(),
        }
    }

    /// Format latency in human-readable form (auto-selects ns/μs/ms).
    pub fn format_latency(ns: u64) -> String {
        if ns < 1_000 {
            format!("{}ns", ns)
        } else if ns < 1_000_000 {
            format!("{:.2}μs", ns as f64 / 1_000.0)
        } else if ns < 1_000_000_000 {
            format!("{:.2}ms", ns as f64 / 1_000_000.0)
        } else {
            format!("{:.2}s", ns as f64 / 1_000_000_000.0)
        }
    }
}

/// Operation throughput over a measured duration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThroughputMetrics {
    pub ops_per_sec: f64,
    pub total_ops: u64,
    pub duration_secs: f64,
}

impl ThroughputMetrics {
    pub fn calculate(total_ops: u64, duration_secs: f64) -> Self {
        let ops_per_sec = if duration_secs > 0.0 {
            total_ops as f64 / duration_secs
        } else {
            0.0
        };
        Self {
            ops_per_sec,
            total_ops,
            duration_secs,
        }
    }

    /// Format an operation rate with a K/M suffix.
    pub fn format_ops_per_sec(ops: f64) -> String {
        if ops < 1_000.0 {
            format!("{:.0} op/s", ops)
        } else if ops < 1_000_000.0 {
            format!("{:.2} Kop/s", ops / 1_000.0)
        } else {
            format!("{:.2} Mop/s", ops / 1_000_000.0)
        }
    }
}

/// System information captured at benchmark time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemInfo {
    pub os: String,
    pub os_version: String,
    /// Kernel version (Linux)
    pub kernel_version: Option<String>,
    pub cpu_model: String,
    pub cpu_cores: usize,
    /// Total system memory in bytes
    pub memory_bytes: u64,
    pub hostname: String,
}

impl SystemInfo {
    /// Collect current system information.
    pub fn collect() -> Self {
        let mut sys = System::new();
        sys.refresh_cpu();
        sys.refresh_memory();

        Self {
            os: System::name().unwrap_or_else(|| "Unknown".to_string()),
            os_version: System::os_version().unwrap_or_else(|| "Unknown".to_string()),
            kernel_version: System::kernel_version(),
            cpu_model: sys
                .cpus()
                .first()
                .map(|cpu| cpu.brand().to_string())
                .unwrap_or_else(|| "Unknown".to_string()),
            cpu_cores: sys.cpus().len(),
            memory_bytes: sys.total_memory(),
            hostname: System::host_name().unwrap_or_else(|| "Unknown".to_string()),
        }
    }
}

/// One named measurement with its metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkResult {
    pub name: String,
    pub category: BenchmarkCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency: Option<LatencyMetrics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub throughput: Option<ThroughputMetrics>,
    /// Number of measured operations
    pub iterations: u64,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl BenchmarkResult {
    /// Latency result from raw samples in nanoseconds.
    pub fn latency(name: impl Into<String>, category: BenchmarkCategory, samples: Vec<u64>) -> Self {
        let iterations = samples.len() as u64;
        let total_secs = samples.iter().sum::<u64>() as f64 / 1_000_000_000.0;
        Self {
            name: name.into(),
            category,
            throughput: Some(ThroughputMetrics::calculate(iterations, total_secs)),
            latency: Some(LatencyMetrics::from_samples(samples)),
            iterations,
            metadata: HashMap::new(),
        }
    }

    /// Result of a full trace-driven run.
    ///
    /// The run only keeps latency sums, so only the mean is known.
    pub fn from_run(name: impl Into<String>, summary: &RunSummary) -> Self {
        let latency_count: u64 = summary.workers.iter().map(|w| w.latency_count).sum();
        let mean_ns = summary.avg_latency_secs * 1_000_000_000.0;

        Self {
            name: name.into(),
            category: BenchmarkCategory::Run,
            latency: Some(LatencyMetrics {
                min_ns: 0,
                max_ns: 0,
                mean_ns,
                median_ns: 0,
                p99_ns: 0,
                p999_ns: 0,
                std_dev_ns: 0.0,
            }),
            throughput: Some(ThroughputMetrics::calculate(
                summary.total_ops,
                summary.elapsed_secs,
            )),
            iterations: latency_count,
            metadata: HashMap::new(),
        }
        .with_metadata("stopped_early", summary.stopped_early)
        .with_metadata("workers", summary.workers.len())
    }

    /// Add metadata to the result. Values that fail to serialize are dropped.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(value) = serde_json::to_value(value) {
            self.metadata.insert(key.into(), value);
        }
        self
    }
}

/// Complete report written to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkReport {
    pub run_id: Uuid,
    pub benchmark_suite: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub system_info: SystemInfo,
    /// Effective configuration of a full run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<serde_json::Value>,
    /// Per-interval samples and per-worker counters of a full run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<RunSummary>,
    pub results: Vec<BenchmarkResult>,
}

impl BenchmarkReport {
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            benchmark_suite: "tracebench".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: Utc::now(),
            system_info: SystemInfo::collect(),
            config: None,
            summary: None,
            results: Vec::new(),
        }
    }

    /// Report for one full run under `config`.
    pub fn for_run(config: &BenchConfig, summary: RunSummary) -> Self {
        let mut report = Self::new();
        let name = format!("{}_workload_{}", config.dataset_name, config.workload);
        report.add_result(
            BenchmarkResult::from_run(name, &summary).with_metadata("fg_threads", config.fg_threads),
        );
        report.config = serde_json::to_value(config).ok();
        report.summary = Some(summary);
        report
    }

    pub fn add_result(&mut self, result: BenchmarkResult) {
        self.results.push(result);
    }
}

impl Default for BenchmarkReport {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracebench_core::engine::{WorkerPhase, WorkerSnapshot};
    use tracebench_core::{ConfigLoader, IntervalSample};

    fn summary() -> RunSummary {
        let worker = WorkerSnapshot {
            thread_id: 0,
            phase: WorkerPhase::Done,
            alive: false,
            throughput: 3,
            latency_sum_ns: 300,
            latency_count: 3,
        };
        let sample = IntervalSample {
            elapsed_secs: 1.0,
            interval_secs: 1.0,
            ops: 3,
            ops_per_sec: 3.0,
        };
        RunSummary::from_snapshots(vec![worker], vec![sample], 1.0, true, Some(0.0))
    }

    #[test]
    fn test_latency_metrics_from_samples() {
        let samples = vec![100, 200, 300, 400, 500, 600, 700, 800, 900, 1000];
        let metrics = LatencyMetrics::from_samples(samples);

        assert_eq!(metrics.min_ns, 100);
        assert_eq!(metrics.max_ns, 1000);
        assert_eq!(metrics.median_ns, 600);
        assert_eq!(metrics.p999_ns, 1000);
        assert!((metrics.mean_ns - 550.0).abs() < 0.01);
    }

    #[test]
    fn test_latency_format() {
        assert_eq!(LatencyMetrics::format_latency(500), "500ns");
        assert_eq!(LatencyMetrics::format_latency(1500), "1.50μs");
        assert_eq!(LatencyMetrics::format_latency(1_500_000), "1.50ms");
    }

    #[test]
    fn test_throughput_zero_duration() {
        let metrics = ThroughputMetrics::calculate(10, 0.0);
        assert_eq!(metrics.ops_per_sec, 0.0);
        assert_eq!(ThroughputMetrics::format_ops_per_sec(2_500_000.0), "2.50 Mop/s");
    }

    #[test]
    fn test_system_info_collect() {
        let info = SystemInfo::collect();
        assert!(!info.os.is_empty());
    }

    #[test]
    fn test_run_result() {
        let result = BenchmarkResult::from_run("tiny", &summary());
        assert_eq!(result.iterations, 3);
        let throughput = result.throughput.unwrap();
        assert!((throughput.ops_per_sec - 3.0).abs() < 1e-9);
        assert!((result.latency.unwrap().mean_ns - 100.0).abs() < 1e-6);
        assert_eq!(result.metadata["stopped_early"], serde_json::json!(true));
    }

    #[test]
    fn test_report_for_run_serializes() {
        let config = ConfigLoader::load_string("workload: b").unwrap();
        let report = BenchmarkReport::for_run(&config, summary());

        let json = serde_json::to_string_pretty(&report).unwrap();
        assert!(json.contains("10m_100m_workload_b"));
        assert!(json.contains("\"table_size\""));
        assert!(json.contains("\"run\""));
    }
}
