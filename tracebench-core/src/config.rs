// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! YAML benchmark configuration with strict validation.
//!
//! Values come from an optional YAML file, are overridden by command-line
//! flags, and are validated once before anything is loaded. Any invalid field
//! results in a ConfigError that prevents startup.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{BenchError, BenchResult, ConfigError};
use crate::trace::DatasetLayout;

/// Seed shared by worker generators when none is configured.
pub const DEFAULT_SEED: u64 = 1866;

/// Raw configuration as parsed from YAML (before validation).
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawBenchConfig {
    #[serde(default = "default_table_size")]
    table_size: usize,
    #[serde(default = "default_runtime_secs")]
    runtime_secs: u64,
    #[serde(default = "default_fg_threads")]
    fg_threads: usize,
    #[serde(default = "default_bg_threads")]
    bg_threads: usize,
    #[serde(default = "default_initial_size")]
    initial_size: u64,
    #[serde(default = "default_target_size")]
    target_size: u64,
    #[serde(default = "default_dataset_name")]
    dataset_name: String,
    #[serde(default = "default_workload")]
    workload: String,
    #[serde(default = "default_dataset_root")]
    dataset_root: String,
    #[serde(default = "default_seed")]
    seed: u64,
    #[serde(default = "default_sample_interval_ms")]
    sample_interval_ms: u64,
    #[serde(default)]
    pin_threads: bool,
    #[serde(default)]
    report_dir: Option<String>,
}

fn default_table_size() -> usize {
    150_000_000
}

fn default_runtime_secs() -> u64 {
    10
}

fn default_fg_threads() -> usize {
    1
}

fn default_bg_threads() -> usize {
    1
}

fn default_initial_size() -> u64 {
    1_000_000
}

fn default_target_size() -> u64 {
    100_000_000
}

fn default_dataset_name() -> String {
    "10m_100m".to_string()
}

fn default_workload() -> String {
    "a".to_string()
}

fn default_dataset_root() -> String {
    "dataset".to_string()
}

fn default_seed() -> u64 {
    DEFAULT_SEED
}

fn default_sample_interval_ms() -> u64 {
    1000
}

impl Default for RawBenchConfig {
    fn default() -> Self {
        Self {
            table_size: default_table_size(),
            runtime_secs: default_runtime_secs(),
            fg_threads: default_fg_threads(),
            bg_threads: default_bg_threads(),
            initial_size: default_initial_size(),
            target_size: default_target_size(),
            dataset_name: default_dataset_name(),
            workload: default_workload(),
            dataset_root: default_dataset_root(),
            seed: default_seed(),
            sample_interval_ms: default_sample_interval_ms(),
            pin_threads: false,
            report_dir: None,
        }
    }
}

/// Command-line overrides applied on top of the file (or defaults).
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub table_size: Option<usize>,
    pub runtime_secs: Option<u64>,
    pub fg_threads: Option<usize>,
    pub bg_threads: Option<usize>,
    pub initial_size: Option<u64>,
    pub target_size: Option<u64>,
    pub dataset_name: Option<String>,
    pub workload: Option<String>,
    pub dataset_root: Option<PathBuf>,
    pub seed: Option<u64>,
    pub sample_interval_ms: Option<u64>,
    pub pin_threads: Option<bool>,
    pub report_dir: Option<PathBuf>,
}

impl ConfigOverrides {
    fn apply(&self, raw: &mut RawBenchConfig) {
        if let Some(v) = self.table_size {
            raw.table_size = v;
        }
        if let Some(v) = self.runtime_secs {
            raw.runtime_secs = v;
        }
        if let Some(v) = self.fg_threads {
            raw.fg_threads = v;
        }
        if let Some(v) = self.bg_threads {
            raw.bg_threads = v;
        }
        if let Some(v) = self.initial_size {
            raw.initial_size = v;
        }
        if let Some(v) = self.target_size {
            raw.target_size = v;
        }
        if let Some(v) = &self.dataset_name {
            raw.dataset_name = v.clone();
        }
        if let Some(v) = &self.workload {
            raw.workload = v.clone();
        }
        if let Some(v) = &self.dataset_root {
            raw.dataset_root = v.to_string_lossy().into_owned();
        }
        if let Some(v) = self.seed {
            raw.seed = v;
        }
        if let Some(v) = self.sample_interval_ms {
            raw.sample_interval_ms = v;
        }
        if let Some(v) = self.pin_threads {
            raw.pin_threads = v;
        }
        if let Some(v) = &self.report_dir {
            raw.report_dir = Some(v.to_string_lossy().into_owned());
        }
    }
}

/// Validated benchmark configuration.
#[derive(Debug, Clone, Serialize)]
pub struct BenchConfig {
    /// Capacity the index is allocated with.
    pub table_size: usize,
    pub runtime_secs: u64,
    pub fg_threads: usize,
    /// Threads of the background subsystem that holds the quiescence gate.
    pub bg_threads: usize,
    pub initial_size: u64,
    pub target_size: u64,
    pub dataset_name: String,
    /// Lower-case workload letter.
    pub workload: char,
    pub dataset_root: PathBuf,
    pub seed: u64,
    pub sample_interval: Duration,
    pub pin_threads: bool,
    pub report_dir: Option<PathBuf>,
}

impl BenchConfig {
    pub fn layout(&self) -> DatasetLayout {
        DatasetLayout::new(&self.dataset_root, &self.dataset_name, self.workload)
    }

    /// Per-worker trace paths, one per foreground thread.
    pub fn worker_traces(&self) -> Vec<PathBuf> {
        let layout = self.layout();
        (0..self.fg_threads)
            .map(|id| layout.worker_trace_path(id))
            .collect()
    }
}

/// Configuration loader with strict validation.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load and validate configuration from a YAML file.
    pub fn load_file(path: impl AsRef<Path>) -> BenchResult<BenchConfig> {
        Self::load(Some(path.as_ref()), &ConfigOverrides::default())
    }

    /// Load and validate configuration from a YAML string.
    pub fn load_string(content: &str) -> BenchResult<BenchConfig> {
        let raw = Self::parse(content)?;
        Self::validate(raw)
    }

    /// Load an optional file, apply overrides, validate.
    pub fn load(path: Option<&Path>, overrides: &ConfigOverrides) -> BenchResult<BenchConfig> {
        let mut raw = match path {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound {
                        path: path.to_path_buf(),
                    }
                    .into());
                }
                let content = std::fs::read_to_string(path).map_err(|e| BenchError::Io {
                    context: "reading config file",
                    source: e,
                })?;
                Self::parse(&content)?
            }
            None => RawBenchConfig::default(),
        };

        overrides.apply(&mut raw);
        Self::validate(raw)
    }

    fn parse(content: &str) -> Result<RawBenchConfig, ConfigError> {
        if content.trim().is_empty() {
            return Ok(RawBenchConfig::default());
        }
        serde_yaml::from_str(content).map_err(|e| ConfigError::Parse {
            message: format!("YAML parse error: {}", e),
        })
    }

    /// Validate raw configuration and convert to validated types.
    fn validate(raw: RawBenchConfig) -> BenchResult<BenchConfig> {
        if raw.table_size == 0 {
            return Err(invalid("table_size", raw.table_size, "Must be greater than 0"));
        }

        if raw.runtime_secs == 0 {
            return Err(invalid("runtime_secs", raw.runtime_secs, "Must be greater than 0"));
        }

        if raw.fg_threads == 0 {
            return Err(invalid("fg_threads", raw.fg_threads, "Must be greater than 0"));
        }

        if raw.dataset_name.is_empty() {
            return Err(invalid("dataset_name", "\"\"", "Dataset name cannot be empty"));
        }

        let workload = {
            let mut chars = raw.workload.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_ascii_alphabetic() => c.to_ascii_lowercase(),
                _ => {
                    return Err(invalid(
                        "workload",
                        &raw.workload,
                        "Workload must be a single ASCII letter",
                    ))
                }
            }
        };

        if raw.sample_interval_ms == 0 || raw.sample_interval_ms > 60_000 {
            return Err(invalid(
                "sample_interval_ms",
                raw.sample_interval_ms,
                "Must be between 1 and 60000",
            ));
        }

        Ok(BenchConfig {
            table_size: raw.table_size,
            runtime_secs: raw.runtime_secs,
            fg_threads: raw.fg_threads,
            bg_threads: raw.bg_threads,
            initial_size: raw.initial_size,
            target_size: raw.target_size,
            dataset_name: raw.dataset_name,
            workload,
            dataset_root: PathBuf::from(raw.dataset_root),
            seed: raw.seed,
            sample_interval: Duration::from_millis(raw.sample_interval_ms),
            pin_threads: raw.pin_threads,
            report_dir: raw.report_dir.map(PathBuf::from),
        })
    }
}

fn invalid(field: &'static str, value: impl ToString, reason: &str) -> BenchError {
    ConfigError::InvalidFieldValue {
        field,
        value: value.to_string(),
        reason: reason.to_string(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_CONFIG: &str = r#"
table_size: 1000000
runtime_secs: 5
fg_threads: 4
bg_threads: 1
initial_size: 1000
target_size: 2000
dataset_name: 10m_100m
workload: C
dataset_root: /data/ycsb
seed: 7
sample_interval_ms: 500
pin_threads: true
"#;

    #[test]
    fn test_valid_config() {
        let config = ConfigLoader::load_string(VALID_CONFIG).unwrap();
        assert_eq!(config.fg_threads, 4);
        assert_eq!(config.workload, 'c');
        assert_eq!(config.sample_interval, Duration::from_millis(500));
        assert!(config.pin_threads);
        assert_eq!(
            config.layout().load_path(),
            PathBuf::from("/data/ycsb/10m_100m/WorkloadC/workload_c_load")
        );
        assert_eq!(config.worker_traces().len(), 4);
    }

    #[test]
    fn test_defaults_applied() {
        let config = ConfigLoader::load_string("").unwrap();
        assert_eq!(config.table_size, 150_000_000);
        assert_eq!(config.runtime_secs, 10);
        assert_eq!(config.fg_threads, 1);
        assert_eq!(config.dataset_name, "10m_100m");
        assert_eq!(config.workload, 'a');
        assert_eq!(config.seed, DEFAULT_SEED);
        assert!(config.report_dir.is_none());
    }

    #[test]
    fn test_overrides_win() {
        let overrides = ConfigOverrides {
            fg_threads: Some(8),
            workload: Some("b".to_string()),
            ..Default::default()
        };
        let config = ConfigLoader::load(None, &overrides).unwrap();
        assert_eq!(config.fg_threads, 8);
        assert_eq!(config.workload, 'b');
    }

    #[test]
    fn test_zero_threads_rejected() {
        assert!(ConfigLoader::load_string("fg_threads: 0").is_err());
    }

    #[test]
    fn test_zero_runtime_rejected() {
        assert!(ConfigLoader::load_string("runtime_secs: 0").is_err());
    }

    #[test]
    fn test_invalid_workload() {
        assert!(ConfigLoader::load_string("workload: ab").is_err());
        assert!(ConfigLoader::load_string("workload: \"1\"").is_err());
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(ConfigLoader::load_string("threads: 4").is_err());
    }

    #[test]
    fn test_missing_file() {
        let result = ConfigLoader::load_file("/nonexistent/tracebench.yaml");
        assert!(matches!(
            result,
            Err(BenchError::Config(ConfigError::NotFound { .. }))
        ));
    }
}
