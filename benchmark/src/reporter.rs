// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! JSON report files.
//!
//! Reports are written as `<category>_<timestamp>_<run id prefix>.json` so two
//! runs within the same second never overwrite each other.

use crate::metrics::BenchmarkReport;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReporterError {
    #[error("Report I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize report: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Writes and reads reports in one output directory.
pub struct JsonReporter {
    output_dir: PathBuf,
}

impl JsonReporter {
    /// Create a reporter, creating `output_dir` if needed.
    pub fn new(output_dir: impl AsRef<Path>) -> Result<Self, ReporterError> {
        let output_dir = output_dir.as_ref().to_path_buf();
        fs::create_dir_all(&output_dir)?;
        Ok(Self { output_dir })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Save a report and return the path of the created file.
    pub fn save(&self, report: &BenchmarkReport) -> Result<PathBuf, ReporterError> {
        let category = report
            .results
            .first()
            .map(|r| r.category.to_string())
            .unwrap_or_else(|| "mixed".to_string());
        let run_id = report.run_id.simple().to_string();

        let filename = format!(
            "{}_{}_{}.json",
            category,
            report.timestamp.format("%Y-%m-%dT%H-%M-%SZ"),
            &run_id[..8]
        );
        let filepath = self.output_dir.join(filename);

        let writer = BufWriter::new(File::create(&filepath)?);
        serde_json::to_writer_pretty(writer, report)?;

        tracing::info!(path = %filepath.display(), "Benchmark report saved");
        Ok(filepath)
    }

    /// List every report in the output directory, sorted by name.
    pub fn list_reports(&self) -> Result<Vec<PathBuf>, ReporterError> {
        let mut reports = Vec::new();
        for entry in fs::read_dir(&self.output_dir)? {
            let path = entry?.path();
            if path.extension().map(|e| e == "json").unwrap_or(false) {
                reports.push(path);
            }
        }
        reports.sort();
        Ok(reports)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<BenchmarkReport, ReporterError> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(file)?)
    }
}
