// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! On-disk layout of a YCSB dataset.
//!
//! ```text
//! <root>/<dataset>/Workload<W>/workload_<w>_load
//! <root>/<dataset>/Workload<W>/workload_<w>_worker_<id>
//! ```

use std::path::{Path, PathBuf};

/// Resolves load and per-worker trace paths for one workload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetLayout {
    root: PathBuf,
    dataset: String,
    workload: char,
}

impl DatasetLayout {
    pub fn new(root: impl AsRef<Path>, dataset: impl Into<String>, workload: char) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            dataset: dataset.into(),
            workload: workload.to_ascii_lowercase(),
        }
    }

    /// Directory holding every trace of the workload.
    pub fn workload_dir(&self) -> PathBuf {
        self.root
            .join(&self.dataset)
            .join(format!("Workload{}", self.workload.to_ascii_uppercase()))
    }

    pub fn load_path(&self) -> PathBuf {
        self.workload_dir()
            .join(format!("workload_{}_load", self.workload))
    }

    pub fn worker_trace_path(&self, worker: usize) -> PathBuf {
        self.workload_dir()
            .join(format!("workload_{}_worker_{}", self.workload, worker))
    }

    pub fn workload(&self) -> char {
        self.workload
    }
}
