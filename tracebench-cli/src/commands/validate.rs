// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! `tracebench validate` command - Validate configuration and dataset files.

use std::path::Path;

use tracebench_core::{BenchConfig, ConfigLoader, ConfigOverrides};

/// Presence of every trace file a run would open.
#[derive(Debug)]
pub struct DatasetCheck {
    pub load_present: bool,
    pub workers_present: Vec<bool>,
}

impl DatasetCheck {
    pub fn inspect(config: &BenchConfig) -> Self {
        Self {
            load_present: config.layout().load_path().is_file(),
            workers_present: config.worker_traces().iter().map(|p| p.is_file()).collect(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.load_present && self.workers_present.iter().all(|&present| present)
    }
}

pub fn execute(
    config_path: Option<&Path>,
    overrides: ConfigOverrides,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(config = ?config_path, "Validating configuration");

    let config = match ConfigLoader::load(config_path, &overrides) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("✗ Configuration validation failed:");
            eprintln!("  {}", e);
            std::process::exit(1);
        }
    };

    println!("✓ Configuration is valid");
    println!();
    println!("Benchmark Settings:");
    println!("  Table Size:      {}", config.table_size);
    println!("  Runtime:         {}s", config.runtime_secs);
    println!("  Sample Interval: {}ms", config.sample_interval.as_millis());
    println!(
        "  Threads:         {} foreground, {} background",
        config.fg_threads, config.bg_threads
    );
    println!("  Seed:            {}", config.seed);
    println!("  Pin Threads:     {}", config.pin_threads);
    println!();

    let layout = config.layout();
    let check = DatasetCheck::inspect(&config);
    println!("Dataset ({}, workload {}):", config.dataset_name, layout.workload());
    println!(
        "  {} {}",
        mark(check.load_present),
        layout.load_path().display()
    );
    for (path, present) in config.worker_traces().iter().zip(&check.workers_present) {
        println!("  {} {}", mark(*present), path.display());
    }

    if !check.is_complete() {
        tracing::warn!("Dataset is incomplete; a run would fail while opening traces");
    }
    Ok(())
}

fn mark(present: bool) -> &'static str {
    if present {
        "✓"
    } else {
        "✗"
    }
}
