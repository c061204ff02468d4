// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! `tracebench run` command - Load the dataset and run the benchmark.

use std::path::Path;
use std::sync::Arc;

use tracebench_benchmark::{BenchmarkReport, JsonReporter};
use tracebench_core::engine::{fatal, BenchmarkEngine, EngineOptions, HoldGate};
use tracebench_core::{BenchConfig, ConfigLoader, ConfigOverrides, SkipListIndex, TraceLoader};

pub fn execute(
    config_path: Option<&Path>,
    overrides: ConfigOverrides,
) -> Result<(), Box<dyn std::error::Error>> {
    // Invalid configuration never reaches the load phase.
    let config = match ConfigLoader::load(config_path, &overrides) {
        Ok(config) => config,
        Err(e) => fatal(&e),
    };
    print_config(&config);

    let index = Arc::new(SkipListIndex::with_capacity(config.table_size));
    let layout = config.layout();

    if let Err(e) = TraceLoader::load_file(index.as_ref(), layout.load_path()) {
        fatal(&e.into());
    }

    // Nothing holds the gate unless a background subsystem is attached.
    let gate = Arc::new(HoldGate::new());
    let engine = BenchmarkEngine::new(Arc::clone(&index), EngineOptions::from(&config));
    let summary = match engine.run(config.worker_traces(), gate) {
        Ok(summary) => summary,
        Err(e) => fatal(&e),
    };

    if let Some(dir) = &config.report_dir {
        let reporter = JsonReporter::new(dir)?;
        let path = reporter.save(&BenchmarkReport::for_run(&config, summary))?;
        println!("Report saved to: {}", path.display());
    }

    Ok(())
}

fn print_config(config: &BenchConfig) {
    println!("runtime = {}", config.runtime_secs);
    println!("fg_n = {}", config.fg_threads);
    println!("bg_n = {}", config.bg_threads);
    println!("table_size = {}", config.table_size);
    println!("initial_size = {}", config.initial_size);
    println!("target_size = {}", config.target_size);
    println!("dataset_name = {}", config.dataset_name);
    println!("workload_type = {}", config.workload);

    tracing::debug!(config = ?config, "Effective configuration");
}
