// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Tracebench CLI
//!
//! Command-line interface for the trace-driven YCSB micro-benchmark.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracebench_core::ConfigOverrides;
use tracing_subscriber::EnvFilter;

mod commands;

/// Tracebench - trace-driven YCSB micro-benchmark for ordered indexes
#[derive(Parser)]
#[command(name = "tracebench")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path (defaults apply when omitted)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load the dataset and run the benchmark
    Run(RunArgs),

    /// Validate the configuration and check the dataset files
    Validate(RunArgs),
}

/// Overrides for individual configuration fields.
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Index capacity
    #[arg(long)]
    pub table_size: Option<usize>,

    /// Sampling runtime in seconds
    #[arg(short, long)]
    pub runtime: Option<u64>,

    /// Number of foreground worker threads
    #[arg(short = 't', long)]
    pub fg_threads: Option<usize>,

    /// Number of background threads
    #[arg(long)]
    pub bg_threads: Option<usize>,

    #[arg(long)]
    pub initial_size: Option<u64>,

    #[arg(long)]
    pub target_size: Option<u64>,

    /// Dataset directory name, e.g. 10m_100m
    #[arg(short, long)]
    pub dataset: Option<String>,

    /// Workload letter
    #[arg(short, long)]
    pub workload: Option<String>,

    /// Root directory holding the datasets
    #[arg(long)]
    pub dataset_root: Option<PathBuf>,

    #[arg(long)]
    pub seed: Option<u64>,

    /// Sampling interval in milliseconds
    #[arg(long)]
    pub sample_interval_ms: Option<u64>,

    /// Pin worker threads to CPUs
    #[arg(long)]
    pub pin_threads: bool,

    /// Directory to write a JSON report into
    #[arg(long)]
    pub report_dir: Option<PathBuf>,
}

impl From<RunArgs> for ConfigOverrides {
    fn from(args: RunArgs) -> Self {
        Self {
            table_size: args.table_size,
            runtime_secs: args.runtime,
            fg_threads: args.fg_threads,
            bg_threads: args.bg_threads,
            initial_size: args.initial_size,
            target_size: args.target_size,
            dataset_name: args.dataset,
            workload: args.workload,
            dataset_root: args.dataset_root,
            seed: args.seed,
            sample_interval_ms: args.sample_interval_ms,
            pin_threads: args.pin_threads.then_some(true),
            report_dir: args.report_dir,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG takes precedence over --verbose.
    let log_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = cli.config.as_deref();
    match cli.command {
        Commands::Run(args) => commands::run::execute(config, args.into()),
        Commands::Validate(args) => commands::validate::execute(config, args.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_overrides() {
        let cli = Cli::parse_from([
            "tracebench",
            "-c",
            "bench.yaml",
            "run",
            "-t",
            "4",
            "-w",
            "b",
            "--pin-threads",
        ]);
        assert_eq!(cli.config, Some(PathBuf::from("bench.yaml")));
        let Commands::Run(args) = cli.command else {
            panic!("expected run");
        };
        let overrides = ConfigOverrides::from(args);
        assert_eq!(overrides.fg_threads, Some(4));
        assert_eq!(overrides.workload.as_deref(), Some("b"));
        assert_eq!(overrides.pin_threads, Some(true));
        assert_eq!(overrides.runtime_secs, None);
    }

    #[test]
    fn test_pin_flag_absent_keeps_config() {
        let cli = Cli::parse_from(["tracebench", "validate"]);
        let Commands::Validate(args) = cli.command else {
            panic!("expected validate");
        };
        assert_eq!(ConfigOverrides::from(args).pin_threads, None);
    }
}
