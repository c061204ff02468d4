// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Concurrent benchmark engine.
//!
//! One OS thread per foreground worker plus the launching thread, which
//! releases the start barrier and then runs the sampling coordinator.

mod barrier;
mod context;
mod coordinator;
mod gate;
mod phase;
mod worker;

pub use barrier::StartBarrier;
pub use context::{BenchContext, WorkerSlots, WorkerSnapshot, WorkerState, CACHELINE_SIZE};
pub use coordinator::SamplingCoordinator;
pub use gate::{GateHold, HoldGate, QuiescenceGate};
pub use phase::WorkerPhase;
pub use worker::{scan, Worker};

use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::affinity::{pin_current_thread, CpuAllocator};
use crate::config::BenchConfig;
use crate::error::{BenchError, BenchResult, EngineError};
use crate::index::KvIndex;
use crate::stats::RunSummary;

/// Runtime knobs of the engine.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Active sampling time after which the coordinator stops.
    pub runtime: Duration,
    /// Sleep between two coordinator samples.
    pub sample_interval: Duration,
    /// Seed shared by every worker generator.
    pub seed: u64,
    /// Pin worker threads round-robin to CPUs.
    pub pin_threads: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            runtime: Duration::from_secs(10),
            sample_interval: Duration::from_secs(1),
            seed: crate::config::DEFAULT_SEED,
            pin_threads: false,
        }
    }
}

impl From<&BenchConfig> for EngineOptions {
    fn from(config: &BenchConfig) -> Self {
        Self {
            runtime: Duration::from_secs(config.runtime_secs),
            sample_interval: config.sample_interval,
            seed: config.seed,
            pin_threads: config.pin_threads,
        }
    }
}

/// Launches workers over a shared index and samples them.
pub struct BenchmarkEngine<I: KvIndex + 'static> {
    index: Arc<I>,
    options: EngineOptions,
}

impl<I: KvIndex + 'static> BenchmarkEngine<I> {
    pub fn new(index: Arc<I>, options: EngineOptions) -> Self {
        Self { index, options }
    }

    /// Run one benchmark: a worker per trace path, released together.
    ///
    /// Returns once sampling ends. Workers still replaying at that point
    /// keep running detached until their trace is exhausted or the process
    /// exits.
    pub fn run(
        &self,
        traces: Vec<PathBuf>,
        gate: Arc<dyn QuiescenceGate>,
    ) -> BenchResult<RunSummary> {
        let workers = traces.len();
        let ctx = Arc::new(BenchContext::new(workers, gate, self.options.seed)?);
        let allocator = self.options.pin_threads.then(CpuAllocator::new);

        tracing::info!(
            workers = workers,
            runtime_secs = self.options.runtime.as_secs_f64(),
            pin_threads = self.options.pin_threads,
            "Launching foreground workers"
        );

        for (id, path) in traces.into_iter().enumerate() {
            let index = Arc::clone(&self.index);
            let ctx = Arc::clone(&ctx);
            let cpu = allocator.as_ref().map(CpuAllocator::allocate);

            thread::Builder::new()
                .name(format!("ycsb-fg-{}", id))
                .spawn(move || worker_main(id, index, ctx, path, cpu))
                .map_err(|source| EngineError::SpawnFailed { worker: id, source })?;
        }

        println!("[micro] prepare data ...");
        let ready = ctx.barrier().wait_for_ready();
        tracing::info!(ready = ready, "All workers ready, releasing start barrier");
        ctx.barrier().release();

        let summary =
            SamplingCoordinator::new(&ctx, self.options.runtime, self.options.sample_interval)
                .run();
        Ok(summary)
    }
}

/// Worker thread body. Any error here terminates the process.
fn worker_main<I: KvIndex>(
    id: usize,
    index: Arc<I>,
    ctx: Arc<BenchContext>,
    path: PathBuf,
    cpu: Option<usize>,
) {
    if let Some(cpu) = cpu {
        if let Err(e) = pin_current_thread(cpu) {
            let err = EngineError::AffinityFailed {
                worker: id,
                cpu,
                reason: e.to_string(),
            };
            tracing::warn!(error = %err, "Continuing unpinned");
        }
    }

    let result = Worker::init(id, index, ctx, &path).and_then(Worker::run);
    if let Err(err) = result {
        fatal(&err);
    }
}

/// Log a fatal benchmark error and exit the process.
pub fn fatal(err: &BenchError) -> ! {
    tracing::error!(error = %err, "Fatal benchmark error");
    eprintln!("Error: {}", err);
    std::process::exit(1)
}
