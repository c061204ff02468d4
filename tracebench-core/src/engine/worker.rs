// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Foreground worker: replays one private trace against the shared index.
//!
//! Lifecycle: Init (map trace, seed generator) → Ready (start barrier) →
//! Running (replay) → Done (alive flag cleared). The worker writes only its
//! own [`WorkerState`](super::WorkerState) slot and never locks the index.

use std::hint::black_box;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::engine::context::BenchContext;
use crate::engine::phase::WorkerPhase;
use crate::error::{BenchResult, TraceError};
use crate::index::{IndexCursor, KvIndex};
use crate::trace::{MappedTrace, TraceLines};
use crate::types::{OpKind, Operation, Record, SCAN_LENGTH};

/// One foreground benchmark thread's state.
pub struct Worker<I: KvIndex> {
    id: usize,
    index: Arc<I>,
    ctx: Arc<BenchContext>,
    trace: MappedTrace,
    /// Seeded from the run seed. Scan lengths are fixed, so nothing draws
    /// from it yet; randomized scan lengths are intentionally not enabled.
    #[allow(dead_code)]
    rng: StdRng,
}

impl<I: KvIndex> Worker<I> {
    /// Init phase: map the worker's trace and seed its generator.
    pub fn init(
        id: usize,
        index: Arc<I>,
        ctx: Arc<BenchContext>,
        trace_path: impl AsRef<Path>,
    ) -> BenchResult<Self> {
        let trace = MappedTrace::open(trace_path)?;
        let rng = StdRng::seed_from_u64(ctx.seed());

        tracing::debug!(
            worker = id,
            trace = %trace.path().display(),
            bytes = trace.len(),
            "Worker trace mapped"
        );

        Ok(Self {
            id,
            index,
            ctx,
            trace,
            rng,
        })
    }

    /// Run the remaining lifecycle: Ready → Running → Done.
    ///
    /// Blocks on the start barrier until the coordinator releases it.
    pub fn run(self) -> BenchResult<()> {
        let state = self.ctx.slot(self.id);

        state.advance(WorkerPhase::Ready)?;
        println!("[ycsb] Worker {} Ready.", self.id);
        self.ctx.barrier().arrive_and_wait();

        state.advance(WorkerPhase::Running)?;
        self.replay(self.trace.lines())?;

        state.advance(WorkerPhase::Done)?;
        println!("[ycsb] Worker {} End.", self.id);
        tracing::debug!(
            worker = self.id,
            ops = state.throughput(),
            "Worker finished trace"
        );
        Ok(())
    }

    /// Replay trace lines until exhausted or malformed.
    ///
    /// # Errors
    /// Delete and unknown opcodes abort the replay before the following line
    /// is read.
    pub fn replay<'a>(&self, mut lines: impl Iterator<Item = &'a [u8]>) -> Result<(), TraceError> {
        let state = self.ctx.slot(self.id);
        let gate = self.ctx.gate();

        loop {
            if gate.is_held() {
                gate.await_release();
            }

            let Some(line) = lines.next() else {
                return Ok(());
            };

            let Some(op) = Operation::parse(line)? else {
                tracing::warn!(
                    worker = self.id,
                    line = %String::from_utf8_lossy(line),
                    "Malformed trace line, ending replay"
                );
                return Ok(());
            };

            let begin = Instant::now();
            self.dispatch(op)?;
            state.record_op(begin.elapsed());
        }
    }

    /// Replay an in-memory trace.
    pub fn replay_bytes(&self, bytes: &[u8]) -> Result<(), TraceError> {
        self.replay(TraceLines::new(bytes))
    }

    /// Issue one operation against the index. Results are discarded.
    fn dispatch(&self, op: Operation) -> Result<(), TraceError> {
        match op.kind {
            OpKind::Read => {
                black_box(self.index.lookup(&op.key));
            }
            OpKind::Update => {
                black_box(self.index.update(Record::zeroed(op.key)));
            }
            OpKind::Insert => {
                black_box(self.index.insert(Record::zeroed(op.key)));
            }
            OpKind::Delete => {
                return Err(TraceError::UnsupportedDelete {
                    key: op.key.to_string(),
                });
            }
            OpKind::Scan => {
                black_box(scan(self.index.as_ref(), &op));
            }
        }
        Ok(())
    }
}

/// Visit up to SCAN_LENGTH entries from the seek key, touching each one.
///
/// Returns the number of entries visited.
pub fn scan<I: KvIndex>(index: &I, op: &Operation) -> usize {
    let mut cursor = index.seek(&op.key);
    let mut checksum = 0usize;
    let mut visited = 0usize;
    while visited < SCAN_LENGTH {
        let Some(record) = cursor.next_record() else {
            break;
        };
        checksum = checksum.wrapping_add(black_box(&record).touch());
        visited += 1;
    }
    black_box(checksum);
    visited
}
