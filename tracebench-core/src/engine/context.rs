// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Shared run context and per-worker counter slots.
//!
//! A [`BenchContext`] is built once per run and shared by reference with
//! every worker and the coordinator. Each [`WorkerState`] slot is written by
//! exactly one worker and read by the coordinator without further
//! synchronization; readers tolerate slightly stale values.

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::engine::barrier::StartBarrier;
use crate::engine::gate::QuiescenceGate;
use crate::engine::phase::WorkerPhase;
use crate::error::EngineError;

/// Cacheline size the per-worker slots are aligned to.
pub const CACHELINE_SIZE: usize = 64;

/// Per-worker counters, padded to a cacheline to avoid false sharing.
#[repr(C, align(64))]
#[derive(Debug)]
pub struct WorkerState {
    thread_id: usize,
    throughput: AtomicU64,
    latency_sum_ns: AtomicU64,
    latency_count: AtomicU64,
    alive: AtomicBool,
    phase: AtomicU8,
}

impl WorkerState {
    pub fn new(thread_id: usize) -> Self {
        Self {
            thread_id,
            throughput: AtomicU64::new(0),
            latency_sum_ns: AtomicU64::new(0),
            latency_count: AtomicU64::new(0),
            alive: AtomicBool::new(true),
            phase: AtomicU8::new(WorkerPhase::Init.as_u8()),
        }
    }

    pub fn thread_id(&self) -> usize {
        self.thread_id
    }

    /// Record one completed operation. Owner thread only.
    ///
    /// Single writer, so a load/store pair is enough and avoids a locked RMW.
    pub fn record_op(&self, elapsed: Duration) {
        let ns = elapsed.as_nanos() as u64;
        let sum = self.latency_sum_ns.load(Ordering::Relaxed);
        self.latency_sum_ns
            .store(sum.wrapping_add(ns), Ordering::Relaxed);
        let count = self.latency_count.load(Ordering::Relaxed);
        self.latency_count.store(count + 1, Ordering::Relaxed);
        let ops = self.throughput.load(Ordering::Relaxed);
        self.throughput.store(ops + 1, Ordering::Relaxed);
    }

    pub fn throughput(&self) -> u64 {
        self.throughput.load(Ordering::Relaxed)
    }

    pub fn latency_sum(&self) -> Duration {
        Duration::from_nanos(self.latency_sum_ns.load(Ordering::Relaxed))
    }

    pub fn latency_count(&self) -> u64 {
        self.latency_count.load(Ordering::Relaxed)
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    pub fn phase(&self) -> WorkerPhase {
        WorkerPhase::from_u8(self.phase.load(Ordering::Acquire))
    }

    /// Advance the lifecycle phase. Owner thread only.
    pub fn advance(&self, target: WorkerPhase) -> Result<(), EngineError> {
        let current = self.phase();
        if !current.can_transition_to(target) {
            return Err(EngineError::InvalidPhaseTransition {
                worker: self.thread_id,
                from: current,
                to: target,
            });
        }

        tracing::trace!(
            worker = self.thread_id,
            from = current.name(),
            to = target.name(),
            "Worker phase transition"
        );

        self.phase.store(target.as_u8(), Ordering::Release);
        if target.is_terminal() {
            // Release: counters written before this store are visible to a
            // coordinator that observes alive == false.
            self.alive.store(false, Ordering::Release);
        }
        Ok(())
    }

    /// Point-in-time copy of the counters.
    pub fn snapshot(&self) -> WorkerSnapshot {
        let alive = self.is_alive();
        WorkerSnapshot {
            thread_id: self.thread_id,
            phase: self.phase(),
            alive,
            throughput: self.throughput(),
            latency_sum_ns: self.latency_sum_ns.load(Ordering::Relaxed),
            latency_count: self.latency_count(),
        }
    }
}

/// Copy of one worker's counters as read by the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerSnapshot {
    pub thread_id: usize,
    pub phase: WorkerPhase,
    pub alive: bool,
    pub throughput: u64,
    pub latency_sum_ns: u64,
    pub latency_count: u64,
}

/// Fixed set of cacheline-aligned worker slots.
#[derive(Debug)]
pub struct WorkerSlots {
    slots: Box<[WorkerState]>,
}

impl WorkerSlots {
    /// Allocate `count` slots and verify each starts on a cacheline.
    pub fn new(count: usize) -> Result<Self, EngineError> {
        let slots: Box<[WorkerState]> = (0..count).map(WorkerState::new).collect();

        for (index, slot) in slots.iter().enumerate() {
            let address = slot as *const WorkerState as usize;
            if address % CACHELINE_SIZE != 0 {
                return Err(EngineError::MisalignedSlot { index, address });
            }
        }

        Ok(Self { slots })
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, WorkerState> {
        self.slots.iter()
    }

    pub fn any_alive(&self) -> bool {
        self.slots.iter().any(WorkerState::is_alive)
    }

    pub fn snapshot(&self) -> Vec<WorkerSnapshot> {
        self.slots.iter().map(WorkerState::snapshot).collect()
    }
}

/// Lifecycle state shared by all workers and the coordinator of one run.
pub struct BenchContext {
    slots: WorkerSlots,
    barrier: StartBarrier,
    gate: Arc<dyn QuiescenceGate>,
    seed: u64,
}

impl BenchContext {
    pub fn new(
        workers: usize,
        gate: Arc<dyn QuiescenceGate>,
        seed: u64,
    ) -> Result<Self, EngineError> {
        Ok(Self {
            slots: WorkerSlots::new(workers)?,
            barrier: StartBarrier::new(workers),
            gate,
            seed,
        })
    }

    pub fn slots(&self) -> &WorkerSlots {
        &self.slots
    }

    /// Slot owned by `worker`.
    ///
    /// # Panics
    /// Panics if `worker` is not a valid worker index for this context.
    pub fn slot(&self, worker: usize) -> &WorkerState {
        &self.slots.slots[worker]
    }

    pub fn barrier(&self) -> &StartBarrier {
        &self.barrier
    }

    pub fn gate(&self) -> &dyn QuiescenceGate {
        self.gate.as_ref()
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn worker_count(&self) -> usize {
        self.slots.len()
    }
}

impl std::fmt::Debug for BenchContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BenchContext")
            .field("workers", &self.slots.len())
            .field("seed", &self.seed)
            .field("ready", &self.barrier.ready_count())
            .field("gate_held", &self.gate.is_held())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::gate::HoldGate;

    #[test]
    fn test_slot_layout() {
        assert_eq!(std::mem::align_of::<WorkerState>(), CACHELINE_SIZE);
        assert_eq!(std::mem::size_of::<WorkerState>() % CACHELINE_SIZE, 0);
    }

    #[test]
    fn test_slots_are_aligned() {
        let slots = WorkerSlots::new(7).unwrap();
        for slot in slots.iter() {
            assert_eq!(slot as *const WorkerState as usize % CACHELINE_SIZE, 0);
        }
    }

    #[test]
    fn test_record_op() {
        let state = WorkerState::new(0);
        state.record_op(Duration::from_nanos(100));
        state.record_op(Duration::from_nanos(250));
        assert_eq!(state.throughput(), 2);
        assert_eq!(state.latency_count(), 2);
        assert_eq!(state.latency_sum(), Duration::from_nanos(350));
    }

    #[test]
    fn test_done_clears_alive() {
        let state = WorkerState::new(3);
        assert!(state.is_alive());
        state.advance(WorkerPhase::Ready).unwrap();
        state.advance(WorkerPhase::Running).unwrap();
        assert!(state.is_alive());
        state.advance(WorkerPhase::Done).unwrap();
        assert!(!state.is_alive());
        assert_eq!(state.phase(), WorkerPhase::Done);
    }

    #[test]
    fn test_invalid_advance() {
        let state = WorkerState::new(1);
        let err = state.advance(WorkerPhase::Done).unwrap_err();
        assert!(matches!(
            err,
            EngineError::InvalidPhaseTransition { worker: 1, .. }
        ));
        assert_eq!(state.phase(), WorkerPhase::Init);
    }

    #[test]
    fn test_context() {
        let ctx = BenchContext::new(4, Arc::new(HoldGate::new()), 42).unwrap();
        assert_eq!(ctx.worker_count(), 4);
        assert_eq!(ctx.barrier().expected(), 4);
        assert_eq!(ctx.slot(2).thread_id(), 2);
        assert!(ctx.slots().any_alive());
        assert!(!ctx.gate().is_held());
    }
}
