// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Start barrier between the launching thread and the workers.
//!
//! Workers register readiness and block; the launching thread blocks until
//! every worker has registered, then releases them all at once. Both sides
//! wait on a condition variable instead of polling. Workers wake in
//! scheduler order, so the start is as synchronized as the OS allows and no
//! tighter.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// How often the launcher reports progress while workers initialize.
const READY_POLL: Duration = Duration::from_secs(1);

#[derive(Debug, Default)]
struct BarrierState {
    ready: usize,
    released: bool,
}

/// Condvar-based start barrier for a fixed number of workers.
#[derive(Debug)]
pub struct StartBarrier {
    expected: usize,
    state: Mutex<BarrierState>,
    cond: Condvar,
}

impl StartBarrier {
    pub fn new(expected: usize) -> Self {
        Self {
            expected,
            state: Mutex::new(BarrierState::default()),
            cond: Condvar::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, BarrierState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of workers the barrier waits for.
    pub fn expected(&self) -> usize {
        self.expected
    }

    /// Register one worker as ready and block until the barrier is released.
    ///
    /// Returns the worker's arrival order (1-based).
    pub fn arrive_and_wait(&self) -> usize {
        let mut state = self.lock();
        state.ready += 1;
        let arrival = state.ready;
        self.cond.notify_all();

        let _state = self
            .cond
            .wait_while(state, |s| !s.released)
            .unwrap_or_else(PoisonError::into_inner);
        arrival
    }

    /// Block until every expected worker has arrived, logging the ready
    /// count once per poll period while waiting.
    ///
    /// Returns the ready count observed at that moment, which equals
    /// `expected`.
    pub fn wait_for_ready(&self) -> usize {
        loop {
            let ready = self.wait_for_ready_timeout(READY_POLL);
            if ready >= self.expected {
                return ready;
            }
            tracing::info!(
                ready = ready,
                expected = self.expected,
                "Waiting for workers to become ready"
            );
        }
    }

    /// Like [`wait_for_ready`](Self::wait_for_ready) but gives up after
    /// `timeout`, returning the count observed so far.
    pub fn wait_for_ready_timeout(&self, timeout: Duration) -> usize {
        let state = self.lock();
        let (state, _) = self
            .cond
            .wait_timeout_while(state, timeout, |s| s.ready < self.expected)
            .unwrap_or_else(PoisonError::into_inner);
        state.ready
    }

    /// Release every waiting worker. Idempotent.
    pub fn release(&self) {
        let mut state = self.lock();
        state.released = true;
        self.cond.notify_all();
    }

    pub fn ready_count(&self) -> usize {
        self.lock().ready
    }

    pub fn is_released(&self) -> bool {
        self.lock().released
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_ready_count_equals_expected_before_release() {
        for n in [1usize, 2, 4, 8] {
            let barrier = Arc::new(StartBarrier::new(n));
            let started = Arc::new(AtomicUsize::new(0));

            let handles: Vec<_> = (0..n)
                .map(|_| {
                    let barrier = Arc::clone(&barrier);
                    let started = Arc::clone(&started);
                    thread::spawn(move || {
                        barrier.arrive_and_wait();
                        started.fetch_add(1, Ordering::SeqCst);
                    })
                })
                .collect();

            let observed = barrier.wait_for_ready();
            assert_eq!(observed, n);
            // Nobody may pass the barrier before release.
            assert_eq!(started.load(Ordering::SeqCst), 0);

            barrier.release();
            for h in handles {
                h.join().unwrap();
            }
            assert_eq!(started.load(Ordering::SeqCst), n);
        }
    }

    #[test]
    fn test_timeout_reports_partial_count() {
        let barrier = StartBarrier::new(3);
        let observed = barrier.wait_for_ready_timeout(Duration::from_millis(20));
        assert_eq!(observed, 0);
        assert!(!barrier.is_released());
    }

    #[test]
    fn test_release_before_arrival_does_not_block() {
        let barrier = StartBarrier::new(1);
        barrier.release();
        assert_eq!(barrier.arrive_and_wait(), 1);
        assert_eq!(barrier.ready_count(), 1);
    }
}
