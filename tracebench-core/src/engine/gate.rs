// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Quiescence gate.
//!
//! A background subsystem (index retraining, compaction, ...) holds the gate
//! to suspend foreground traffic. The engine only consumes the gate through
//! [`QuiescenceGate`]; it never takes holds itself.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Condvar, Mutex, PoisonError};

/// Pause signal observed by workers and the sampling coordinator.
pub trait QuiescenceGate: Send + Sync {
    /// True while at least one hold is outstanding.
    fn is_held(&self) -> bool;

    /// Block until no hold is outstanding.
    fn await_release(&self);
}

/// Hold-counted gate driven by a background subsystem.
#[derive(Debug, Default)]
pub struct HoldGate {
    /// Lock-free mirror of `holds` for the hot-path check.
    held: AtomicUsize,
    holds: Mutex<usize>,
    cond: Condvar,
}

impl HoldGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take a hold. Foreground work pauses until every hold is dropped.
    pub fn hold(&self) -> GateHold<'_> {
        let mut holds = self.holds.lock().unwrap_or_else(PoisonError::into_inner);
        *holds += 1;
        self.held.store(*holds, Ordering::Release);
        tracing::debug!(holds = *holds, "Quiescence gate held");
        GateHold { gate: self }
    }

    pub fn hold_count(&self) -> usize {
        self.held.load(Ordering::Acquire)
    }

    fn release_one(&self) {
        let mut holds = self.holds.lock().unwrap_or_else(PoisonError::into_inner);
        *holds = holds.saturating_sub(1);
        self.held.store(*holds, Ordering::Release);
        if *holds == 0 {
            tracing::debug!("Quiescence gate released");
            self.cond.notify_all();
        }
    }
}

impl QuiescenceGate for HoldGate {
    fn is_held(&self) -> bool {
        self.held.load(Ordering::Acquire) > 0
    }

    fn await_release(&self) {
        let holds = self.holds.lock().unwrap_or_else(PoisonError::into_inner);
        let _holds = self
            .cond
            .wait_while(holds, |h| *h > 0)
            .unwrap_or_else(PoisonError::into_inner);
    }
}

/// RAII hold on a [`HoldGate`]; dropping it releases the hold.
#[must_use = "the gate is released as soon as the hold is dropped"]
pub struct GateHold<'a> {
    gate: &'a HoldGate,
}

impl Drop for GateHold<'_> {
    fn drop(&mut self) {
        self.gate.release_one();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicBool;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_unheld_gate_does_not_block() {
        let gate = HoldGate::new();
        assert!(!gate.is_held());
        gate.await_release();
    }

    #[test]
    fn test_nested_holds() {
        let gate = HoldGate::new();
        let a = gate.hold();
        let b = gate.hold();
        assert_eq!(gate.hold_count(), 2);
        drop(a);
        assert!(gate.is_held());
        drop(b);
        assert!(!gate.is_held());
    }

    #[test]
    fn test_waiter_blocks_until_release() {
        let gate = HoldGate::new();
        let passed = AtomicBool::new(false);

        thread::scope(|s| {
            let hold = gate.hold();
            s.spawn(|| {
                gate.await_release();
                passed.store(true, Ordering::SeqCst);
            });

            thread::sleep(Duration::from_millis(50));
            assert!(!passed.load(Ordering::SeqCst));
            drop(hold);
        });

        assert!(passed.load(Ordering::SeqCst));
    }
}
