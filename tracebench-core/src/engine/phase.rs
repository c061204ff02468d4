// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Worker lifecycle phases.
//!
//! Implements the worker lifecycle: Init → Ready → Running → Done.
//! Invalid transitions result in EngineError::InvalidPhaseTransition.

use serde::{Deserialize, Serialize};

/// Worker lifecycle phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum WorkerPhase {
    /// Trace is being opened and mapped.
    Init = 0,

    /// Setup finished; waiting on the start barrier.
    Ready = 1,

    /// Replaying the trace.
    Running = 2,

    /// Trace exhausted. Terminal.
    Done = 3,
}

impl WorkerPhase {
    /// Get the phase name for logs and error messages.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Init => "Init",
            Self::Ready => "Ready",
            Self::Running => "Running",
            Self::Done => "Done",
        }
    }

    /// Check if transition to the target phase is valid.
    pub fn can_transition_to(&self, target: WorkerPhase) -> bool {
        matches!(
            (self, target),
            (Self::Init, Self::Ready) | (Self::Ready, Self::Running) | (Self::Running, Self::Done)
        )
    }

    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }

    pub(crate) const fn as_u8(self) -> u8 {
        self as u8
    }

    pub(crate) const fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Self::Init,
            1 => Self::Ready,
            2 => Self::Running,
            _ => Self::Done,
        }
    }
}

impl std::fmt::Display for WorkerPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
