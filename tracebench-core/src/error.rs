//! Custom error types for tracebench.
//!
//! Explicit enum error types throughout the library.
//! No `Box<dyn Error>`, no `anyhow::Result` - all errors are strongly typed.

use std::path::PathBuf;

use thiserror::Error;

use crate::engine::WorkerPhase;

/// Top-level error type for the benchmark engine.
#[derive(Debug, Error)]
pub enum BenchError {
    // =========================================================================
    // Configuration Errors - Fail-Fast on Invalid Config
    // =========================================================================
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    // =========================================================================
    // Trace Errors - Load and Worker Traces
    // =========================================================================
    #[error("Trace error: {0}")]
    Trace(#[from] TraceError),

    // =========================================================================
    // Engine Errors - Worker Lifecycle and Coordination
    // =========================================================================
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    // =========================================================================
    // System Errors
    // =========================================================================
    #[error("IO error: {context} - {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
}

/// Configuration errors prevent the benchmark from starting.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Configuration parse error: {message}")]
    Parse { message: String },

    #[error("Invalid field value: {field} = {value} - {reason}")]
    InvalidFieldValue {
        field: &'static str,
        value: String,
        reason: String,
    },
}

/// Errors raised while mapping or replaying trace files.
#[derive(Debug, Error)]
pub enum TraceError {
    #[error("Failed to open trace file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to map trace file {path}: {reason}")]
    MapFailed { path: PathBuf, reason: String },

    #[error("Delete is not supported by the index (key {key})")]
    UnsupportedDelete { key: String },

    #[error("Wrong operation: unknown opcode {:?}", opcode_char(.opcode))]
    UnknownOpcode { opcode: u8 },
}

/// Errors in the worker lifecycle and coordination layer.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Worker state slot {index} is not cacheline aligned (address {address:#x})")]
    MisalignedSlot { index: usize, address: usize },

    #[error("Invalid phase transition for worker {worker}: {from} -> {to}")]
    InvalidPhaseTransition {
        worker: usize,
        from: WorkerPhase,
        to: WorkerPhase,
    },

    #[error("Failed to spawn worker thread {worker}: {source}")]
    SpawnFailed {
        worker: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to pin worker {worker} to CPU {cpu}: {reason}")]
    AffinityFailed {
        worker: usize,
        cpu: usize,
        reason: String,
    },
}

fn opcode_char(opcode: &u8) -> char {
    char::from(*opcode)
}

/// Result type alias using BenchError.
pub type BenchResult<T> = Result<T, BenchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_opcode_display() {
        let err = TraceError::UnknownOpcode { opcode: b'x' };
        assert!(err.to_string().contains("'x'"));
    }

    #[test]
    fn test_error_chain() {
        let trace_err = TraceError::UnsupportedDelete {
            key: "00000001".to_string(),
        };
        let err: BenchError = trace_err.into();
        assert!(matches!(err, BenchError::Trace(_)));
        assert!(err.to_string().contains("00000001"));
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::InvalidFieldValue {
            field: "fg_threads",
            value: "0".to_string(),
            reason: "Must be greater than 0".to_string(),
        };
        assert!(err.to_string().contains("fg_threads"));
    }
}
