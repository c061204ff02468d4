//! Tracebench Core Library
//!
//! Trace-driven YCSB micro-benchmark for ordered key-value indexes.
//! Provides the memory-mapped trace reader, the index abstraction with a
//! concurrent skip-list implementation, configuration parsing, and the
//! multi-threaded benchmark engine with its sampling coordinator.

pub mod affinity;
pub mod config;
pub mod engine;
pub mod error;
pub mod index;
pub mod stats;
pub mod trace;
pub mod types;

// Re-export commonly used types
pub use config::{BenchConfig, ConfigLoader, ConfigOverrides};
pub use engine::{BenchmarkEngine, EngineOptions, HoldGate, QuiescenceGate};
pub use error::{BenchError, BenchResult, ConfigError, EngineError, TraceError};
pub use index::{IndexStatus, KvIndex, SkipListIndex};
pub use stats::{IntervalSample, RunSummary};
pub use trace::{DatasetLayout, TraceLoader};
pub use types::{Key, OpKind, Operation, Record};
