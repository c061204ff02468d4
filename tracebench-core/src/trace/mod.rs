// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Trace file access.
//!
//! Memory-mapped load and worker traces, newline splitting, dataset paths
//! and the initial bulk load.

mod layout;
mod loader;
mod region;

pub use layout::DatasetLayout;
pub use loader::{LoadStats, TraceLoader};
pub use region::{MappedTrace, TraceLines};
