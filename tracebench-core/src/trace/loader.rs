// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Bulk loading of the initial key set.
//!
//! Runs once on the launching thread before any worker starts. Each line of
//! the load trace is a two-byte marker followed by the key payload.

use std::path::Path;
use std::time::{Duration, Instant};

use crate::error::TraceError;
use crate::index::{IndexStatus, KvIndex};
use crate::trace::MappedTrace;
use crate::types::{Key, Record, LINE_PREFIX_LEN};

/// Counters describing a completed load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    /// Lines handed to the index as inserts.
    pub inserted: u64,
    /// Inserts the index rejected (duplicate key or full).
    pub rejected: u64,
    /// Lines too short to carry a key payload.
    pub skipped: u64,
    /// Wall-clock duration of the load.
    pub elapsed: Duration,
}

/// Sequential loader for the initial key set.
pub struct TraceLoader;

impl TraceLoader {
    /// Map the load trace at `path` and insert every key into `index`.
    ///
    /// # Errors
    /// Returns TraceError if the file cannot be opened or mapped.
    pub fn load_file<I: KvIndex>(index: &I, path: impl AsRef<Path>) -> Result<LoadStats, TraceError> {
        let path = path.as_ref();
        let trace = MappedTrace::open(path)?;

        tracing::info!(path = %path.display(), bytes = trace.len(), "Loading initial key set");

        let stats = Self::load_bytes(index, trace.as_bytes());

        tracing::info!(
            inserted = stats.inserted,
            rejected = stats.rejected,
            skipped = stats.skipped,
            elapsed_ms = stats.elapsed.as_millis() as u64,
            "Initial key set loaded"
        );

        Ok(stats)
    }

    /// Insert every key of an in-memory load trace, in order.
    pub fn load_bytes<I: KvIndex>(index: &I, bytes: &[u8]) -> LoadStats {
        let start = Instant::now();
        let mut stats = LoadStats::default();

        for line in super::TraceLines::new(bytes) {
            if line.len() <= LINE_PREFIX_LEN {
                stats.skipped += 1;
                continue;
            }

            let record = Record::zeroed(Key::from_line(line));
            match index.insert(record) {
                IndexStatus::Ok => {}
                status => {
                    stats.rejected += 1;
                    tracing::trace!(key = %record.key, ?status, "Load insert rejected");
                }
            }
            stats.inserted += 1;
        }

        stats.elapsed = start.elapsed();
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::SkipListIndex;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_bytes() {
        let index = SkipListIndex::with_capacity(100);
        let stats = TraceLoader::load_bytes(&index, b"u 00000001\nu 00000002\nu 00000003\n");

        assert_eq!(stats.inserted, 3);
        assert_eq!(stats.rejected, 0);
        assert_eq!(index.len(), 3);
        assert!(index.lookup(&Key::from_payload(b"00000002")).is_some());
    }

    #[test]
    fn test_duplicates_and_short_lines() {
        let index = SkipListIndex::with_capacity(100);
        let stats = TraceLoader::load_bytes(&index, b"u 00000001\nu\nu 00000001\n");

        assert_eq!(stats.inserted, 2);
        assert_eq!(stats.rejected, 1);
        assert_eq!(stats.skipped, 1);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_load_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "u 00000005").unwrap();
        writeln!(file, "u 00000004").unwrap();

        let index = SkipListIndex::with_capacity(100);
        let stats = TraceLoader::load_file(&index, file.path()).unwrap();
        assert_eq!(stats.inserted, 2);
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_load_missing_file() {
        let index = SkipListIndex::with_capacity(100);
        let result = TraceLoader::load_file(&index, "/nonexistent/workload_a_load");
        assert!(matches!(result, Err(TraceError::Open { .. })));
    }
}
