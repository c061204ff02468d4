// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Index collaborator interface.
//!
//! The engine drives any ordered key-value index through [`KvIndex`]. The
//! index owns its concurrency control: workers call it from many threads
//! without taking any lock of their own.

mod skiplist;

pub use skiplist::{SkipListCursor, SkipListIndex};

use crate::types::{Key, Record};

/// Outcome of a mutating index call.
///
/// The benchmark discards these; they exist so index implementations and
/// their tests can report what happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexStatus {
    Ok,
    AlreadyExists,
    NotFound,
    Full,
}

/// Forward cursor positioned by [`KvIndex::seek`].
pub trait IndexCursor {
    /// Advance and return the next entry, or None at the end of the index.
    fn next_record(&mut self) -> Option<Record>;
}

/// Ordered, internally synchronized key-value index.
///
/// Allocation is the implementation's constructor (sized by the configured
/// capacity) and freeing is its `Drop`.
pub trait KvIndex: Send + Sync {
    type Cursor<'a>: IndexCursor
    where
        Self: 'a;

    /// Insert a record; an existing key is left untouched.
    fn insert(&self, record: Record) -> IndexStatus;

    /// Point lookup.
    fn lookup(&self, key: &Key) -> Option<Record>;

    /// Replace the value of an existing key.
    fn update(&self, record: Record) -> IndexStatus;

    /// Position a cursor at the first key greater than or equal to `key`.
    fn seek(&self, key: &Key) -> Self::Cursor<'_>;

    /// Number of records currently stored.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
