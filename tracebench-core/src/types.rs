// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Fixed-width keys, records and parsed trace operations.
//!
//! Keys are validated by construction: every [`Key`] is exactly [`KEY_LEN`]
//! bytes and compares byte-wise, so the derived `Ord` is the lexicographic
//! order the index relies on.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TraceError;

/// Length in bytes of every key handled by the engine.
pub const KEY_LEN: usize = 8;

/// Length in bytes of the value stored next to each key.
pub const VALUE_LEN: usize = 8;

/// Number of entries a scan advances past its seek position.
pub const SCAN_LENGTH: usize = 10;

/// Width of the marker that precedes the key payload on every trace line.
pub const LINE_PREFIX_LEN: usize = 2;

/// Value payload attached to a key.
pub type Value = [u8; VALUE_LEN];

/// Fixed-length byte key with lexicographic ordering.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Key([u8; KEY_LEN]);

impl Key {
    /// Smallest possible key (all zero bytes).
    pub const MIN: Key = Key([0u8; KEY_LEN]);

    /// Largest possible key (all 0xFF bytes).
    pub const MAX: Key = Key([0xFFu8; KEY_LEN]);

    /// Wrap an exact-width byte array.
    pub const fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Build a key from a trace payload.
    ///
    /// Bytes beyond `KEY_LEN` are ignored and a short payload is padded with
    /// zero bytes, so the key width never varies.
    pub fn from_payload(payload: &[u8]) -> Self {
        let mut buf = [0u8; KEY_LEN];
        let n = payload.len().min(KEY_LEN);
        buf[..n].copy_from_slice(&payload[..n]);
        Self(buf)
    }

    /// Build a key from a whole trace line, skipping the two-byte marker.
    pub fn from_line(line: &[u8]) -> Self {
        Self::from_payload(line.get(LINE_PREFIX_LEN..).unwrap_or(&[]))
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }

    pub const fn len(&self) -> usize {
        KEY_LEN
    }

    pub const fn is_empty(&self) -> bool {
        KEY_LEN == 0
    }
}

impl From<[u8; KEY_LEN]> for Key {
    fn from(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Key {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Key(")?;
        for b in &self.0 {
            write!(f, "{:02x}", b)?;
        }
        write!(f, ")")
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.0))
    }
}

/// A key together with its value, as handed to the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record {
    pub key: Key,
    pub value: Value,
}

impl Record {
    pub fn new(key: Key, value: Value) -> Self {
        Self { key, value }
    }

    /// Record carrying a zeroed value, the shape every load and write uses.
    pub fn zeroed(key: Key) -> Self {
        Self {
            key,
            value: [0u8; VALUE_LEN],
        }
    }

    /// Byte sum over key and value. Depends on every stored byte, so the
    /// record cannot be skipped when the result is observed.
    pub fn touch(&self) -> usize {
        self.key
            .as_bytes()
            .iter()
            .chain(self.value.iter())
            .fold(0usize, |acc, &b| acc.wrapping_add(usize::from(b)))
    }
}

/// Trace opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpKind {
    Read,
    Update,
    Insert,
    Delete,
    Scan,
}

impl OpKind {
    /// All opcodes, in trace-letter order.
    pub const ALL: [OpKind; 5] = [
        OpKind::Read,
        OpKind::Update,
        OpKind::Insert,
        OpKind::Delete,
        OpKind::Scan,
    ];

    /// Decode the opcode letter that starts a trace line.
    pub fn from_byte(byte: u8) -> Result<Self, TraceError> {
        match byte {
            b'r' => Ok(Self::Read),
            b'u' => Ok(Self::Update),
            b'i' => Ok(Self::Insert),
            b'd' => Ok(Self::Delete),
            b's' => Ok(Self::Scan),
            other => Err(TraceError::UnknownOpcode { opcode: other }),
        }
    }

    pub const fn letter(&self) -> char {
        match self {
            Self::Read => 'r',
            Self::Update => 'u',
            Self::Insert => 'i',
            Self::Delete => 'd',
            Self::Scan => 's',
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Update => "update",
            Self::Insert => "insert",
            Self::Delete => "delete",
            Self::Scan => "scan",
        }
    }
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One parsed worker trace line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operation {
    pub kind: OpKind,
    pub key: Key,
}

impl Operation {
    /// Parse `<opcode><separator><key-payload>`.
    ///
    /// Returns `Ok(None)` for a line too short to carry a key (the caller
    /// treats it as the end of a malformed trace).
    pub fn parse(line: &[u8]) -> Result<Option<Self>, TraceError> {
        let Some(&opcode) = line.first() else {
            return Ok(None);
        };
        let kind = OpKind::from_byte(opcode)?;
        if line.len() <= LINE_PREFIX_LEN {
            return Ok(None);
        }
        Ok(Some(Self {
            kind,
            key: Key::from_line(line),
        }))
    }
}
