//! MappedTrace - read-only mmap wrapper for trace files.
//!
//! Provides a safe abstraction over mmap for replaying trace files without
//! copying them into the heap. All unsafe operations are encapsulated here.

use std::fs::File;
use std::os::unix::io::AsRawFd;
use std::path::{Path, PathBuf};
use std::ptr::NonNull;

use crate::error::TraceError;

/// A trace file mapped privately into memory.
///
/// The mapping is unmapped on drop. Empty files are represented without a
/// mapping since `mmap` rejects zero-length regions.
pub struct MappedTrace {
    /// Path the trace was opened from.
    path: PathBuf,
    /// Pointer to the mapped bytes (None for an empty file).
    ptr: Option<NonNull<u8>>,
    /// Length of the mapping in bytes.
    len: usize,
    /// Backing file, closed on drop after the mapping is released.
    _file: File,
}

// SAFETY: the mapping is read-only and private; no aliasing writes exist.
unsafe impl Send for MappedTrace {}

// SAFETY: shared access only ever reads from the read-only mapping.
unsafe impl Sync for MappedTrace {}

impl MappedTrace {
    /// Open and map a trace file.
    ///
    /// # Errors
    /// Returns TraceError if the file cannot be opened, stat'ed or mapped.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, TraceError> {
        let path = path.as_ref().to_path_buf();

        let file = File::open(&path).map_err(|source| TraceError::Open {
            path: path.clone(),
            source,
        })?;

        let len = file
            .metadata()
            .map_err(|source| TraceError::Open {
                path: path.clone(),
                source,
            })?
            .len() as usize;

        if len == 0 {
            tracing::debug!(path = %path.display(), "Trace file is empty");
            return Ok(Self {
                path,
                ptr: None,
                len: 0,
                _file: file,
            });
        }

        // SAFETY: fd is a valid open descriptor, len is the file size, offset 0
        let ptr = unsafe {
            libc::mmap(
                std::ptr::null_mut(),
                len,
                libc::PROT_READ,
                libc::MAP_PRIVATE,
                file.as_raw_fd(),
                0,
            )
        };

        if ptr == libc::MAP_FAILED {
            return Err(TraceError::MapFailed {
                path,
                reason: format!("mmap failed: {}", std::io::Error::last_os_error()),
            });
        }

        let ptr = NonNull::new(ptr as *mut u8).ok_or_else(|| TraceError::MapFailed {
            path: path.clone(),
            reason: "mmap returned null".to_string(),
        })?;

        tracing::debug!(path = %path.display(), len = len, "Mapped trace file");

        Ok(Self {
            path,
            ptr: Some(ptr),
            len,
            _file: file,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// View of the mapped bytes.
    pub fn as_bytes(&self) -> &[u8] {
        match self.ptr {
            // SAFETY: ptr maps exactly len readable bytes for the lifetime of self
            Some(ptr) => unsafe { std::slice::from_raw_parts(ptr.as_ptr(), self.len) },
            None => &[],
        }
    }

    /// Iterate over the non-empty lines of the trace.
    pub fn lines(&self) -> TraceLines<'_> {
        TraceLines::new(self.as_bytes())
    }
}

impl Drop for MappedTrace {
    fn drop(&mut self) {
        if let Some(ptr) = self.ptr {
            // SAFETY: ptr and len were produced by a successful mmap
            let result = unsafe { libc::munmap(ptr.as_ptr() as *mut libc::c_void, self.len) };
            if result < 0 {
                tracing::error!(
                    path = %self.path.display(),
                    error = %std::io::Error::last_os_error(),
                    "Failed to unmap trace file"
                );
            }
        }
    }
}

/// Newline splitter over trace bytes.
///
/// Runs of newlines are collapsed, so empty lines never surface, and a
/// trailing carriage return is stripped from each line.
pub struct TraceLines<'a> {
    remaining: &'a [u8],
}

impl<'a> TraceLines<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { remaining: bytes }
    }
}

impl<'a> Iterator for TraceLines<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.remaining.is_empty() {
                return None;
            }
            let (line, rest) = match self.remaining.iter().position(|&b| b == b'\n') {
                Some(pos) => (&self.remaining[..pos], &self.remaining[pos + 1..]),
                None => (self.remaining, &self.remaining[self.remaining.len()..]),
            };
            self.remaining = rest;

            // Traces written on Windows end lines with CRLF.
            let line = line.strip_suffix(b"\r").unwrap_or(line);
            if !line.is_empty() {
                return Some(line);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_lines_skip_empty() {
        let lines: Vec<&[u8]> = TraceLines::new(b"a\n\n\nb\r\nc").collect();
        assert_eq!(lines, vec![&b"a"[..], &b"b"[..], &b"c"[..]]);
    }

    #[test]
    fn test_lines_trailing_newline() {
        let lines: Vec<&[u8]> = TraceLines::new(b"r 1\nu 2\n").collect();
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_map_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"ab00000001\nab00000002\n").unwrap();

        let trace = MappedTrace::open(file.path()).unwrap();
        assert_eq!(trace.len(), 22);
        assert_eq!(trace.lines().count(), 2);
    }

    #[test]
    fn test_map_empty_file() {
        let file = NamedTempFile::new().unwrap();
        let trace = MappedTrace::open(file.path()).unwrap();
        assert!(trace.is_empty());
        assert_eq!(trace.lines().count(), 0);
    }

    #[test]
    fn test_missing_file() {
        let err = MappedTrace::open("/nonexistent/trace/file").err().unwrap();
        assert!(matches!(err, TraceError::Open { .. }));
    }
}
