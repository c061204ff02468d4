// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! CPU affinity for worker threads.
//!
//! Round-robin assignment of worker threads to logical CPUs so each
//! foreground worker keeps its cache warm on one core.

use nix::sched::{sched_setaffinity, CpuSet};
use nix::unistd::Pid;
use std::sync::atomic::{AtomicUsize, Ordering};

/// CPU allocator that distributes worker threads evenly across cores.
#[derive(Debug)]
pub struct CpuAllocator {
    /// Total number of logical CPUs available
    num_cpus: usize,
    /// Next CPU to assign (atomic for thread-safety)
    next_cpu: AtomicUsize,
}

impl CpuAllocator {
    /// Create a new CPU allocator sized to the logical CPU count.
    pub fn new() -> Self {
        Self::with_cpus(num_cpus::get())
    }

    pub fn with_cpus(num_cpus: usize) -> Self {
        let num_cpus = num_cpus.max(1);
        tracing::debug!(num_cpus = num_cpus, "CpuAllocator initialized");
        Self {
            num_cpus,
            next_cpu: AtomicUsize::new(0),
        }
    }

    /// Allocate the next CPU core using round-robin.
    pub fn allocate(&self) -> usize {
        self.next_cpu.fetch_add(1, Ordering::Relaxed) % self.num_cpus
    }

    /// Get the number of available CPUs.
    pub fn num_cpus(&self) -> usize {
        self.num_cpus
    }
}

impl Default for CpuAllocator {
    fn default() -> Self {
        Self::new()
    }
}

/// Pin the calling thread to `cpu`.
pub fn pin_current_thread(cpu: usize) -> Result<(), nix::Error> {
    let mut cpuset = CpuSet::new();
    cpuset.set(cpu)?;
    // Pid 0 targets the calling thread.
    sched_setaffinity(Pid::from_raw(0), &cpuset)?;

    tracing::debug!(cpu = cpu, "Thread pinned to CPU");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_round_robin_allocation() {
        let allocator = CpuAllocator::with_cpus(4);
        let cpus: Vec<usize> = (0..8).map(|_| allocator.allocate()).collect();
        assert_eq!(cpus, vec![0, 1, 2, 3, 0, 1, 2, 3]);
    }

    #[test]
    fn test_even_distribution() {
        let allocator = CpuAllocator::new();
        let n = allocator.num_cpus();
        let seen: HashSet<usize> = (0..n).map(|_| allocator.allocate()).collect();
        assert_eq!(seen.len(), n);
    }

    #[test]
    fn test_zero_cpus_clamped() {
        let allocator = CpuAllocator::with_cpus(0);
        assert_eq!(allocator.allocate(), 0);
    }

    #[test]
    fn test_pin_to_cpu_zero() {
        // CPU 0 is always present; pinning may still be refused in sandboxes.
        std::thread::spawn(|| {
            let _ = pin_current_thread(0);
        })
        .join()
        .unwrap();
    }
}
