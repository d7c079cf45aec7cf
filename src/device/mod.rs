//! GPU-style compute backend.
//!
//! Kernels are written against the usual data-parallel model: a launch is a
//! number of work groups of fixed size, work items inside a group share a
//! small local memory and meet at barriers, and groups only communicate
//! through atomic adds into a global accumulator.
//!
//! [`CpuDevice`] executes that model on a `rayon` thread pool.

pub mod cpu;
pub mod work_group;

pub use cpu::CpuDevice;
pub use work_group::{GroupBarrier, WorkGroup, WorkItem};

use std::sync::atomic::{AtomicU32, Ordering};

/// Integer division rounding up.
#[inline]
pub fn divup(a: usize, b: usize) -> usize {
    a.div_ceil(b)
}

/// Launch topology: work-group size and the global size rounded up to a
/// whole number of groups.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorkSize {
    local_size: usize,
    global_size: usize,
}

impl WorkSize {
    /// Cover `global_work_size` work items with groups of `local_size`.
    ///
    /// # Panics
    /// Panics if `local_size` is zero.
    pub fn new(local_size: usize, global_work_size: usize) -> Self {
        assert!(local_size > 0, "work-group size must be positive");
        Self {
            local_size,
            global_size: divup(global_work_size, local_size) * local_size,
        }
    }

    pub fn local_size(&self) -> usize {
        self.local_size
    }

    pub fn global_size(&self) -> usize {
        self.global_size
    }

    pub fn num_groups(&self) -> usize {
        self.global_size / self.local_size
    }
}

/// The single shared result cell of a kernel launch.
///
/// Written only through [`atomic_add`](Self::atomic_add) while a dispatch is
/// running, read back after the dispatch has joined.
#[derive(Debug, Default)]
pub struct GlobalAccumulator(AtomicU32);

impl GlobalAccumulator {
    pub fn new() -> Self {
        Self(AtomicU32::new(0))
    }

    pub fn reset(&self) {
        self.0.store(0, Ordering::Release);
    }

    /// Lock-free wrapping add.
    #[inline]
    pub fn atomic_add(&self, value: u32) {
        self.0.fetch_add(value, Ordering::Relaxed);
    }

    pub fn read(&self) -> u32 {
        self.0.load(Ordering::Acquire)
    }
}

/// Buffers bound to a sum kernel: the input array, its length and the result cell.
#[derive(Clone, Copy, Debug)]
pub struct KernelArgs<'a> {
    pub input: &'a [u32],
    pub n: usize,
    pub sum: &'a GlobalAccumulator,
}

impl<'a> KernelArgs<'a> {
    pub fn new(input: &'a [u32], sum: &'a GlobalAccumulator) -> Self {
        Self {
            input,
            n: input.len(),
            sum,
        }
    }
}

/// A kernel, expressed as the work one group performs.
///
/// Implementations describe per-item regions through
/// [`WorkGroup::for_each_item`] and separate them with
/// [`WorkGroup::barrier`].
pub trait Kernel: Sync {
    /// Kernel entry point name, as it would appear in a program source.
    fn name(&self) -> &'static str;

    /// Number of `u32` local-memory slots each group needs.
    fn local_mem_len(&self) -> usize {
        0
    }

    fn run_group(&self, group: &mut WorkGroup<'_>, args: &KernelArgs<'_>);
}

/// Something that can launch kernels.
pub trait ComputeBackend: Send + Sync {
    /// Human-readable device name.
    fn name(&self) -> &str;

    /// Number of hardware threads the backend schedules on.
    fn threads(&self) -> usize;

    /// Run `kernel` over every group of `work_size` and return once all
    /// groups have finished. A launch with zero groups touches no memory.
    fn dispatch(&self, kernel: &dyn Kernel, work_size: WorkSize, args: &KernelArgs<'_>);

    /// Run a host job inside the backend's thread pool.
    fn install(&self, job: &(dyn Fn() -> u32 + Sync)) -> u32;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_divup() {
        assert_eq!(divup(0, 128), 0);
        assert_eq!(divup(1, 128), 1);
        assert_eq!(divup(128, 128), 1);
        assert_eq!(divup(129, 128), 2);
    }

    #[test]
    fn test_work_size_rounds_up() {
        let ws = WorkSize::new(4, 10);
        assert_eq!(ws.global_size(), 12);
        assert_eq!(ws.num_groups(), 3);
    }

    #[test]
    fn test_work_size_empty() {
        let ws = WorkSize::new(128, 0);
        assert_eq!(ws.global_size(), 0);
        assert_eq!(ws.num_groups(), 0);
    }

    #[test]
    #[should_panic(expected = "work-group size must be positive")]
    fn test_work_size_zero_group() {
        let _ = WorkSize::new(0, 10);
    }

    #[test]
    fn test_accumulator_wraps_and_resets() {
        let acc = GlobalAccumulator::new();
        acc.atomic_add(u32::MAX);
        acc.atomic_add(3);
        assert_eq!(acc.read(), 2);
        acc.reset();
        assert_eq!(acc.read(), 0);
    }
}
