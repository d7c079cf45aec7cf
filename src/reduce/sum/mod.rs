//! # Parallel Sum
//!
//! Sums an array of `u32` with wrapping addition:
//!
//! `sum(a) = a[0] + a[1] + ... + a[n-1]  (mod 2^32)`
//!
//! ## Strategies
//!
//! - **cpu**: sequential loop, the reference every other strategy must match
//! - **cpu-parallel**: per-thread partial sums combined once all threads finish
//! - **global-atomic**: one atomic add per element
//! - **strided-loop**: per-item loop at a global-size stride, one atomic add per item
//! - **coalesced-loop**: per-item loop over a contiguous block, one atomic add per item
//! - **local-memory**: group staging in local memory, one atomic add per group
//! - **local-memory-tree**: same staging, logarithmic-depth group reduction
//!
//! Wrapping addition is associative and commutative, so every grouping of the
//! same elements yields the same bits.

pub mod code;
pub mod strategy;
pub mod test;

pub use strategy::{KernelParams, Strategy, StrategyDescriptor};

use crate::device::{ComputeBackend, GlobalAccumulator, Kernel, KernelArgs, WorkSize};

impl Strategy {
    /// Launch topology for `n` elements, `None` for the host baselines.
    ///
    /// The global work size is `ceil(n / v)` for kernels that fold `v`
    /// elements per item and `n` otherwise.
    pub fn work_size(&self, n: usize) -> Option<WorkSize> {
        let d = self.descriptor();
        if d.work_group_size == 0 {
            return None;
        }
        let global_work_size = if d.values_per_work_item != 0 {
            crate::device::divup(n, d.values_per_work_item)
        } else {
            n
        };
        Some(WorkSize::new(d.work_group_size, global_work_size))
    }

    fn kernel(&self) -> Option<Box<dyn Kernel>> {
        let kernel: Box<dyn Kernel> = match *self {
            Self::CpuSequential | Self::CpuParallel => return None,
            Self::GlobalAtomic(_) => Box::new(code::GlobalAtomic),
            Self::StridedLoop(s) => Box::new(code::StridedLoop {
                values_per_work_item: s.values_per_work_item(),
            }),
            Self::CoalescedLoop(s) => Box::new(code::CoalescedLoop {
                values_per_work_item: s.values_per_work_item(),
            }),
            Self::LocalMemory(s) => Box::new(code::LocalMemory {
                values_per_work_item: s.values_per_work_item(),
                local_buffer_size: s.local_buffer_size(),
            }),
            Self::LocalMemoryTree(s) => Box::new(code::LocalMemoryTree {
                values_per_work_item: s.values_per_work_item(),
                local_buffer_size: s.local_buffer_size(),
            }),
        };
        Some(kernel)
    }

    /// Run once and return the sum.
    ///
    /// Kernels add into `acc`, which the caller must have reset; the host
    /// baselines ignore it.
    pub fn execute(
        &self,
        input: &[u32],
        backend: &dyn ComputeBackend,
        acc: &GlobalAccumulator,
    ) -> u32 {
        match self {
            Self::CpuSequential => code::sum_sequential(input),
            Self::CpuParallel => backend.install(&|| code::sum_parallel(input)),
            _ => {
                let launch = (self.kernel(), self.work_size(input.len()));
                if let (Some(kernel), Some(work_size)) = launch {
                    backend.dispatch(kernel.as_ref(), work_size, &KernelArgs::new(input, acc));
                }
                acc.read()
            }
        }
    }
}

/// Sum `input` with `strategy` using a fresh accumulator.
pub fn reduce(strategy: &Strategy, input: &[u32], backend: &dyn ComputeBackend) -> u32 {
    let acc = GlobalAccumulator::new();
    strategy.execute(input, backend, &acc)
}
