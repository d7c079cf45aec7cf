//! The closed set of sum strategies and their tuning parameters.

use crate::error::{ReduceError, Result};
use std::fmt;

/// Tuning knobs from which a lineup of strategies is built.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KernelParams {
    /// Work items per group, for every kernel.
    pub work_group_size: usize,
    /// Elements folded per item by the loop kernels.
    pub values_per_work_item: usize,
    /// Elements folded per item by the local-memory kernels (`0` = one).
    pub local_values_per_work_item: usize,
    /// Local-memory slots per group.
    pub local_buffer_size: usize,
}

impl Default for KernelParams {
    fn default() -> Self {
        Self {
            work_group_size: 128,
            values_per_work_item: 128,
            local_values_per_work_item: 0,
            local_buffer_size: 128,
        }
    }
}

/// Flat, reporting-friendly view of a strategy.
///
/// `values_per_work_item == 0` means one element per work item; the CPU
/// baselines report zero for every tuning field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StrategyDescriptor {
    pub name: &'static str,
    pub work_group_size: usize,
    pub values_per_work_item: usize,
    pub local_buffer_size: usize,
}

/// Group size of the one-element-per-item kernel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GroupShape {
    work_group_size: usize,
}

/// Parameters of the per-item loop kernels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoopShape {
    work_group_size: usize,
    values_per_work_item: usize,
}

/// Parameters of the local-memory kernels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LocalShape {
    work_group_size: usize,
    values_per_work_item: usize,
    local_buffer_size: usize,
}

impl GroupShape {
    pub fn work_group_size(&self) -> usize {
        self.work_group_size
    }
}

impl LoopShape {
    pub fn work_group_size(&self) -> usize {
        self.work_group_size
    }

    pub fn values_per_work_item(&self) -> usize {
        self.values_per_work_item
    }
}

impl LocalShape {
    pub fn work_group_size(&self) -> usize {
        self.work_group_size
    }

    pub fn values_per_work_item(&self) -> usize {
        self.values_per_work_item
    }

    pub fn local_buffer_size(&self) -> usize {
        self.local_buffer_size
    }
}

/// A sum strategy. Kernel variants can only be built through the validating
/// constructors, so every value of this type is runnable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    CpuSequential,
    CpuParallel,
    GlobalAtomic(GroupShape),
    StridedLoop(LoopShape),
    CoalescedLoop(LoopShape),
    LocalMemory(LocalShape),
    LocalMemoryTree(LocalShape),
}

pub const CPU: &str = "cpu";
pub const CPU_PARALLEL: &str = "cpu-parallel";
pub const GLOBAL_ATOMIC: &str = "global-atomic";
pub const STRIDED_LOOP: &str = "strided-loop";
pub const COALESCED_LOOP: &str = "coalesced-loop";
pub const LOCAL_MEMORY: &str = "local-memory";
pub const LOCAL_MEMORY_TREE: &str = "local-memory-tree";

/// Every strategy name, in lineup order.
pub const ALL_NAMES: [&str; 7] = [
    CPU,
    CPU_PARALLEL,
    GLOBAL_ATOMIC,
    STRIDED_LOOP,
    COALESCED_LOOP,
    LOCAL_MEMORY,
    LOCAL_MEMORY_TREE,
];

/// Largest work group a device accepts.
pub const MAX_WORK_GROUP_SIZE: usize = 1024;

/// Largest local memory per group, in `u32` slots (64 KiB).
pub const MAX_LOCAL_BUFFER_SIZE: usize = 16 * 1024;

fn invalid(strategy: &'static str, reason: impl Into<String>) -> ReduceError {
    ReduceError::InvalidConfig {
        strategy,
        reason: reason.into(),
    }
}

fn check_group(strategy: &'static str, work_group_size: usize) -> Result<()> {
    if work_group_size == 0 {
        return Err(invalid(strategy, "work-group size must be positive"));
    }
    if work_group_size > MAX_WORK_GROUP_SIZE {
        return Err(invalid(
            strategy,
            format!("work-group size {work_group_size} exceeds {MAX_WORK_GROUP_SIZE}"),
        ));
    }
    Ok(())
}

fn check_loop(strategy: &'static str, work_group_size: usize, values: usize) -> Result<LoopShape> {
    check_group(strategy, work_group_size)?;
    if values == 0 {
        return Err(invalid(strategy, "values per work item must be positive"));
    }
    Ok(LoopShape {
        work_group_size,
        values_per_work_item: values,
    })
}

fn check_local(
    strategy: &'static str,
    work_group_size: usize,
    values: usize,
    local_buffer_size: usize,
) -> Result<LocalShape> {
    check_group(strategy, work_group_size)?;
    if local_buffer_size > MAX_LOCAL_BUFFER_SIZE {
        return Err(invalid(
            strategy,
            format!("local buffer of {local_buffer_size} slots exceeds {MAX_LOCAL_BUFFER_SIZE}"),
        ));
    }
    if local_buffer_size < work_group_size {
        return Err(invalid(
            strategy,
            format!(
                "local buffer of {local_buffer_size} slots cannot hold a group of {work_group_size}"
            ),
        ));
    }
    Ok(LocalShape {
        work_group_size,
        values_per_work_item: values,
        local_buffer_size,
    })
}

impl Strategy {
    pub fn global_atomic(work_group_size: usize) -> Result<Self> {
        check_group(GLOBAL_ATOMIC, work_group_size)?;
        Ok(Self::GlobalAtomic(GroupShape { work_group_size }))
    }

    pub fn strided_loop(work_group_size: usize, values_per_work_item: usize) -> Result<Self> {
        check_loop(STRIDED_LOOP, work_group_size, values_per_work_item).map(Self::StridedLoop)
    }

    pub fn coalesced_loop(work_group_size: usize, values_per_work_item: usize) -> Result<Self> {
        check_loop(COALESCED_LOOP, work_group_size, values_per_work_item).map(Self::CoalescedLoop)
    }

    pub fn local_memory(
        work_group_size: usize,
        values_per_work_item: usize,
        local_buffer_size: usize,
    ) -> Result<Self> {
        check_local(
            LOCAL_MEMORY,
            work_group_size,
            values_per_work_item,
            local_buffer_size,
        )
        .map(Self::LocalMemory)
    }

    /// The halving tree needs a power-of-two group size.
    pub fn local_memory_tree(
        work_group_size: usize,
        values_per_work_item: usize,
        local_buffer_size: usize,
    ) -> Result<Self> {
        let shape = check_local(
            LOCAL_MEMORY_TREE,
            work_group_size,
            values_per_work_item,
            local_buffer_size,
        )?;
        if !work_group_size.is_power_of_two() {
            return Err(invalid(
                LOCAL_MEMORY_TREE,
                format!("work-group size {work_group_size} is not a power of two"),
            ));
        }
        Ok(Self::LocalMemoryTree(shape))
    }

    /// Build the strategy called `name` from shared tuning parameters.
    pub fn from_name(name: &str, params: &KernelParams) -> Result<Self> {
        match name {
            CPU => Ok(Self::CpuSequential),
            CPU_PARALLEL => Ok(Self::CpuParallel),
            GLOBAL_ATOMIC => Self::global_atomic(params.work_group_size),
            STRIDED_LOOP => Self::strided_loop(params.work_group_size, params.values_per_work_item),
            COALESCED_LOOP => {
                Self::coalesced_loop(params.work_group_size, params.values_per_work_item)
            }
            LOCAL_MEMORY => Self::local_memory(
                params.work_group_size,
                params.local_values_per_work_item,
                params.local_buffer_size,
            ),
            LOCAL_MEMORY_TREE => Self::local_memory_tree(
                params.work_group_size,
                params.local_values_per_work_item,
                params.local_buffer_size,
            ),
            other => Err(ReduceError::UnknownStrategy(other.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::CpuSequential => CPU,
            Self::CpuParallel => CPU_PARALLEL,
            Self::GlobalAtomic(_) => GLOBAL_ATOMIC,
            Self::StridedLoop(_) => STRIDED_LOOP,
            Self::CoalescedLoop(_) => COALESCED_LOOP,
            Self::LocalMemory(_) => LOCAL_MEMORY,
            Self::LocalMemoryTree(_) => LOCAL_MEMORY_TREE,
        }
    }

    /// `"cpu"` for the host baselines, `"gpu"` for the kernels.
    pub fn category(&self) -> &'static str {
        match self {
            Self::CpuSequential | Self::CpuParallel => "cpu",
            _ => "gpu",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::CpuSequential => "Sequential loop on the calling thread",
            Self::CpuParallel => "Thread-pool fold with per-thread partial sums",
            Self::GlobalAtomic(_) => "One element per work item, one atomic add each",
            Self::StridedLoop(_) => "Per-item loop over elements one global size apart",
            Self::CoalescedLoop(_) => "Per-item loop over a contiguous block",
            Self::LocalMemory(_) => "Local-memory staging, sequential group sum",
            Self::LocalMemoryTree(_) => "Local-memory staging, halving-tree group sum",
        }
    }

    pub fn descriptor(&self) -> StrategyDescriptor {
        let (work_group_size, values_per_work_item, local_buffer_size) = match *self {
            Self::CpuSequential | Self::CpuParallel => (0, 0, 0),
            Self::GlobalAtomic(s) => (s.work_group_size, 0, 0),
            Self::StridedLoop(s) | Self::CoalescedLoop(s) => {
                (s.work_group_size, s.values_per_work_item, 0)
            }
            Self::LocalMemory(s) | Self::LocalMemoryTree(s) => {
                (s.work_group_size, s.values_per_work_item, s.local_buffer_size)
            }
        };
        StrategyDescriptor {
            name: self.name(),
            work_group_size,
            values_per_work_item,
            local_buffer_size,
        }
    }

    /// Runs on the calling thread only.
    pub fn is_single_threaded(&self) -> bool {
        matches!(self, Self::CpuSequential)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = self.descriptor();
        match self {
            Self::CpuSequential | Self::CpuParallel => write!(f, "{}", d.name),
            Self::GlobalAtomic(_) => write!(f, "{} (wg={})", d.name, d.work_group_size),
            Self::StridedLoop(_) | Self::CoalescedLoop(_) => write!(
                f,
                "{} (wg={}, v={})",
                d.name, d.work_group_size, d.values_per_work_item
            ),
            Self::LocalMemory(_) | Self::LocalMemoryTree(_) => write!(
                f,
                "{} (wg={}, v={}, local={})",
                d.name, d.work_group_size, d.values_per_work_item, d.local_buffer_size
            ),
        }
    }
}
