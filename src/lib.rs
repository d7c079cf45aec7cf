//! # Parallel-Sum
//!
//! Benchmarks of strategies for summing a large `u32` array: two host
//! baselines and five data-parallel kernels run on a work-group device.

pub mod cli;
pub mod device;
pub mod error;
pub mod input;
pub mod reduce;
pub mod registry;
pub mod utils;

/// Re-export tui from utils
pub use utils::tui;

pub use error::{ReduceError, Result};

/// Re-export commonly used items
pub mod prelude {
    pub use crate::device::{ComputeBackend, CpuDevice, GlobalAccumulator};
    pub use crate::error::{ReduceError, Result};
    pub use crate::input::InputArray;
    pub use crate::reduce::sum::{reduce, KernelParams, Strategy};
    pub use crate::registry::{build_registry, build_selection, StrategyRegistry};
    pub use crate::utils::{run_all, run_strategy, TimingConfig};
}
