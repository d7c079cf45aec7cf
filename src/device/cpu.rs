//! CPU device: work groups scheduled across a dedicated `rayon` pool.

use super::{ComputeBackend, Kernel, KernelArgs, WorkGroup, WorkSize};
use crate::error::{ReduceError, Result};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{debug, info};

/// Executes kernels on host threads.
///
/// Each pool thread keeps its own local-memory buffer and runs whole groups
/// on it; groups share nothing but the kernel arguments.
pub struct CpuDevice {
    pool: ThreadPool,
    name: String,
}

impl CpuDevice {
    /// Build a device with `threads` workers, or one per core when `None`.
    pub fn new(threads: Option<usize>) -> Result<Self> {
        let mut builder = ThreadPoolBuilder::new().thread_name(|i| format!("sum-worker-{i}"));
        if let Some(threads) = threads {
            builder = builder.num_threads(threads);
        }
        let pool = builder
            .build()
            .map_err(|e| ReduceError::BackendUnavailable(e.to_string()))?;

        let name = "cpu (rayon)".to_string();
        info!(device = %name, threads = pool.current_num_threads(), "compute device ready");
        Ok(Self { pool, name })
    }
}

impl ComputeBackend for CpuDevice {
    fn name(&self) -> &str {
        &self.name
    }

    fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    fn dispatch(&self, kernel: &dyn Kernel, work_size: WorkSize, args: &KernelArgs<'_>) {
        let groups = work_size.num_groups();
        if groups == 0 {
            return;
        }
        debug!(
            kernel = kernel.name(),
            groups,
            local_size = work_size.local_size(),
            "dispatch"
        );

        let local_len = kernel.local_mem_len();
        self.pool.install(|| {
            (0..groups).into_par_iter().for_each_init(
                || vec![0u32; local_len],
                |local, group_id| {
                    let mut group = WorkGroup::new(group_id, work_size, local);
                    kernel.run_group(&mut group, args);
                },
            );
        });
    }

    fn install(&self, job: &(dyn Fn() -> u32 + Sync)) -> u32 {
        self.pool.install(job)
    }
}
