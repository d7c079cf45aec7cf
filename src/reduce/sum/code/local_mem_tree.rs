use super::load_partials;
use crate::device::{Kernel, KernelArgs, WorkGroup};

/// Like [`LocalMemory`](super::LocalMemory), but the group's slots are
/// combined by a halving tree: `log2(local_size)` steps, each followed by a
/// barrier.
#[derive(Clone, Copy, Debug)]
pub struct LocalMemoryTree {
    /// `0` loads one element per item.
    pub values_per_work_item: usize,
    pub local_buffer_size: usize,
}

/// Fold `local[..local_size]` into `local[0]`.
///
/// On each step item `k < half` adds `local[k + half]` into `local[k]`.
/// Requires a power-of-two group size.
pub(crate) fn tree_reduce(group: &mut WorkGroup<'_>) {
    let mut half = group.local_size() / 2;
    while half > 0 {
        group.for_each_item(|item, local| {
            let k = item.local_id;
            if k < half {
                local[k] = local[k].wrapping_add(local[k + half]);
            }
        });
        group.barrier();
        half /= 2;
    }
}

impl Kernel for LocalMemoryTree {
    fn name(&self) -> &'static str {
        "sum_local_mem_and_tree"
    }

    fn local_mem_len(&self) -> usize {
        self.local_buffer_size
    }

    fn run_group(&self, group: &mut WorkGroup<'_>, args: &KernelArgs<'_>) {
        load_partials(group, args, self.values_per_work_item);
        group.barrier();

        tree_reduce(group);

        group.for_each_item(|item, local| {
            if item.local_id == 0 {
                args.sum.atomic_add(local[0]);
            }
        });
    }
}
