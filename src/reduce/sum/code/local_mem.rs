use super::block_partial;
use crate::device::{Kernel, KernelArgs, WorkGroup};

/// Every item parks its value in local memory; after a barrier, local id 0
/// sums the group's slots and issues the group's only atomic add.
#[derive(Clone, Copy, Debug)]
pub struct LocalMemory {
    /// `0` loads one element per item.
    pub values_per_work_item: usize,
    pub local_buffer_size: usize,
}

/// First phase shared by both local-memory kernels: each item writes its
/// partial (one element, or a contiguous block of `values_per_work_item`)
/// into `local[local_id]`. Items past the end of the input write zero.
pub(crate) fn load_partials(
    group: &mut WorkGroup<'_>,
    args: &KernelArgs<'_>,
    values_per_work_item: usize,
) {
    group.for_each_item(|item, local| {
        local[item.local_id] = if values_per_work_item == 0 {
            args.input.get(item.global_id).copied().unwrap_or(0)
        } else {
            block_partial(
                args.input,
                item.global_id * values_per_work_item,
                values_per_work_item,
            )
        };
    });
}

impl Kernel for LocalMemory {
    fn name(&self) -> &'static str {
        "sum_local_mem"
    }

    fn local_mem_len(&self) -> usize {
        self.local_buffer_size
    }

    fn run_group(&self, group: &mut WorkGroup<'_>, args: &KernelArgs<'_>) {
        load_partials(group, args, self.values_per_work_item);
        group.barrier();

        group.for_each_item(|item, local| {
            if item.local_id == 0 {
                let total = local[..item.local_size]
                    .iter()
                    .fold(0u32, |acc, &v| acc.wrapping_add(v));
                args.sum.atomic_add(total);
            }
        });
    }
}
