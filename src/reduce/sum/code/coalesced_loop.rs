use super::block_partial;
use crate::device::{Kernel, KernelArgs, WorkGroup, WorkItem};

/// Same partitioning as [`StridedLoop`](super::StridedLoop), but work item
/// `i` reads the contiguous block `[i * v, (i + 1) * v)`.
#[derive(Clone, Copy, Debug)]
pub struct CoalescedLoop {
    pub values_per_work_item: usize,
}

impl CoalescedLoop {
    pub(crate) fn item_partial(&self, input: &[u32], item: WorkItem) -> u32 {
        let values = self.values_per_work_item;
        block_partial(input, item.global_id * values, values)
    }
}

impl Kernel for CoalescedLoop {
    fn name(&self) -> &'static str {
        "sum_loop_coalesced"
    }

    fn run_group(&self, group: &mut WorkGroup<'_>, args: &KernelArgs<'_>) {
        group.for_each_item(|item, _| {
            args.sum.atomic_add(self.item_partial(args.input, item));
        });
    }
}
