use crate::device::{Kernel, KernelArgs, WorkGroup, WorkItem};

/// Each work item folds `values_per_work_item` elements spaced one global
/// size apart (`i`, `i + G`, `i + 2G`, ...), then adds its partial atomically.
#[derive(Clone, Copy, Debug)]
pub struct StridedLoop {
    pub values_per_work_item: usize,
}

impl StridedLoop {
    pub(crate) fn item_partial(&self, input: &[u32], item: WorkItem) -> u32 {
        let mut partial = 0u32;
        for k in 0..self.values_per_work_item {
            let idx = item.global_id + k * item.global_size;
            if idx >= input.len() {
                break;
            }
            partial = partial.wrapping_add(input[idx]);
        }
        partial
    }
}

impl Kernel for StridedLoop {
    fn name(&self) -> &'static str {
        "sum_loop"
    }

    fn run_group(&self, group: &mut WorkGroup<'_>, args: &KernelArgs<'_>) {
        group.for_each_item(|item, _| {
            args.sum.atomic_add(self.item_partial(args.input, item));
        });
    }
}
