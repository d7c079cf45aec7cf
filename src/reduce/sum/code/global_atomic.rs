use crate::device::{Kernel, KernelArgs, WorkGroup};

/// One element per work item, one atomic add per element.
///
/// Every item hits the same accumulator, so throughput is bounded by atomic
/// contention rather than by memory bandwidth.
#[derive(Clone, Copy, Debug, Default)]
pub struct GlobalAtomic;

impl Kernel for GlobalAtomic {
    fn name(&self) -> &'static str {
        "sum_global_atomic"
    }

    fn run_group(&self, group: &mut WorkGroup<'_>, args: &KernelArgs<'_>) {
        group.for_each_item(|item, _| {
            if item.global_id < args.n {
                args.sum.atomic_add(args.input[item.global_id]);
            }
        });
    }
}
