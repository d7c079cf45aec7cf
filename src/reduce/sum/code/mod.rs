//! Sum implementations.
//!
//! Two host baselines and five kernels. Kernels only differ in how work items
//! pick their elements and in how many atomic adds reach the global
//! accumulator.

mod coalesced_loop;
mod global_atomic;
mod local_mem;
mod local_mem_tree;
mod parallel;
mod sequential;
mod strided_loop;

pub use coalesced_loop::CoalescedLoop;
pub use global_atomic::GlobalAtomic;
pub use local_mem::LocalMemory;
pub use local_mem_tree::LocalMemoryTree;
pub use parallel::sum_parallel;
pub use sequential::sum_sequential;
pub use strided_loop::StridedLoop;

pub(crate) use local_mem::load_partials;
#[cfg(test)]
pub(crate) use local_mem_tree::tree_reduce;

/// Wrapping sum of `input[first..first + len]`, clipped to the array.
///
/// Elements past the end of the array count as zero.
#[inline]
pub(crate) fn block_partial(input: &[u32], first: usize, len: usize) -> u32 {
    let start = first.min(input.len());
    let end = first.saturating_add(len).min(input.len());
    input[start..end]
        .iter()
        .fold(0u32, |acc, &v| acc.wrapping_add(v))
}

#[cfg(test)]
mod tests {
    use super::block_partial;

    #[test]
    fn test_block_partial_inside() {
        assert_eq!(block_partial(&[1, 2, 3, 4, 5], 1, 3), 9);
    }

    #[test]
    fn test_block_partial_clipped() {
        assert_eq!(block_partial(&[1, 2, 3], 2, 8), 3);
        assert_eq!(block_partial(&[1, 2, 3], 3, 8), 0);
        assert_eq!(block_partial(&[1, 2, 3], 100, 8), 0);
    }
}
