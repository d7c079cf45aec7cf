//! Correctness checks for every sum strategy.

use super::{reduce, KernelParams, Strategy};
use crate::device::ComputeBackend;
use crate::error::{ReduceError, Result};
use crate::input::{max_safe_bound, InputArray};

/// Sizes that hit the empty, single-element and partial-group paths.
const VERIFY_SIZES: [usize; 9] = [0, 1, 2, 15, 127, 128, 129, 1023, 4113];

/// Every strategy under a spread of shapes, including non-dividing ones.
pub fn verification_lineup() -> Result<Vec<Strategy>> {
    let defaults = KernelParams::default();
    let mut lineup = vec![Strategy::CpuSequential, Strategy::CpuParallel];

    for wg in [1, 4, defaults.work_group_size] {
        lineup.push(Strategy::global_atomic(wg)?);
    }
    for (wg, v) in [(4, 3), (16, 1), (defaults.work_group_size, defaults.values_per_work_item)] {
        lineup.push(Strategy::strided_loop(wg, v)?);
        lineup.push(Strategy::coalesced_loop(wg, v)?);
    }
    for (wg, v, local) in [(1, 0, 1), (4, 0, 4), (16, 8, 16), (128, 0, 128), (8, 5, 32)] {
        lineup.push(Strategy::local_memory(wg, v, local)?);
        lineup.push(Strategy::local_memory_tree(wg, v, local)?);
    }
    lineup.push(Strategy::local_memory(3, 0, 5)?);

    Ok(lineup)
}

/// Run the whole lineup over [`VERIFY_SIZES`] and report the first wrong sum.
pub fn verify_all(backend: &dyn ComputeBackend) -> Result<()> {
    let lineup = verification_lineup()?;

    for &n in &VERIFY_SIZES {
        let input = InputArray::generate(0x5eed ^ n as u64, n, max_safe_bound(n))?;
        for strategy in &lineup {
            let actual = reduce(strategy, input.values(), backend);
            if actual != input.reference_sum() {
                return Err(ReduceError::Mismatch {
                    strategy: format!("{strategy} @ n={n}"),
                    expected: input.reference_sum(),
                    actual,
                    iteration: 1,
                    iterations: 1,
                });
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{CpuDevice, GlobalAccumulator, KernelArgs, WorkGroup, WorkItem};
    use crate::input::reference_sum;
    use crate::reduce::sum::code::{load_partials, tree_reduce, CoalescedLoop, StridedLoop};
    use crate::reduce::sum::Strategy;
    use proptest::prelude::*;
    use std::sync::OnceLock;

    fn device() -> &'static CpuDevice {
        static DEVICE: OnceLock<CpuDevice> = OnceLock::new();
        DEVICE.get_or_init(|| CpuDevice::new(Some(4)).expect("thread pool"))
    }

    #[test]
    fn test_all_strategies_verify() {
        verify_all(device()).expect("All strategies should produce the reference sum");
    }

    #[test]
    fn test_global_atomic_seed_42() {
        let input = InputArray::generate(42, 10, 400).unwrap();
        let expected: u32 = input.values().iter().sum();
        assert_eq!(input.reference_sum(), expected);

        let strategy = Strategy::global_atomic(4).unwrap();
        assert_eq!(reduce(&strategy, input.values(), device()), expected);
    }

    #[test]
    fn test_tree_depth_and_group_subtotal() {
        let input = InputArray::generate(42, 128, max_safe_bound(128)).unwrap();
        let strategy = Strategy::local_memory_tree(16, 8, 16).unwrap();

        let work_size = strategy.work_size(input.len()).unwrap();
        assert_eq!(work_size.global_size(), 16);
        assert_eq!(work_size.num_groups(), 1);

        let acc = GlobalAccumulator::new();
        let args = KernelArgs::new(input.values(), &acc);
        let mut local = [0u32; 16];
        let mut group = WorkGroup::new(0, work_size, &mut local);

        load_partials(&mut group, &args, 8);
        let slots = group.local_mem().to_vec();
        for (k, &slot) in slots.iter().enumerate() {
            assert_eq!(slot, reference_sum(&input.values()[k * 8..(k + 1) * 8]));
        }
        group.barrier();

        tree_reduce(&mut group);
        assert_eq!(group.barriers_crossed(), 1 + 4);
        assert_eq!(group.local_mem()[0], reference_sum(&slots));
        assert_eq!(group.local_mem()[0], input.reference_sum());

        assert_eq!(reduce(&strategy, input.values(), device()), input.reference_sum());
    }

    #[test]
    fn test_empty_input_launches_nothing() {
        for strategy in verification_lineup().unwrap() {
            if let Some(ws) = strategy.work_size(0) {
                assert_eq!(ws.num_groups(), 0, "{strategy}");
            }
            assert_eq!(reduce(&strategy, &[], device()), 0, "{strategy}");
        }
    }

    #[test]
    fn test_single_element() {
        for strategy in verification_lineup().unwrap() {
            assert_eq!(reduce(&strategy, &[17], device()), 17, "{strategy}");
        }
    }

    #[test]
    fn test_partial_last_chunk_is_zero_padded() {
        // 1000 = 8 full groups of 4 x 30, plus a 40-element tail
        let input = InputArray::generate(9, 1000, max_safe_bound(1000)).unwrap();
        let lineup = [
            Strategy::strided_loop(4, 30).unwrap(),
            Strategy::coalesced_loop(4, 30).unwrap(),
            Strategy::local_memory(4, 30, 4).unwrap(),
            Strategy::local_memory_tree(4, 30, 4).unwrap(),
        ];
        for strategy in lineup {
            let ws = strategy.work_size(input.len()).unwrap();
            assert_eq!(ws.global_size(), 36, "{strategy}");
            assert_eq!(
                reduce(&strategy, input.values(), device()),
                input.reference_sum(),
                "{strategy}"
            );
        }
    }

    #[test]
    fn test_odd_sizes_match_reference() {
        for n in [65_537, 1_000_003] {
            let input = InputArray::generate(n as u64, n, max_safe_bound(n)).unwrap();
            let lineup = [
                Strategy::strided_loop(128, 128).unwrap(),
                Strategy::strided_loop(64, 7).unwrap(),
                Strategy::coalesced_loop(128, 128).unwrap(),
                Strategy::coalesced_loop(96, 13).unwrap(),
                Strategy::local_memory(96, 0, 96).unwrap(),
                Strategy::local_memory(128, 9, 256).unwrap(),
                Strategy::local_memory_tree(256, 0, 256).unwrap(),
                Strategy::local_memory_tree(32, 11, 32).unwrap(),
            ];
            for strategy in lineup {
                assert_eq!(
                    reduce(&strategy, input.values(), device()),
                    input.reference_sum(),
                    "{strategy} @ n={n}"
                );
            }
        }
    }

    #[test]
    fn test_idempotent_with_reset() {
        let input = InputArray::generate(3, 5000, max_safe_bound(5000)).unwrap();
        let acc = GlobalAccumulator::new();
        for strategy in verification_lineup().unwrap() {
            acc.reset();
            let first = strategy.execute(input.values(), device(), &acc);
            acc.reset();
            let second = strategy.execute(input.values(), device(), &acc);
            assert_eq!(first, second, "{strategy}");
        }
    }

    #[test]
    fn test_missing_reset_accumulates() {
        let input = InputArray::from_values(vec![1, 2, 3]);
        let strategy = Strategy::global_atomic(2).unwrap();
        let acc = GlobalAccumulator::new();
        assert_eq!(strategy.execute(input.values(), device(), &acc), 6);
        assert_eq!(strategy.execute(input.values(), device(), &acc), 12);
    }

    #[test]
    fn test_all_strategies_wrap_identically() {
        let values = vec![u32::MAX, 1, 5, u32::MAX, 7];
        let expected = reference_sum(&values);
        for strategy in verification_lineup().unwrap() {
            assert_eq!(reduce(&strategy, &values, device()), expected, "{strategy}");
        }
    }

    fn item(global_id: usize, global_size: usize) -> WorkItem {
        WorkItem {
            global_id,
            local_id: global_id,
            group_id: 0,
            local_size: global_size,
            global_size,
        }
    }

    #[test]
    fn test_strided_access_pattern() {
        // two items, two values each: item 0 reads 0 and 2, item 1 reads 1 and 3
        let input = [1u32, 2, 4, 8];
        let kernel = StridedLoop {
            values_per_work_item: 2,
        };
        assert_eq!(kernel.item_partial(&input, item(0, 2)), 1 + 4);
        assert_eq!(kernel.item_partial(&input, item(1, 2)), 2 + 8);
    }

    #[test]
    fn test_coalesced_access_pattern() {
        // two items, two values each: item 0 reads 0 and 1, item 1 reads 2 and 3
        let input = [1u32, 2, 4, 8];
        let kernel = CoalescedLoop {
            values_per_work_item: 2,
        };
        assert_eq!(kernel.item_partial(&input, item(0, 2)), 1 + 2);
        assert_eq!(kernel.item_partial(&input, item(1, 2)), 4 + 8);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_any_grouping_matches_reference(
            values in prop::collection::vec(any::<u32>(), 0..2000),
            chunk in 1usize..300,
        ) {
            let grouped = values
                .chunks(chunk)
                .map(reference_sum)
                .rev()
                .fold(0u32, u32::wrapping_add);
            prop_assert_eq!(grouped, reference_sum(&values));
        }

        #[test]
        fn prop_every_strategy_matches_reference(
            seed in any::<u64>(),
            n in 0usize..3000,
            wg_log2 in 0u32..8,
            values_per_item in 1usize..40,
        ) {
            let input = InputArray::generate(seed, n, max_safe_bound(n)).unwrap();
            let wg = 1usize << wg_log2;
            let lineup = [
                Strategy::CpuSequential,
                Strategy::CpuParallel,
                Strategy::global_atomic(wg).unwrap(),
                Strategy::strided_loop(wg, values_per_item).unwrap(),
                Strategy::coalesced_loop(wg, values_per_item).unwrap(),
                Strategy::local_memory(wg, 0, wg).unwrap(),
                Strategy::local_memory_tree(wg, 0, wg).unwrap(),
                Strategy::local_memory_tree(wg, values_per_item, wg).unwrap(),
            ];
            for strategy in lineup {
                prop_assert_eq!(
                    reduce(&strategy, input.values(), device()),
                    input.reference_sum(),
                    "{}", strategy
                );
            }
        }
    }
}
