//! Strategy registry: the lineup a benchmark run works through.
//!
//! Strategies are looked up by name so the CLI can run a subset without
//! knowing how each one is parameterised.

use crate::error::Result;
use crate::reduce::sum::strategy::ALL_NAMES;
use crate::reduce::sum::{KernelParams, Strategy};

/// Ordered collection of runnable strategies.
pub struct StrategyRegistry {
    strategies: Vec<Strategy>,
}

impl StrategyRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            strategies: Vec::new(),
        }
    }

    /// Register a strategy; order of registration is the run order.
    pub fn register(&mut self, strategy: Strategy) {
        self.strategies.push(strategy);
    }

    pub fn all(&self) -> &[Strategy] {
        &self.strategies
    }

    /// Find strategy by name
    pub fn find(&self, name: &str) -> Option<&Strategy> {
        self.strategies.iter().find(|s| s.name() == name)
    }

    pub fn list_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Strategies of one category (`"cpu"` or `"gpu"`).
    pub fn by_category(&self, category: &str) -> Vec<&Strategy> {
        self.strategies
            .iter()
            .filter(|s| s.category() == category)
            .collect()
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the default lineup: both host baselines, then the five kernels.
pub fn build_registry(params: &KernelParams) -> Result<StrategyRegistry> {
    let mut registry = StrategyRegistry::new();
    for name in ALL_NAMES {
        registry.register(Strategy::from_name(name, params)?);
    }
    Ok(registry)
}

/// Build only the strategies called `names`, in that order; an empty list
/// selects the whole lineup.
///
/// Strategies that were not requested are never constructed, so tuning that
/// only one kernel rejects does not block the others.
pub fn build_selection(params: &KernelParams, names: &[String]) -> Result<StrategyRegistry> {
    if names.is_empty() {
        return build_registry(params);
    }
    let mut registry = StrategyRegistry::new();
    for name in names {
        registry.register(Strategy::from_name(name, params)?);
    }
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::CpuDevice;
    use crate::error::ReduceError;
    use crate::input::{max_safe_bound, InputArray};
    use crate::reduce::sum::reduce;

    #[test]
    fn test_default_lineup_order() {
        let registry = build_registry(&KernelParams::default()).unwrap();
        assert_eq!(registry.list_names(), ALL_NAMES.to_vec());
        assert_eq!(registry.by_category("cpu").len(), 2);
        assert_eq!(registry.by_category("gpu").len(), 5);
    }

    #[test]
    fn test_default_tuning() {
        let registry = build_registry(&KernelParams::default()).unwrap();
        let strided = registry.find("strided-loop").unwrap().descriptor();
        assert_eq!(strided.work_group_size, 128);
        assert_eq!(strided.values_per_work_item, 128);
        let tree = registry.find("local-memory-tree").unwrap().descriptor();
        assert_eq!(tree.values_per_work_item, 0);
        assert_eq!(tree.local_buffer_size, 128);
    }

    fn names(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_selection_keeps_requested_order() {
        let picked = build_selection(&KernelParams::default(), &names(&["local-memory", "cpu"]))
            .unwrap();
        assert_eq!(picked.list_names(), vec!["local-memory", "cpu"]);
        assert_eq!(picked.all()[1], Strategy::CpuSequential);
    }

    #[test]
    fn test_empty_selection_is_full_lineup() {
        let picked = build_selection(&KernelParams::default(), &[]).unwrap();
        assert_eq!(picked.list_names(), ALL_NAMES.to_vec());
    }

    #[test]
    fn test_selection_unknown() {
        assert!(matches!(
            build_selection(&KernelParams::default(), &names(&["nope"])),
            Err(ReduceError::UnknownStrategy(_))
        ));
    }

    #[test]
    fn test_selection_skips_kernels_that_reject_tuning() {
        let params = KernelParams {
            work_group_size: 96,
            local_buffer_size: 96,
            ..KernelParams::default()
        };
        let picked = build_selection(&params, &names(&["local-memory"])).unwrap();
        let strategy = picked.all()[0];
        assert_eq!(strategy.descriptor().work_group_size, 96);

        let input = InputArray::generate(5, 1000, max_safe_bound(1000)).unwrap();
        let device = CpuDevice::new(Some(2)).unwrap();
        assert_eq!(
            reduce(&strategy, input.values(), &device),
            input.reference_sum()
        );

        // asking for the tree with the same tuning still fails
        assert!(build_selection(&params, &names(&["local-memory-tree"])).is_err());
    }

    #[test]
    fn test_selection_rejects_oversized_group() {
        let params = KernelParams {
            work_group_size: 1_000_000_000,
            local_buffer_size: 1_000_000_000,
            ..KernelParams::default()
        };
        assert!(build_selection(&params, &names(&["global-atomic"])).is_err());
        assert!(build_selection(&params, &names(&["cpu"])).is_ok());
    }

    #[test]
    fn test_invalid_params_fail_build() {
        let params = KernelParams {
            work_group_size: 96,
            local_buffer_size: 96,
            ..KernelParams::default()
        };
        assert!(build_registry(&params).is_err());
    }
}
