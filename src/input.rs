//! Input synthesis: a deterministic array of bounded `u32` values and its
//! reference sum.

use crate::error::{ReduceError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Largest element value for which `n` elements cannot overflow a `u32` sum.
///
/// For `n == 0` every value is safe.
pub fn max_safe_bound(n: usize) -> u32 {
    if n == 0 {
        return u32::MAX;
    }
    u32::try_from(u32::MAX as usize / n).unwrap_or(0)
}

/// Plain sequential wrapping sum, used as the oracle for every strategy.
pub fn reference_sum(values: &[u32]) -> u32 {
    let mut sum = 0u32;
    for &v in values {
        sum = sum.wrapping_add(v);
    }
    sum
}

/// Generate `n` values in `0..=upper_bound` from `seed`.
///
/// Fails if `upper_bound` exceeds [`max_safe_bound`] for `n`.
pub fn generate(seed: u64, n: usize, upper_bound: u32) -> Result<Vec<u32>> {
    let max = max_safe_bound(n);
    if upper_bound > max {
        return Err(ReduceError::UnsafeBound {
            upper_bound,
            size: n,
            max,
        });
    }

    let mut rng = StdRng::seed_from_u64(seed);
    Ok((0..n).map(|_| rng.random_range(0..=upper_bound)).collect())
}

/// The array every strategy sums, together with its reference sum.
///
/// Immutable once built; the harness shares it read-only across all
/// strategies and iterations.
#[derive(Debug, Clone)]
pub struct InputArray {
    values: Vec<u32>,
    reference_sum: u32,
    seed: Option<u64>,
    upper_bound: u32,
}

impl InputArray {
    /// Generate a fresh array. See [`generate`].
    pub fn generate(seed: u64, n: usize, upper_bound: u32) -> Result<Self> {
        let values = generate(seed, n, upper_bound)?;
        Ok(Self {
            seed: Some(seed),
            upper_bound,
            ..Self::from_values(values)
        })
    }

    /// Wrap existing values, computing the reference sum sequentially.
    ///
    /// The recorded upper bound is the largest value present.
    pub fn from_values(values: Vec<u32>) -> Self {
        let reference_sum = reference_sum(&values);
        let upper_bound = values.iter().copied().max().unwrap_or(0);
        Self {
            values,
            reference_sum,
            seed: None,
            upper_bound,
        }
    }

    pub fn values(&self) -> &[u32] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn reference_sum(&self) -> u32 {
        self.reference_sum
    }

    /// Generator seed, `None` for arrays built from explicit values.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn upper_bound(&self) -> u32 {
        self.upper_bound
    }
}
