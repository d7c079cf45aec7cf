//! Multi-threaded baseline.

use rayon::prelude::*;

/// Data-parallel sum on the current `rayon` pool.
///
/// Each worker folds its share into a private partial sum; the partials are
/// combined only after every worker has finished. Wrapping addition makes
/// the result independent of how the work was split.
pub fn sum_parallel(input: &[u32]) -> u32 {
    input
        .par_iter()
        .fold(|| 0u32, |acc, &v| acc.wrapping_add(v))
        .reduce(|| 0u32, u32::wrapping_add)
}
