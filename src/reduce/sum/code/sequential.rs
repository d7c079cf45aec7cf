//! Single-threaded baseline.

/// Sum `input` front to back on the calling thread.
///
/// # Example
/// ```
/// use parallel_sum::reduce::sum::code::sum_sequential;
///
/// assert_eq!(sum_sequential(&[1, 2, 3]), 6);
/// assert_eq!(sum_sequential(&[u32::MAX, 1]), 0);
/// ```
pub fn sum_sequential(input: &[u32]) -> u32 {
    let mut sum = 0u32;
    for &v in input {
        sum = sum.wrapping_add(v);
    }
    sum
}
