//! Result verification
//!
//! Computes the exact sum of the input independently of the worker pool
//! so a reported total can be cross-checked. Partial sums are widened to
//! `i128`, which cannot overflow for any input that fits in memory.

use rayon::prelude::*;

/// Exact sum of `values` in 128-bit arithmetic
pub fn exact_sum(values: &[i64]) -> i128 {
    values.par_iter().map(|&v| v as i128).sum()
}

/// Exact sum narrowed to `i64`, or `None` if it does not fit
///
/// # Examples
///
/// ```
/// use parsum::util::verification::reference_sum;
///
/// assert_eq!(reference_sum(&[1, 2, 3]), Some(6));
/// assert_eq!(reference_sum(&[i64::MAX, 1]), None);
/// assert_eq!(reference_sum(&[i64::MAX, 1, -1]), Some(i64::MAX));
/// ```
pub fn reference_sum(values: &[i64]) -> Option<i64> {
    i64::try_from(exact_sum(values)).ok()
}
