//! Static work partitioning
//!
//! Splits `n` values into `t` contiguous, non-overlapping index ranges.
//! Every range holds `n / t` values except the last, which also takes
//! the remainder.

use crate::error::SumError;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Inclusive index range assigned to one worker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partition {
    /// Worker index this range belongs to
    pub index: usize,
    /// First index (inclusive)
    pub start: usize,
    /// Last index (inclusive)
    pub end: usize,
}

impl Partition {
    /// Number of values in the range
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    pub fn range(&self) -> RangeInclusive<usize> {
        self.start..=self.end
    }
}

/// Compute `requested` partitions over `n` values
///
/// # Errors
///
/// `InvalidThreadCount` unless `1 <= requested <= n`.
pub fn partition(n: usize, requested: i64) -> Result<Vec<Partition>, SumError> {
    let invalid = SumError::InvalidThreadCount { requested, values: n };
    if requested <= 0 {
        return Err(invalid);
    }
    let threads = match usize::try_from(requested) {
        Ok(t) if t <= n => t,
        _ => return Err(invalid),
    };

    let per_thread = n / threads;
    let partitions = (0..threads)
        .map(|index| {
            let start = index * per_thread;
            let end = if index == threads - 1 {
                n - 1
            } else {
                (index + 1) * per_thread - 1
            };
            Partition { index, start, end }
        })
        .collect();

    Ok(partitions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn assert_covers(parts: &[Partition], n: usize) {
        let mut next = 0;
        for (i, p) in parts.iter().enumerate() {
            assert_eq!(p.index, i);
            assert_eq!(p.start, next, "ranges must be contiguous");
            assert!(p.end >= p.start);
            next = p.end + 1;
        }
        assert_eq!(next, n, "ranges must cover every index exactly once");
    }

    #[test]
    fn test_ten_values_three_threads() {
        let parts = partition(10, 3).unwrap();
        let ranges: Vec<_> = parts.iter().map(|p| (p.start, p.end)).collect();
        assert_eq!(ranges, vec![(0, 2), (3, 5), (6, 9)]);
        let sizes: Vec<_> = parts.iter().map(|p| p.len()).collect();
        assert_eq!(sizes, vec![3, 3, 4]);
    }

    #[test]
    fn test_single_thread() {
        let parts = partition(7, 1).unwrap();
        assert_eq!(
            parts,
            vec![Partition {
                index: 0,
                start: 0,
                end: 6,
            }]
        );
    }

    #[test]
    fn test_one_value_per_thread() {
        let parts = partition(5, 5).unwrap();
        assert!(parts.iter().all(|p| p.len() == 1));
        assert_covers(&parts, 5);
    }

    #[test]
    fn test_invalid_thread_counts() {
        for requested in [0, -1, i64::MIN, 11, i64::MAX] {
            assert!(matches!(
                partition(10, requested),
                Err(SumError::InvalidThreadCount { values: 10, .. })
            ));
        }
        // Nothing is valid for an empty input
        assert!(partition(0, 1).is_err());
    }

    #[test]
    fn test_random_partitions() {
        let mut rng = rand::thread_rng();
        for _ in 0..500 {
            let n = rng.gen_range(1..5_000);
            let t = rng.gen_range(1..=n);
            let parts = partition(n, t as i64).unwrap();

            assert_eq!(parts.len(), t);
            assert_covers(&parts, n);

            let base = n / t;
            for p in &parts[..t - 1] {
                assert_eq!(p.len(), base);
            }
            assert_eq!(parts[t - 1].len(), n - (t - 1) * base);
        }
    }
}
