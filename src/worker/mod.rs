//! Worker implementation
//!
//! A worker sums one contiguous slice of the input and merges the result
//! into the run's shared total. Each worker thread runs independently;
//! the only point where workers contend is the short critical section in
//! [`SharedTotal::merge`].
//!
//! # Lifecycle
//!
//! 1. **Local sum**: every element is added with an overflow check. On a
//!    fault the worker records it in the shared total and returns early;
//!    the partial sum is discarded.
//! 2. **Merge**: the local sum is added into the shared total under the
//!    lock, with the same check. A fault leaves the total untouched.
//!
//! # Example
//!
//! ```
//! use parsum::partition::Partition;
//! use parsum::worker::{SharedTotal, Worker};
//!
//! let values = [1, 2, 3, 4];
//! let total = SharedTotal::new();
//! let partition = Partition {
//!     index: 0,
//!     start: 0,
//!     end: 3,
//! };
//!
//! let worker = Worker::new(partition, &values[partition.range()], &total);
//! let stats = worker.run()?;
//!
//! assert_eq!(stats.local_sum, 10);
//! assert_eq!(total.snapshot().sum, 10);
//! # Ok::<(), parsum::error::ArithmeticFault>(())
//! ```

use crate::error::{ArithmeticFault, FaultKind, FaultStage};
use crate::partition::Partition;
use crate::stats::WorkerStats;
use std::sync::{Mutex, MutexGuard};
use std::time::Instant;
use tracing::debug;

/// Result of running one worker
pub type WorkerOutcome = Result<WorkerStats, ArithmeticFault>;

/// Add `addend` to `current`, refusing to leave the `i64` range
///
/// Operands of opposite sign (or zero) can never leave the range. When
/// both are positive the sum overflows if `current > i64::MAX - addend`;
/// when both are negative it underflows if `current < i64::MIN - addend`.
#[inline]
pub fn checked_accumulate(current: i64, addend: i64) -> Result<i64, FaultKind> {
    if current > 0 && addend > 0 && current > i64::MAX - addend {
        Err(FaultKind::Overflow)
    } else if current < 0 && addend < 0 && current < i64::MIN - addend {
        Err(FaultKind::Underflow)
    } else {
        Ok(current + addend)
    }
}

/// Sum a slice with [`checked_accumulate`], stopping at the first fault
pub fn local_sum(values: &[i64]) -> Result<i64, FaultKind> {
    values
        .iter()
        .try_fold(0i64, |acc, &value| checked_accumulate(acc, value))
}

/// Shared total as seen under the lock
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TotalState {
    /// Sum of every local sum merged so far
    pub sum: i64,
    /// First fault reported by any worker; never cleared
    pub fault: Option<ArithmeticFault>,
}

/// Accumulator shared by all workers of a run
///
/// Holds the running total and the error flag behind a single mutex.
/// The lock is taken only for the read-check-write of a merge or to
/// record a fault, never across a worker's summation loop.
#[derive(Debug, Default)]
pub struct SharedTotal {
    state: Mutex<TotalState>,
}

impl SharedTotal {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, TotalState> {
        // The critical sections cannot panic part-way, so a poisoned
        // state is still consistent.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Merge a worker's local sum into the total
    ///
    /// On overflow or underflow the fault is recorded and the total is
    /// left unchanged.
    pub fn merge(&self, worker: usize, local_sum: i64) -> Result<(), ArithmeticFault> {
        let mut state = self.lock();
        match checked_accumulate(state.sum, local_sum) {
            Ok(sum) => {
                state.sum = sum;
                Ok(())
            }
            Err(kind) => {
                let fault = ArithmeticFault {
                    worker,
                    kind,
                    stage: FaultStage::Merge,
                };
                state.fault.get_or_insert(fault);
                Err(fault)
            }
        }
    }

    /// Raise the error flag; only the first fault of a run is kept
    pub fn record_fault(&self, fault: ArithmeticFault) {
        self.lock().fault.get_or_insert(fault);
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> TotalState {
        *self.lock()
    }

    /// Consume the total once every worker has been joined
    pub fn into_state(self) -> TotalState {
        self.state.into_inner().unwrap_or_else(|e| e.into_inner())
    }
}

/// One parallel summation unit
///
/// Borrows its slice of the input and the run's shared total; it owns
/// nothing and writes to shared state at most twice (one merge, or one
/// fault).
#[derive(Debug)]
pub struct Worker<'a> {
    partition: Partition,
    values: &'a [i64],
    total: &'a SharedTotal,
}

impl<'a> Worker<'a> {
    /// Create a worker over `values`, which must be the slice `partition` describes
    pub fn new(partition: Partition, values: &'a [i64], total: &'a SharedTotal) -> Self {
        debug_assert_eq!(values.len(), partition.len());
        Self {
            partition,
            values,
            total,
        }
    }

    pub fn id(&self) -> usize {
        self.partition.index
    }

    /// Sum the slice and merge it into the shared total
    pub fn run(&self) -> WorkerOutcome {
        let started = Instant::now();
        let id = self.id();

        let sum = match local_sum(self.values) {
            Ok(sum) => sum,
            Err(kind) => {
                let fault = ArithmeticFault {
                    worker: id,
                    kind,
                    stage: FaultStage::LocalSum,
                };
                debug!("{}", fault);
                self.total.record_fault(fault);
                return Err(fault);
            }
        };

        if let Err(fault) = self.total.merge(id, sum) {
            debug!("{}", fault);
            return Err(fault);
        }

        let elapsed = started.elapsed();
        debug!(
            "worker {} summed [{}, {}] = {} in {:?}",
            id, self.partition.start, self.partition.end, sum, elapsed
        );

        Ok(WorkerStats {
            worker_id: id,
            start: self.partition.start,
            end: self.partition.end,
            elements: self.values.len(),
            local_sum: sum,
            elapsed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn whole(values: &[i64]) -> Partition {
        Partition {
            index: 0,
            start: 0,
            end: values.len() - 1,
        }
    }

    #[test]
    fn test_checked_accumulate_in_range() {
        assert_eq!(checked_accumulate(1, 2), Ok(3));
        assert_eq!(checked_accumulate(i64::MAX, 0), Ok(i64::MAX));
        assert_eq!(checked_accumulate(i64::MAX - 1, 1), Ok(i64::MAX));
        assert_eq!(checked_accumulate(i64::MIN + 1, -1), Ok(i64::MIN));
        assert_eq!(checked_accumulate(i64::MAX, i64::MIN), Ok(-1));
        assert_eq!(checked_accumulate(i64::MIN, i64::MAX), Ok(-1));
    }

    #[test]
    fn test_checked_accumulate_faults() {
        assert_eq!(checked_accumulate(i64::MAX, 1), Err(FaultKind::Overflow));
        assert_eq!(checked_accumulate(1, i64::MAX), Err(FaultKind::Overflow));
        assert_eq!(checked_accumulate(i64::MAX, i64::MAX), Err(FaultKind::Overflow));
        assert_eq!(checked_accumulate(i64::MIN, -1), Err(FaultKind::Underflow));
        assert_eq!(checked_accumulate(-1, i64::MIN), Err(FaultKind::Underflow));
        assert_eq!(checked_accumulate(i64::MIN, i64::MIN), Err(FaultKind::Underflow));
    }

    #[test]
    fn test_checked_accumulate_matches_checked_add() {
        let samples = [i64::MIN, i64::MIN + 1, -7, -1, 0, 1, 7, i64::MAX - 1, i64::MAX];
        for &a in &samples {
            for &b in &samples {
                assert_eq!(checked_accumulate(a, b).ok(), a.checked_add(b), "{} + {}", a, b);
            }
        }
    }

    #[test]
    fn test_worker_merges_local_sum() {
        let values = [5, -3, 10, 8];
        let total = SharedTotal::new();
        total.merge(9, 100).unwrap();

        let stats = Worker::new(whole(&values), &values, &total).run().unwrap();
        assert_eq!(stats.local_sum, 20);
        assert_eq!(stats.elements, 4);
        assert_eq!(
            total.snapshot(),
            TotalState {
                sum: 120,
                fault: None,
            }
        );
    }

    #[test]
    fn test_local_overflow_discards_partial_sum() {
        let values = [10, i64::MAX, i64::MAX];
        let total = SharedTotal::new();

        let fault = Worker::new(whole(&values), &values, &total).run().unwrap_err();
        assert_eq!(fault.kind, FaultKind::Overflow);
        assert_eq!(fault.stage, FaultStage::LocalSum);

        let state = total.snapshot();
        assert_eq!(state.sum, 0, "nothing may be merged after a local fault");
        assert_eq!(state.fault, Some(fault));
    }

    #[test]
    fn test_local_underflow() {
        let values = [i64::MIN, -1];
        let total = SharedTotal::new();

        let fault = Worker::new(whole(&values), &values, &total).run().unwrap_err();
        assert_eq!(fault.kind, FaultKind::Underflow);
        assert_eq!(fault.stage, FaultStage::LocalSum);
    }

    #[test]
    fn test_merge_overflow_leaves_total_unchanged() {
        let total = SharedTotal::new();
        total.merge(0, i64::MAX).unwrap();

        let values = [1];
        let partition = Partition {
            index: 1,
            start: 1,
            end: 1,
        };
        let fault = Worker::new(partition, &values, &total).run().unwrap_err();

        assert_eq!(
            fault,
            ArithmeticFault {
                worker: 1,
                kind: FaultKind::Overflow,
                stage: FaultStage::Merge,
            }
        );
        let state = total.into_state();
        assert_eq!(state.sum, i64::MAX);
        assert_eq!(state.fault, Some(fault));
    }

    #[test]
    fn test_merge_underflow() {
        let total = SharedTotal::new();
        total.merge(0, i64::MIN + 5).unwrap();
        let fault = total.merge(1, -6).unwrap_err();
        assert_eq!(fault.kind, FaultKind::Underflow);
        assert_eq!(total.snapshot().sum, i64::MIN + 5);
    }

    #[test]
    fn test_first_fault_wins() {
        let total = SharedTotal::new();
        let first = ArithmeticFault {
            worker: 2,
            kind: FaultKind::Overflow,
            stage: FaultStage::LocalSum,
        };
        let second = ArithmeticFault {
            worker: 0,
            kind: FaultKind::Underflow,
            stage: FaultStage::Merge,
        };

        total.record_fault(first);
        total.record_fault(second);
        assert_eq!(total.snapshot().fault, Some(first));

        // A later successful merge does not clear the flag
        total.merge(1, 42).unwrap();
        assert_eq!(total.snapshot().fault, Some(first));
    }
}
