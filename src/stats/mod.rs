//! Statistics collection
//!
//! Per-worker statistics returned by each worker and the aggregate view
//! built from them once the run has been joined.
//!
//! # Example
//!
//! ```
//! use parsum::stats::{RunStats, WorkerStats};
//! use std::time::Duration;
//!
//! let workers = vec![
//!     WorkerStats {
//!         worker_id: 0,
//!         start: 0,
//!         end: 4,
//!         elements: 5,
//!         local_sum: 15,
//!         elapsed: Duration::from_micros(20),
//!     },
//!     WorkerStats {
//!         worker_id: 1,
//!         start: 5,
//!         end: 9,
//!         elements: 5,
//!         local_sum: 40,
//!         elapsed: Duration::from_micros(35),
//!     },
//! ];
//!
//! let run = RunStats::from_workers(&workers, Duration::from_micros(50));
//! assert_eq!(run.merged_workers, 2);
//! assert_eq!(run.elements, 10);
//! assert_eq!(run.slowest_worker, Some(1));
//! ```

use crate::util::time::calculate_rate;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Statistics for one worker that completed its merge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerStats {
    pub worker_id: usize,
    /// First index summed (inclusive)
    pub start: usize,
    /// Last index summed (inclusive)
    pub end: usize,
    pub elements: usize,
    /// Sum of the worker's slice, as merged into the total
    pub local_sum: i64,
    /// Time spent summing and merging
    pub elapsed: Duration,
}

/// Aggregate statistics for a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunStats {
    /// Workers that merged successfully; a faulted worker returns no
    /// `WorkerStats`, so this is the length of the stats slice
    pub merged_workers: usize,
    /// Values summed across all workers
    pub elements: usize,
    /// Worker with the longest elapsed time
    pub slowest_worker: Option<usize>,
    pub slowest_elapsed: Duration,
    /// Values per second over the parallel phase
    pub values_per_sec: f64,
}

impl RunStats {
    /// Aggregate per-worker statistics over a parallel phase of `elapsed`
    pub fn from_workers(workers: &[WorkerStats], elapsed: Duration) -> Self {
        let elements: usize = workers.iter().map(|w| w.elements).sum();
        let slowest = workers.iter().max_by_key(|w| w.elapsed);

        Self {
            merged_workers: workers.len(),
            elements,
            slowest_worker: slowest.map(|w| w.worker_id),
            slowest_elapsed: slowest.map(|w| w.elapsed).unwrap_or_default(),
            values_per_sec: calculate_rate(elements as u64, elapsed),
        }
    }

    /// Ratio of slowest worker time to the whole parallel phase
    ///
    /// Close to 1.0 means the phase was bound by its slowest worker.
    pub fn imbalance(&self, elapsed: Duration) -> f64 {
        let total = elapsed.as_secs_f64();
        if total > 0.0 {
            self.slowest_elapsed.as_secs_f64() / total
        } else {
            0.0
        }
    }
}
