//! Coordinator module
//!
//! Orchestrates a run: validates the thread count through the
//! partitioner, launches one worker thread per partition, joins every
//! launched worker and only then inspects the shared error flag.
//!
//! Workers run as scoped threads, so the input slice and the shared
//! total are plain borrows and every launched worker is joined before
//! the scope returns, including when a later launch fails.

use crate::config::Config;
use crate::error::SumError;
use crate::input;
use crate::partition::{partition, Partition};
use crate::stats::{RunStats, WorkerStats};
use crate::util::verification;
use crate::worker::{SharedTotal, Worker, WorkerOutcome};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Phases of a single run
///
/// Every failure goes straight to `Reporting` once any running workers
/// have been joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Validating,
    Partitioning,
    Spawning,
    Running,
    Joining,
    Reporting,
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunPhase::Validating => "validating",
            RunPhase::Partitioning => "partitioning",
            RunPhase::Spawning => "spawning",
            RunPhase::Running => "running",
            RunPhase::Joining => "joining",
            RunPhase::Reporting => "reporting",
        };
        write!(f, "{}", name)
    }
}

/// Successful result of a run
#[derive(Debug, Clone, Serialize)]
pub struct SumReport {
    /// Sum of every input value
    pub total: i64,
    /// Number of values read
    pub values: usize,
    /// Number of worker threads used
    pub threads: usize,
    /// Wall-clock time of the parallel phase (spawn to last join)
    pub elapsed: Duration,
    /// Per-worker statistics, ordered by worker id
    pub workers: Vec<WorkerStats>,
    /// True if the total was cross-checked against the reference sum
    pub verified: bool,
}

impl SumReport {
    pub fn run_stats(&self) -> RunStats {
        RunStats::from_workers(&self.workers, self.elapsed)
    }
}

/// Joined worker: (worker id, thread result)
type Joined = (usize, std::thread::Result<WorkerOutcome>);

/// Launch error (if the spawn loop stopped early) and every join result
type Launched = (Option<SumError>, Vec<Joined>);

/// Run coordinator
pub struct Coordinator {
    config: Arc<Config>,
    /// Fail the launch at this position in the spawn loop
    #[cfg(test)]
    fail_launch_at: Option<usize>,
}

impl Coordinator {
    pub fn new(config: Arc<Config>) -> Self {
        Self {
            config,
            #[cfg(test)]
            fail_launch_at: None,
        }
    }

    /// Read the configured input file and sum it
    pub fn run(&self) -> Result<SumReport, SumError> {
        let input = &self.config.input;
        let values = input::read_values(&input.path, input.max_values)?;
        info!("Read {} values from {}", values.len(), input.path.display());

        self.sum(&values)
    }

    /// Sum `values` with the configured number of workers
    pub fn sum(&self, values: &[i64]) -> Result<SumReport, SumError> {
        self.execute(values, None)
    }

    /// Sum `values`, launching workers in `launch_order` (a permutation
    /// of worker ids) instead of ascending id order
    fn execute(
        &self,
        values: &[i64],
        launch_order: Option<&[usize]>,
    ) -> Result<SumReport, SumError> {
        enter(RunPhase::Validating);
        let requested = self.config.workers.threads;
        enter(RunPhase::Partitioning);
        let partitions = partition(values.len(), requested)?;
        debug!(
            "{} values split into {} partitions of {}+ values",
            values.len(),
            partitions.len(),
            values.len() / partitions.len()
        );

        let order: Vec<usize> = match launch_order {
            Some(order) => {
                debug_assert_eq!(order.len(), partitions.len());
                order.to_vec()
            }
            None => (0..partitions.len()).collect(),
        };

        let total = SharedTotal::new();
        let timer = Instant::now();
        let (launch_error, joined) = self.launch_and_join(values, &partitions, &order, &total)?;
        let elapsed = timer.elapsed();

        enter(RunPhase::Reporting);
        if let Some(err) = launch_error {
            return Err(err);
        }

        let mut workers = Vec::with_capacity(joined.len());
        let mut panicked = None;
        for (id, result) in joined {
            match result {
                Ok(Ok(stats)) => workers.push(stats),
                // Already recorded in the shared total
                Ok(Err(_fault)) => {}
                Err(_) => {
                    panicked.get_or_insert(id);
                }
            }
        }
        if let Some(worker) = panicked {
            return Err(SumError::WorkerPanicked { worker });
        }

        let state = total.into_state();
        if let Some(fault) = state.fault {
            if self.config.runtime.verify {
                if let Some(exact) = verification::reference_sum(values) {
                    warn!(
                        "exact sum {} fits in 64 bits; the {} depends on merge order",
                        exact, fault.kind
                    );
                }
            }
            return Err(fault.into());
        }

        let verified = if self.config.runtime.verify {
            let expected = verification::exact_sum(values);
            if expected != state.sum as i128 {
                return Err(SumError::VerificationMismatch {
                    reported: state.sum,
                    expected,
                });
            }
            true
        } else {
            false
        };

        workers.sort_by_key(|w| w.worker_id);
        Ok(SumReport {
            total: state.sum,
            values: values.len(),
            threads: partitions.len(),
            elapsed,
            workers,
            verified,
        })
    }

    /// Launch one worker per partition and join all that were launched
    ///
    /// Returns the launch error (if the spawn loop stopped early) together
    /// with the join results of every worker that did start.
    fn launch_and_join(
        &self,
        values: &[i64],
        partitions: &[Partition],
        order: &[usize],
        total: &SharedTotal,
    ) -> Result<Launched, SumError> {
        let prefix = &self.config.workers.thread_name_prefix;

        let scoped = crossbeam::thread::scope(|s| -> Result<Launched, SumError> {
            let mut handles = Vec::new();
            handles
                .try_reserve_exact(partitions.len())
                .map_err(|_| SumError::ResourceExhaustion {
                    what: "worker handles",
                })?;

            enter(RunPhase::Spawning);
            let mut launch_error = None;
            for (position, &index) in order.iter().enumerate() {
                let part = partitions[index];
                let worker = Worker::new(part, &values[part.range()], total);

                let spawned = match self.injected_launch_failure(position) {
                    Some(err) => Err(err),
                    None => s
                        .builder()
                        .name(format!("{}-{}", prefix, part.index))
                        .spawn(move |_| worker.run()),
                };
                match spawned {
                    Ok(handle) => handles.push((part.index, handle)),
                    Err(source) => {
                        debug!(
                            "launch of worker {} (position {}) failed: {}",
                            part.index, position, source
                        );
                        launch_error = Some(SumError::ThreadLaunchFailure {
                            worker: part.index,
                            source,
                        });
                        break;
                    }
                }
            }

            if launch_error.is_none() {
                enter(RunPhase::Running);
            }
            enter(RunPhase::Joining);
            let joined: Vec<Joined> = handles
                .into_iter()
                .map(|(id, handle)| (id, handle.join()))
                .collect();

            Ok((launch_error, joined))
        });

        // Every handle is joined inside the scope, so the scope itself can
        // only report a panic if that invariant is broken.
        scoped.unwrap_or_else(|panic| std::panic::resume_unwind(panic))
    }

    #[cfg(test)]
    fn injected_launch_failure(&self, position: usize) -> Option<std::io::Error> {
        (self.fail_launch_at == Some(position))
            .then(|| std::io::Error::new(std::io::ErrorKind::Other, "launch refused"))
    }

    #[cfg(not(test))]
    #[inline]
    fn injected_launch_failure(&self, _position: usize) -> Option<std::io::Error> {
        None
    }
}

fn enter(phase: RunPhase) {
    debug!("phase: {}", phase);
}
