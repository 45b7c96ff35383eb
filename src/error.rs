//! Error types
//!
//! `SumError` covers every way a run can fail. Errors detected inside a
//! worker are carried as `ArithmeticFault` values and only become a
//! `SumError` once the coordinator has joined every worker.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Direction of an arithmetic fault
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FaultKind {
    /// Both operands positive, sum would exceed `i64::MAX`
    Overflow,
    /// Both operands negative, sum would fall below `i64::MIN`
    Underflow,
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FaultKind::Overflow => write!(f, "overflow"),
            FaultKind::Underflow => write!(f, "underflow"),
        }
    }
}

/// Where in a worker the fault was detected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultStage {
    /// While summing the worker's own slice
    LocalSum,
    /// While merging the local sum into the shared total
    Merge,
}

impl fmt::Display for FaultStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FaultStage::LocalSum => write!(f, "thread summation"),
            FaultStage::Merge => write!(f, "total summation"),
        }
    }
}

/// Arithmetic fault raised by a single worker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArithmeticFault {
    pub worker: usize,
    pub kind: FaultKind,
    pub stage: FaultStage,
}

impl fmt::Display for ArithmeticFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} detected in {} (worker {})", self.kind, self.stage, self.worker)
    }
}

/// Errors that can end a summation run
#[derive(Error, Debug)]
pub enum SumError {
    #[error("input file {} is unavailable", path.display())]
    InputUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("input file {}: token {position} ({token:?}) is not a 64-bit integer", path.display())]
    InputParse {
        path: PathBuf,
        position: usize,
        token: String,
    },

    #[error("input reached the limit of {limit} values (likely truncated)")]
    InputTooLarge { limit: usize },

    #[error(
        "invalid thread count {requested} for {values} values (must be between 1 and {values})"
    )]
    InvalidThreadCount { requested: i64, values: usize },

    #[error("failed to allocate {what}")]
    ResourceExhaustion { what: &'static str },

    #[error("failed to launch worker {worker}")]
    ThreadLaunchFailure {
        worker: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("overflow detected in {stage} (worker {worker})")]
    ArithmeticOverflow { worker: usize, stage: FaultStage },

    #[error("underflow detected in {stage} (worker {worker})")]
    ArithmeticUnderflow { worker: usize, stage: FaultStage },

    #[error("worker {worker} panicked")]
    WorkerPanicked { worker: usize },

    #[error("reported sum {reported} disagrees with reference sum {expected}")]
    VerificationMismatch { reported: i64, expected: i128 },
}

impl From<ArithmeticFault> for SumError {
    fn from(fault: ArithmeticFault) -> Self {
        match fault.kind {
            FaultKind::Overflow => SumError::ArithmeticOverflow {
                worker: fault.worker,
                stage: fault.stage,
            },
            FaultKind::Underflow => SumError::ArithmeticUnderflow {
                worker: fault.worker,
                stage: fault.stage,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fault_conversion() {
        let fault = ArithmeticFault {
            worker: 3,
            kind: FaultKind::Underflow,
            stage: FaultStage::Merge,
        };
        let err = SumError::from(fault);
        assert!(matches!(
            err,
            SumError::ArithmeticUnderflow { worker: 3, stage: FaultStage::Merge }
        ));
        assert_eq!(err.to_string(), "underflow detected in total summation (worker 3)");
    }

    #[test]
    fn test_thread_count_message() {
        let err = SumError::InvalidThreadCount {
            requested: 0,
            values: 10,
        };
        assert_eq!(
            err.to_string(),
            "invalid thread count 0 for 10 values (must be between 1 and 10)"
        );
    }

    #[test]
    fn test_io_cause_reported_once() {
        let err = SumError::InputUnavailable {
            path: PathBuf::from("/data/absent.txt"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        let chain = anyhow::Error::from(err).context("Summation failed");
        assert_eq!(
            format!("{:#}", chain),
            "Summation failed: input file /data/absent.txt is unavailable: no such file"
        );

        let err = SumError::ThreadLaunchFailure {
            worker: 2,
            source: std::io::Error::new(std::io::ErrorKind::Other, "resource limit"),
        };
        assert_eq!(
            format!("{:#}", anyhow::Error::from(err)),
            "failed to launch worker 2: resource limit"
        );
    }

    #[test]
    fn test_missing_file_message() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("absent.txt");
        let os_error = std::fs::File::open(&path).unwrap_err();

        let err = crate::input::read_values(&path, 10).unwrap_err();
        assert_eq!(
            format!("{:#}", anyhow::Error::from(err)),
            format!("input file {} is unavailable: {}", path.display(), os_error)
        );
    }
}
