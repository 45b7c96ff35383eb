//! parsum - parallel, overflow-checked integer summation
//!
//! parsum reads a file of integers into memory and sums it with a fixed
//! number of worker threads. Each worker sums one contiguous slice and
//! merges its partial sum into a shared total under a lock; every
//! addition is checked against the signed 64-bit range, and any overflow
//! or underflow fails the whole run instead of producing a wrapped total.
//!
//! # Architecture
//!
//! - **Partitioner**: static split into equal contiguous ranges, the last
//!   range taking the remainder
//! - **Workers**: scoped threads that borrow their slice and the shared total
//! - **Coordinator**: spawn, join, then inspect the shared error flag
//! - **Reports**: text or JSON, with optional per-worker detail

pub mod config;
pub mod coordinator;
pub mod error;
pub mod input;
pub mod output;
pub mod partition;
pub mod stats;
pub mod util;
pub mod worker;

// Re-export commonly used types
pub use config::Config;
pub use coordinator::{Coordinator, SumReport};
pub use error::SumError;

/// Result type used by the application layer
pub type Result<T> = anyhow::Result<T>;
