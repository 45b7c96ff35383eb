//! Configuration module
//!
//! Handles CLI argument parsing, TOML configuration files, and validation.

pub mod cli;
pub mod toml;
pub mod validator;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use tracing::Level;

/// Complete run configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub workers: WorkerConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub runtime: RuntimeConfig,
}

/// Input file configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// File holding whitespace-separated integers
    #[serde(default)]
    pub path: PathBuf,
    /// Maximum number of values accepted; reaching it is an error
    #[serde(default = "default_max_values")]
    pub max_values: usize,
}

fn default_max_values() -> usize {
    100_000_000
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::new(),
            max_values: default_max_values(),
        }
    }
}

/// Worker thread configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Requested number of worker threads.
    ///
    /// Signed so that zero and negative requests survive parsing and are
    /// rejected by the partitioner with a proper error.
    #[serde(default = "default_threads")]
    pub threads: i64,
    /// Prefix for worker thread names (`<prefix>-<id>`)
    #[serde(default = "default_thread_name_prefix")]
    pub thread_name_prefix: String,
}

fn default_threads() -> i64 {
    1
}

fn default_thread_name_prefix() -> String {
    "parsum-worker".to_string()
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            threads: default_threads(),
            thread_name_prefix: default_thread_name_prefix(),
        }
    }
}

/// Report format written to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Console report format
    #[serde(default)]
    pub format: OutputFormat,
    /// Also write the JSON report to this file
    #[serde(default)]
    pub json_path: Option<PathBuf>,
    /// Include per-worker detail in reports
    #[serde(default)]
    pub per_worker: bool,
}

/// Runtime behaviour
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Verbose (debug level) logging
    #[serde(default)]
    pub debug: bool,
    /// Cross-check the result against an exact reference sum
    #[serde(default)]
    pub verify: bool,
}

impl RuntimeConfig {
    /// Default log level when `RUST_LOG` is unset
    pub fn log_level(&self) -> Level {
        if self.debug {
            Level::DEBUG
        } else {
            Level::INFO
        }
    }
}
