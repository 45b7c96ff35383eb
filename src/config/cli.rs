//! CLI argument parsing using clap

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Console report format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    /// Human-readable text (default)
    Text,
    /// JSON document
    Json,
}

/// parsum - sum a file of integers with a fixed pool of worker threads
#[derive(Parser, Debug)]
#[command(name = "parsum")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// File of whitespace-separated integers
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// Number of worker threads (1..=number of values)
    #[arg(value_name = "THREADS", allow_negative_numbers = true)]
    pub threads: i64,

    /// TOML configuration file (command-line values take precedence)
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Maximum number of values to read; reaching it is an error
    #[arg(long, env = "PARSUM_MAX_VALUES")]
    pub max_values: Option<usize>,

    /// Console report format
    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,

    /// Also write a JSON report to this path
    #[arg(long, value_name = "PATH")]
    pub json: Option<PathBuf>,

    /// Show per-worker ranges, partial sums and timings
    #[arg(long)]
    pub per_worker: bool,

    /// Cross-check the total against an exact reference sum
    #[arg(long)]
    pub verify: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
