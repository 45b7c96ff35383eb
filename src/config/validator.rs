//! Configuration validation

use super::*;
use anyhow::Result;
use tracing::warn;

/// Validate complete configuration
///
/// The thread count is only checked against the host here; whether it
/// fits the number of values is decided by the partitioner once the
/// input has been read.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_input(&config.input)?;
    validate_workers(&config.workers)?;
    validate_output(&config.output)?;

    Ok(())
}

/// Validate input configuration
pub fn validate_input(input: &InputConfig) -> Result<()> {
    if input.path.as_os_str().is_empty() {
        anyhow::bail!("input path must not be empty");
    }

    if input.max_values == 0 {
        anyhow::bail!("max_values must be at least 1");
    }

    Ok(())
}

/// Validate worker configuration
pub fn validate_workers(workers: &WorkerConfig) -> Result<()> {
    if workers.thread_name_prefix.trim().is_empty() {
        anyhow::bail!("thread_name_prefix must not be empty");
    }

    let cpus = num_cpus::get();
    if workers.threads > cpus as i64 {
        warn!(
            "{} worker threads requested but only {} logical CPUs are available",
            workers.threads, cpus
        );
    }

    Ok(())
}

/// Validate output configuration
pub fn validate_output(output: &OutputConfig) -> Result<()> {
    if let Some(ref path) = output.json_path {
        if path.as_os_str().is_empty() {
            anyhow::bail!("json output path must not be empty");
        }
        if path.is_dir() {
            anyhow::bail!("json output path {} is a directory", path.display());
        }
    }

    Ok(())
}
