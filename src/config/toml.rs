//! TOML configuration file parsing

use super::*;
use crate::config::cli::{Cli, FormatArg};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Parse TOML configuration file
pub fn parse_toml_file(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_toml_string(&contents)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Parse TOML configuration from string
pub fn parse_toml_string(contents: &str) -> Result<Config> {
    let config: Config = ::toml::from_str(contents).context("Failed to parse TOML configuration")?;

    Ok(config)
}

/// Merge CLI arguments with TOML configuration (CLI takes precedence)
///
/// The positional file and thread count always come from the command line.
pub fn merge_cli_with_config(cli: &Cli, mut config: Config) -> Config {
    config.input.path = cli.input.clone();
    config.workers.threads = cli.threads;

    if let Some(max_values) = cli.max_values {
        config.input.max_values = max_values;
    }

    if let Some(format) = cli.format {
        config.output.format = match format {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
        };
    }
    if let Some(ref json) = cli.json {
        config.output.json_path = Some(json.clone());
    }

    // Flags can only switch features on
    config.output.per_worker |= cli.per_worker;
    config.runtime.verify |= cli.verify;
    config.runtime.debug |= cli.debug;

    config
}

/// Build the effective configuration from the command line
pub fn load_config(cli: &Cli) -> Result<Config> {
    let base = match cli.config {
        Some(ref path) => parse_toml_file(path)?,
        None => Config::default(),
    };
    Ok(merge_cli_with_config(cli, base))
}
