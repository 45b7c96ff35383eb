//! parsum CLI entry point

use anyhow::{Context, Result};
use parsum::config::{cli::Cli, toml::load_config, validator::validate_config};
use parsum::{output, Coordinator};
use std::sync::Arc;
use tracing::{debug, Level};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse_args();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_logging(default_level: Level) {
    // RUST_LOG wins over --debug and [runtime] debug when set
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level.to_string()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    init_logging(config.runtime.log_level());

    validate_config(&config).context("Configuration validation failed")?;
    debug!("effective configuration: {:?}", config);

    let config = Arc::new(config);
    let coordinator = Coordinator::new(Arc::clone(&config));
    let report = coordinator.run().context("Summation failed")?;

    output::emit(&report, &config)
}
