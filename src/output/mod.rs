//! Output formatting

pub mod json;
pub mod text;

use crate::config::{Config, OutputFormat};
use crate::coordinator::SumReport;
use crate::Result;

/// Emit the report in the configured format, plus the JSON file if requested
pub fn emit(report: &SumReport, config: &Config) -> Result<()> {
    match config.output.format {
        OutputFormat::Text => text::print_results(report, config),
        OutputFormat::Json => json::print_json(report, config)?,
    }

    if let Some(ref path) = config.output.json_path {
        json::write_json_output(path, report, config)?;
        tracing::info!("JSON report written to {}", path.display());
    }

    Ok(())
}
