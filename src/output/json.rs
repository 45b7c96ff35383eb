//! JSON output formatting
//!
//! Serializes a run into a self-describing document: host and timestamp,
//! the effective configuration, the total, and per-worker detail when
//! requested.

use crate::config::Config;
use crate::coordinator::SumReport;
use crate::util::time::format_duration;
use crate::Result;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::time::Duration;

/// Duration with both microseconds and human-readable format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonDuration {
    pub micros: u64,
    pub human: String,
}

impl JsonDuration {
    pub fn from_duration(d: Duration) -> Self {
        Self {
            micros: d.as_micros() as u64,
            human: format_duration(d),
        }
    }
}

/// Run metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRunInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    /// RFC 3339 timestamp of report creation
    pub timestamp: String,
    pub input: String,
    pub max_values: usize,
    pub version: String,
}

/// One worker's contribution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonWorker {
    pub id: usize,
    pub start: usize,
    pub end: usize,
    pub elements: usize,
    pub partial_sum: i64,
    pub elapsed: JsonDuration,
}

/// Complete report document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonReport {
    pub run: JsonRunInfo,
    pub total_sum: i64,
    pub values: usize,
    pub threads: usize,
    pub elapsed: JsonDuration,
    pub values_per_sec: f64,
    pub verified: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workers: Option<Vec<JsonWorker>>,
}

/// Build the JSON document for a finished run
pub fn build_report(report: &SumReport, config: &Config) -> JsonReport {
    let workers = config.output.per_worker.then(|| {
        report
            .workers
            .iter()
            .map(|w| JsonWorker {
                id: w.worker_id,
                start: w.start,
                end: w.end,
                elements: w.elements,
                partial_sum: w.local_sum,
                elapsed: JsonDuration::from_duration(w.elapsed),
            })
            .collect()
    });

    JsonReport {
        run: JsonRunInfo {
            hostname: hostname::get().ok().map(|h| h.to_string_lossy().into_owned()),
            timestamp: chrono::Utc::now().to_rfc3339(),
            input: config.input.path.display().to_string(),
            max_values: config.input.max_values,
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        total_sum: report.total,
        values: report.values,
        threads: report.threads,
        elapsed: JsonDuration::from_duration(report.elapsed),
        values_per_sec: report.run_stats().values_per_sec,
        verified: report.verified,
        workers,
    }
}

/// Print the JSON report to stdout
pub fn print_json(report: &SumReport, config: &Config) -> Result<()> {
    let doc = build_report(report, config);
    let text = serde_json::to_string_pretty(&doc).context("Failed to serialize JSON report")?;
    println!("{}", text);
    Ok(())
}

/// Write the JSON report to a file
pub fn write_json_output(output_path: &Path, report: &SumReport, config: &Config) -> Result<()> {
    let file = File::create(output_path)
        .with_context(|| format!("Failed to create JSON output: {}", output_path.display()))?;

    serde_json::to_writer_pretty(BufWriter::new(file), &build_report(report, config))
        .with_context(|| format!("Failed to write JSON output: {}", output_path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::WorkerStats;
    use tempfile::TempDir;

    fn report() -> SumReport {
        SumReport {
            total: -7,
            values: 3,
            threads: 1,
            elapsed: Duration::from_micros(1500),
            workers: vec![WorkerStats {
                worker_id: 0,
                start: 0,
                end: 2,
                elements: 3,
                local_sum: -7,
                elapsed: Duration::from_micros(900),
            }],
            verified: false,
        }
    }

    #[test]
    fn test_build_report() {
        let doc = build_report(&report(), &Config::default());
        assert_eq!(doc.total_sum, -7);
        assert_eq!(doc.elapsed.micros, 1500);
        assert_eq!(doc.elapsed.human, "1.50ms");
        assert!(doc.workers.is_none());
        assert!(chrono::DateTime::parse_from_rfc3339(&doc.run.timestamp).is_ok());
    }

    #[test]
    fn test_write_json_output() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.json");
        let mut config = Config::default();
        config.output.per_worker = true;

        write_json_output(&path, &report(), &config).unwrap();

        let parsed: JsonReport =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed.total_sum, -7);
        let workers = parsed.workers.unwrap();
        assert_eq!(workers.len(), 1);
        assert_eq!(workers[0].partial_sum, -7);
    }

    #[test]
    fn test_write_to_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("report.json");
        assert!(write_json_output(&path, &report(), &Config::default()).is_err());
    }
}
