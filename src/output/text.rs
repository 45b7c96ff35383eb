//! Human-readable text output

use crate::config::Config;
use crate::coordinator::SumReport;
use crate::util::time::{format_duration, format_rate};
use std::fmt::Write;

/// Print run results to stdout
pub fn print_results(report: &SumReport, config: &Config) {
    print!("{}", render_results(report, config));
}

/// Render run results
///
/// The first two lines are always the total and the elapsed time of the
/// parallel phase; the rest is informational.
pub fn render_results(report: &SumReport, config: &Config) -> String {
    let mut out = String::new();
    let run = report.run_stats();

    // Writing to a String cannot fail
    let _ = writeln!(out, "Total Sum: {}", report.total);
    let _ = writeln!(out, "Time taken: {} microseconds", report.elapsed.as_micros());
    let _ = writeln!(
        out,
        "Values: {} across {} threads ({} values/s)",
        format_number(report.values as u64),
        report.threads,
        format_rate(run.values_per_sec)
    );
    if report.verified {
        let _ = writeln!(out, "Verified against reference sum");
    }

    if config.output.per_worker {
        let _ = writeln!(out);
        let _ = writeln!(out, "Workers ({} merged):", run.merged_workers);
        let _ = writeln!(
            out,
            "  {:>4}  {:>12}  {:>12}  {:>22}  {:>10}",
            "id", "start", "end", "partial sum", "elapsed"
        );
        for w in &report.workers {
            let _ = writeln!(
                out,
                "  {:>4}  {:>12}  {:>12}  {:>22}  {:>10}",
                w.worker_id,
                w.start,
                w.end,
                w.local_sum,
                format_duration(w.elapsed)
            );
        }
        if let Some(slowest) = run.slowest_worker {
            let _ = writeln!(
                out,
                "  slowest: worker {} ({}, {:.0}% of parallel phase)",
                slowest,
                format_duration(run.slowest_elapsed),
                run.imbalance(report.elapsed) * 100.0
            );
        }
    }

    out
}

/// Format a number with thousands separators
fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();

    for (count, c) in s.chars().rev().enumerate() {
        if count > 0 && count % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }

    result.chars().rev().collect()
}
