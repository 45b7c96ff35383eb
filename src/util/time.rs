//! Rendering of durations and rates for reports

use std::time::Duration;

/// Format a duration with the largest unit that keeps it above 1
///
/// ```
/// use std::time::Duration;
/// use parsum::util::time::format_duration;
///
/// assert_eq!(format_duration(Duration::from_nanos(500)), "500ns");
/// assert_eq!(format_duration(Duration::from_micros(2500)), "2.50ms");
/// ```
pub fn format_duration(duration: Duration) -> String {
    const UNITS: [(u128, &str); 3] = [
        (1_000_000_000, "s"),
        (1_000_000, "ms"),
        (1_000, "us"),
    ];

    let nanos = duration.as_nanos();
    UNITS
        .iter()
        .find(|(scale, _)| nanos >= *scale)
        .map(|(scale, unit)| format!("{:.2}{}", nanos as f64 / *scale as f64, unit))
        .unwrap_or_else(|| format!("{}ns", nanos))
}

/// Format a values-per-second rate with a K/M/G suffix
pub fn format_rate(rate: f64) -> String {
    match rate {
        r if r >= 1e9 => format!("{:.2}G", r / 1e9),
        r if r >= 1e6 => format!("{:.2}M", r / 1e6),
        r if r >= 1e3 => format!("{:.2}K", r / 1e3),
        r => format!("{:.0}", r),
    }
}

/// Values per second over `duration`; 0.0 for a zero duration
pub fn calculate_rate(count: u64, duration: Duration) -> f64 {
    let seconds = duration.as_secs_f64();
    if seconds > 0.0 {
        count as f64 / seconds
    } else {
        0.0
    }
}
