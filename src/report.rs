//! Report rendering.
//!
//! The full text report is built as one string and handed to both sinks,
//! so console output and the report file are identical byte for byte. A
//! JSON rendering of the same statistics is available as an alternative
//! file format.

use crate::models::ProtocolStats;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;

const WIDTH: usize = 80;

fn rule(c: char) -> String {
    std::iter::repeat(c).take(WIDTH).collect()
}

/// Format a statistic with fixed precision, substituting `N/A` for the
/// undefined (NaN) sentinel. NaN must never reach the operator raw.
fn fmt_stat(value: f64, decimals: usize) -> String {
    if value.is_nan() {
        "N/A".to_string()
    } else {
        format!("{value:.decimals$}")
    }
}

/// Generate the complete text report: comparison table plus per-protocol
/// breakdown.
pub fn render_text(entries: &[(String, ProtocolStats)], generated: DateTime<Utc>) -> String {
    let mut output = String::new();

    output.push_str(&rule('='));
    output.push('\n');
    output.push_str("MANET ROUTING PROTOCOL PERFORMANCE ANALYSIS\n");
    output.push_str(&rule('='));
    output.push('\n');
    output.push_str(&format!(
        "Generated: {}\n\n",
        generated.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    output.push_str(&render_comparison_table(entries));
    output.push_str(&render_detailed_section(entries));

    output
}

/// One row per protocol with the headline averages.
fn render_comparison_table(entries: &[(String, ProtocolStats)]) -> String {
    let mut section = String::new();

    section.push_str("COMPARATIVE SUMMARY\n");
    section.push_str(&rule('-'));
    section.push('\n');
    section.push_str(&format!(
        "{:<10} {:<12} {:<15} {:<18} {:<12}\n",
        "Protocol", "Avg PDR", "Avg Delay(s)", "Avg Tput(Kbps)", "Total OH"
    ));
    section.push_str(&rule('-'));
    section.push('\n');

    for (protocol, stats) in entries {
        section.push_str(&format!(
            "{:<10} {:<12} {:<15} {:<18} {:<12}\n",
            protocol,
            fmt_stat(stats.pdr.avg, 4),
            fmt_stat(stats.delay.avg, 6),
            fmt_stat(stats.throughput.avg, 2),
            fmt_stat(stats.overhead.total, 0),
        ));
    }
    section.push('\n');

    section
}

/// Per-protocol breakdown with every aggregated field.
fn render_detailed_section(entries: &[(String, ProtocolStats)]) -> String {
    let mut section = String::new();

    section.push_str(&rule('='));
    section.push('\n');
    section.push_str("DETAILED STATISTICS\n");
    section.push_str(&rule('='));
    section.push('\n');

    for (protocol, stats) in entries {
        section.push_str(&format!("\n{protocol}:\n"));

        section.push_str("  Throughput:\n");
        section.push_str(&format!(
            "    Average: {} Kbps\n",
            fmt_stat(stats.throughput.avg, 2)
        ));
        section.push_str(&format!(
            "    Min/Max: {} / {} Kbps\n",
            fmt_stat(stats.throughput.min, 2),
            fmt_stat(stats.throughput.max, 2)
        ));
        section.push_str(&format!(
            "    Std Dev: {} Kbps\n",
            fmt_stat(stats.throughput.std_dev, 2)
        ));

        section.push_str("  Packet Delivery Ratio:\n");
        section.push_str(&format!(
            "    Average: {} ({})\n",
            fmt_stat(stats.pdr.avg, 4),
            percentage(stats.pdr.avg)
        ));
        section.push_str(&format!(
            "    Min/Max: {} / {}\n",
            fmt_stat(stats.pdr.min, 4),
            fmt_stat(stats.pdr.max, 4)
        ));

        section.push_str("  End-to-End Delay:\n");
        section.push_str(&format!(
            "    Average: {} seconds\n",
            fmt_stat(stats.delay.avg, 6)
        ));
        section.push_str(&format!(
            "    Min/Max: {} / {} seconds\n",
            fmt_stat(stats.delay.min, 6),
            fmt_stat(stats.delay.max, 6)
        ));

        section.push_str("  Routing Overhead:\n");
        section.push_str(&format!(
            "    Total packets: {}\n",
            fmt_stat(stats.overhead.total, 0)
        ));
        section.push_str(&format!(
            "    Average rate: {} packets/sec\n",
            fmt_stat(stats.overhead.avg_rate, 2)
        ));

        section.push_str("  Packets Received:\n");
        section.push_str(&format!(
            "    Total: {}\n",
            fmt_stat(stats.total_packets_received, 0)
        ));
    }

    section
}

fn percentage(ratio: f64) -> String {
    if ratio.is_nan() {
        "N/A".to_string()
    } else {
        format!("{:.2}%", ratio * 100.0)
    }
}

#[derive(Serialize)]
struct JsonEntry<'a> {
    protocol: &'a str,
    #[serde(flatten)]
    stats: &'a ProtocolStats,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    generated: DateTime<Utc>,
    protocols: Vec<JsonEntry<'a>>,
}

/// Generate a JSON report of the same statistics. Undefined (NaN) values
/// serialize as `null`.
pub fn render_json(entries: &[(String, ProtocolStats)], generated: DateTime<Utc>) -> Result<String> {
    let report = JsonReport {
        generated,
        protocols: entries
            .iter()
            .map(|(protocol, stats)| JsonEntry { protocol, stats })
            .collect(),
    };

    serde_json::to_string_pretty(&report).context("failed to serialize JSON report")
}

/// Write rendered report content to `path`.
pub fn write_report(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content)
        .with_context(|| format!("failed to write report to {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TimeSeries;
    use crate::stats::summarize;

    fn entry(protocol: &str, series: &TimeSeries) -> (String, ProtocolStats) {
        (protocol.to_string(), summarize(series))
    }

    fn populated_series() -> TimeSeries {
        use crate::models::Sample;
        TimeSeries::new(vec![
            Sample {
                time: 1.0,
                throughput_kbps: 100.0,
                pdr: 0.90,
                avg_delay: 0.010,
                routing_overhead: 10.0,
                packets_received: 5.0,
            },
            Sample {
                time: 2.0,
                throughput_kbps: 200.0,
                pdr: 0.95,
                avg_delay: 0.020,
                routing_overhead: 30.0,
                packets_received: 7.0,
            },
        ])
    }

    #[test]
    fn test_report_lists_all_protocols() {
        let series = populated_series();
        let entries = vec![entry("AODV", &series), entry("OLSR", &series)];

        let text = render_text(&entries, Utc::now());

        assert!(text.contains("COMPARATIVE SUMMARY"));
        assert!(text.contains("DETAILED STATISTICS"));
        assert!(text.contains("AODV:"));
        assert!(text.contains("OLSR:"));
    }

    #[test]
    fn test_undefined_values_render_as_placeholder() {
        let entries = vec![entry("DSR", &TimeSeries::default())];

        let text = render_text(&entries, Utc::now());

        assert!(text.contains("N/A"));
        assert!(!text.contains("NaN"));
    }

    #[test]
    fn test_fixed_precisions() {
        let series = populated_series();
        let entries = vec![entry("AODV", &series)];

        let text = render_text(&entries, Utc::now());

        // PDR 4 decimals, delay 6 decimals, throughput 2 decimals.
        assert!(text.contains("0.9250"));
        assert!(text.contains("0.015000"));
        assert!(text.contains("150.00"));
        // Overhead total is the last cumulative value, no decimals.
        assert!(text.contains("Total packets: 30"));
        assert!(text.contains("Total: 12"));
    }

    #[test]
    fn test_fmt_stat() {
        assert_eq!(fmt_stat(1.23456, 2), "1.23");
        assert_eq!(fmt_stat(f64::NAN, 2), "N/A");
        assert_eq!(fmt_stat(1234.0, 0), "1234");
    }

    #[test]
    fn test_file_content_matches_console_content() {
        let series = populated_series();
        let entries = vec![entry("AODV", &series)];
        let text = render_text(&entries, Utc::now());

        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("statistics_summary.txt");
        write_report(&path, &text).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), text);
    }

    #[test]
    fn test_json_report_serializes_nan_as_null() {
        let entries = vec![entry("DSR", &TimeSeries::default())];

        let json = render_json(&entries, Utc::now()).unwrap();

        assert!(json.contains("\"protocol\": \"DSR\""));
        assert!(json.contains("null"));
        assert!(!json.contains("NaN"));
    }
}
