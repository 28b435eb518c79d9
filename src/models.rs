//! Core data model for protocol performance analysis.
//!
//! One simulation log per protocol is parsed into a [`TimeSeries`] of
//! [`Sample`] rows; the aggregation step reduces each series to a
//! [`ProtocolStats`] record.

use serde::{Deserialize, Serialize};

/// One row of a protocol's simulation output.
///
/// Field names map to the CSV columns emitted by the simulation
/// (`Time, ThroughputKbps, PDR, AvgDelay, RoutingOverhead, PacketsReceived`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Simulation time of the sample, in seconds.
    #[serde(rename = "Time")]
    pub time: f64,
    /// Data delivery rate, in kilobits per second.
    #[serde(rename = "ThroughputKbps")]
    pub throughput_kbps: f64,
    /// Packet delivery ratio, in [0, 1].
    #[serde(rename = "PDR")]
    pub pdr: f64,
    /// Average end-to-end delay, in seconds.
    #[serde(rename = "AvgDelay")]
    pub avg_delay: f64,
    /// Cumulative count of routing control packets. Non-decreasing.
    #[serde(rename = "RoutingOverhead")]
    pub routing_overhead: f64,
    /// Packets received during this sample interval.
    #[serde(rename = "PacketsReceived")]
    pub packets_received: f64,
}

/// An ordered series of samples for one protocol.
///
/// Created once by the loader and never mutated afterwards. Ordering by
/// `time` is assumed from the simulation output, not enforced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    pub samples: Vec<Sample>,
}

impl TimeSeries {
    /// Wrap a parsed list of samples.
    pub fn new(samples: Vec<Sample>) -> Self {
        Self { samples }
    }

    /// Number of samples in the series.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True when the series holds no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Sample times, in series order.
    pub fn times(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(|s| s.time)
    }

    /// Values of one metric column, in series order.
    pub fn metric_values(&self, metric: Metric) -> Vec<f64> {
        self.samples.iter().map(|s| metric.value(s)).collect()
    }
}

/// The four numeric metrics tracked per protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Throughput,
    Pdr,
    Delay,
    Overhead,
}

impl Metric {
    /// All metrics, in report and plot order.
    pub const ALL: [Metric; 4] = [
        Metric::Throughput,
        Metric::Pdr,
        Metric::Delay,
        Metric::Overhead,
    ];

    /// The metric's value in a sample.
    pub fn value(&self, sample: &Sample) -> f64 {
        match self {
            Metric::Throughput => sample.throughput_kbps,
            Metric::Pdr => sample.pdr,
            Metric::Delay => sample.avg_delay,
            Metric::Overhead => sample.routing_overhead,
        }
    }

    /// Chart title fragment, e.g. "Throughput" in "Throughput Over Time".
    pub fn title(&self) -> &'static str {
        match self {
            Metric::Throughput => "Throughput",
            Metric::Pdr => "Packet Delivery Ratio",
            Metric::Delay => "End-to-End Delay",
            Metric::Overhead => "Routing Overhead",
        }
    }

    /// Y-axis label with unit.
    pub fn axis_label(&self) -> &'static str {
        match self {
            Metric::Throughput => "Throughput (Kbps)",
            Metric::Pdr => "PDR",
            Metric::Delay => "Average Delay (seconds)",
            Metric::Overhead => "Cumulative Routing Packets",
        }
    }

    /// Compact name for the correlation matrix cells.
    pub fn short_label(&self) -> &'static str {
        match self {
            Metric::Throughput => "Tput",
            Metric::Pdr => "PDR",
            Metric::Delay => "Delay",
            Metric::Overhead => "OH",
        }
    }
}

/// Summary statistics for one metric of one protocol.
///
/// Undefined values are NaN (empty series, or a single-sample standard
/// deviation); the renderers substitute a placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricSummary {
    pub avg: f64,
    pub min: f64,
    pub max: f64,
    pub std_dev: f64,
}

/// Routing overhead summary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverheadSummary {
    /// Final cumulative routing packet count. 0 for an empty series.
    pub total: f64,
    /// Mean of consecutive differences of the cumulative count.
    ///
    /// Approximates packets/second only when samples are evenly spaced in
    /// time; no time normalization is applied. NaN for fewer than two
    /// samples.
    pub avg_rate: f64,
}

/// Aggregated statistics for one protocol, immutable once computed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProtocolStats {
    pub throughput: MetricSummary,
    pub pdr: MetricSummary,
    pub delay: MetricSummary,
    pub overhead: OverheadSummary,
    pub total_packets_received: f64,
}

impl ProtocolStats {
    /// Summary of a sampled metric. Overhead is summarized separately as
    /// a cumulative quantity, see [`OverheadSummary`].
    pub fn metric_summary(&self, metric: Metric) -> Option<&MetricSummary> {
        match metric {
            Metric::Throughput => Some(&self.throughput),
            Metric::Pdr => Some(&self.pdr),
            Metric::Delay => Some(&self.delay),
            Metric::Overhead => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(time: f64) -> Sample {
        Sample {
            time,
            throughput_kbps: 100.0,
            pdr: 0.9,
            avg_delay: 0.01,
            routing_overhead: 50.0,
            packets_received: 10.0,
        }
    }

    #[test]
    fn test_metric_value_mapping() {
        let s = sample(1.0);
        assert_eq!(Metric::Throughput.value(&s), 100.0);
        assert_eq!(Metric::Pdr.value(&s), 0.9);
        assert_eq!(Metric::Delay.value(&s), 0.01);
        assert_eq!(Metric::Overhead.value(&s), 50.0);
    }

    #[test]
    fn test_metric_values_preserve_order() {
        let mut series = TimeSeries::default();
        for t in 0..3 {
            let mut s = sample(t as f64);
            s.throughput_kbps = t as f64 * 10.0;
            series.samples.push(s);
        }

        assert_eq!(
            series.metric_values(Metric::Throughput),
            vec![0.0, 10.0, 20.0]
        );
        assert_eq!(series.times().collect::<Vec<_>>(), vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_empty_series() {
        let series = TimeSeries::default();
        assert!(series.is_empty());
        assert_eq!(series.len(), 0);
        assert!(series.metric_values(Metric::Pdr).is_empty());
    }
}
