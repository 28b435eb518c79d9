//! Descriptive statistics over protocol time series.
//!
//! The formulas live here, spelled out, rather than behind a tabular-data
//! library: the standard-deviation convention and the undefined-value
//! handling are part of the tool's contract. Undefined values are NaN;
//! only the renderers translate them into placeholders.

use crate::models::{Metric, MetricSummary, OverheadSummary, ProtocolStats, TimeSeries};

/// Arithmetic mean. NaN for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation, N−1 divisor.
///
/// Matches the default of common statistics libraries (and of the
/// simulation tooling this analyzer consumes). NaN for fewer than two
/// values.
pub fn std_dev(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return f64::NAN;
    }
    let m = mean(values);
    let sum_sq: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    (sum_sq / (n - 1) as f64).sqrt()
}

/// Smallest value. NaN for an empty slice.
pub fn min(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::NAN, f64::min)
}

/// Largest value. NaN for an empty slice.
pub fn max(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::NAN, f64::max)
}

/// Mean of consecutive first differences. NaN for fewer than two values.
///
/// For a cumulative counter this is the mean per-step growth, not a true
/// per-second rate: sample spacing is not accounted for.
pub fn diff_mean(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let diffs: Vec<f64> = values.windows(2).map(|w| w[1] - w[0]).collect();
    mean(&diffs)
}

/// Pearson correlation coefficient between two equal-length series.
///
/// NaN when fewer than two pairs are available or either side has zero
/// variance.
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len().min(y.len());
    if n < 2 {
        return f64::NAN;
    }
    let mx = mean(&x[..n]);
    let my = mean(&y[..n]);

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for i in 0..n {
        let dx = x[i] - mx;
        let dy = y[i] - my;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return f64::NAN;
    }
    cov / (var_x.sqrt() * var_y.sqrt())
}

fn summarize_metric(values: &[f64]) -> MetricSummary {
    MetricSummary {
        avg: mean(values),
        min: min(values),
        max: max(values),
        std_dev: std_dev(values),
    }
}

/// Reduce a protocol's time series to its summary statistics.
///
/// Deterministic, one pass per metric column. An empty series yields NaN
/// averages and a zero overhead total; it is not an error anywhere in the
/// pipeline.
pub fn summarize(series: &TimeSeries) -> ProtocolStats {
    let overhead = series.metric_values(Metric::Overhead);

    ProtocolStats {
        throughput: summarize_metric(&series.metric_values(Metric::Throughput)),
        pdr: summarize_metric(&series.metric_values(Metric::Pdr)),
        delay: summarize_metric(&series.metric_values(Metric::Delay)),
        overhead: OverheadSummary {
            total: overhead.last().copied().unwrap_or(0.0),
            avg_rate: diff_mean(&overhead),
        },
        total_packets_received: series.samples.iter().map(|s| s.packets_received).sum(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Sample;

    fn series_from_rows(rows: &[(f64, f64, f64, f64, f64, f64)]) -> TimeSeries {
        TimeSeries::new(
            rows.iter()
                .map(
                    |&(time, throughput_kbps, pdr, avg_delay, routing_overhead, packets_received)| {
                        Sample {
                            time,
                            throughput_kbps,
                            pdr,
                            avg_delay,
                            routing_overhead,
                            packets_received,
                        }
                    },
                )
                .collect(),
        )
    }

    fn three_sample_series() -> TimeSeries {
        series_from_rows(&[
            (1.0, 100.0, 0.90, 0.010, 0.0, 5.0),
            (2.0, 200.0, 0.95, 0.020, 10.0, 7.0),
            (3.0, 150.0, 0.92, 0.015, 25.0, 3.0),
        ])
    }

    #[test]
    fn test_mean_min_max_ordering() {
        let stats = summarize(&three_sample_series());

        for summary in [stats.throughput, stats.pdr, stats.delay] {
            assert!(summary.min <= summary.avg);
            assert!(summary.avg <= summary.max);
            assert!(summary.std_dev >= 0.0);
        }
        assert!((stats.throughput.avg - 150.0).abs() < 1e-9);
        assert_eq!(stats.throughput.min, 100.0);
        assert_eq!(stats.throughput.max, 200.0);
    }

    #[test]
    fn test_std_dev_is_sample_convention() {
        // Variance of [100, 200, 150] with the N−1 divisor is 2500.
        assert!((std_dev(&[100.0, 200.0, 150.0]) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_single_sample_series() {
        let stats = summarize(&series_from_rows(&[(1.0, 42.0, 0.5, 0.1, 7.0, 2.0)]));

        assert_eq!(stats.throughput.avg, 42.0);
        assert_eq!(stats.throughput.min, 42.0);
        assert_eq!(stats.throughput.max, 42.0);
        assert!(stats.throughput.std_dev.is_nan());
        assert!(stats.overhead.avg_rate.is_nan());
        assert_eq!(stats.overhead.total, 7.0);
    }

    #[test]
    fn test_empty_series_does_not_panic() {
        let stats = summarize(&TimeSeries::default());

        assert!(stats.throughput.avg.is_nan());
        assert!(stats.pdr.avg.is_nan());
        assert!(stats.delay.avg.is_nan());
        assert!(stats.overhead.avg_rate.is_nan());
        assert_eq!(stats.overhead.total, 0.0);
        assert_eq!(stats.total_packets_received, 0.0);
    }

    #[test]
    fn test_overhead_total_is_last_value_not_sum() {
        let series = series_from_rows(&[
            (1.0, 0.0, 0.0, 0.0, 100.0, 0.0),
            (2.0, 0.0, 0.0, 0.0, 600.0, 0.0),
            (3.0, 0.0, 0.0, 0.0, 1234.0, 0.0),
        ]);
        let stats = summarize(&series);

        assert_eq!(stats.overhead.total, 1234.0);
    }

    #[test]
    fn test_overhead_rate_is_mean_of_first_differences() {
        // Differences of [0, 10, 25, 50] are [10, 15, 25], mean 16.666...
        let rate = diff_mean(&[0.0, 10.0, 25.0, 50.0]);
        assert!((rate - 50.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_total_packets_received_is_sum() {
        let stats = summarize(&three_sample_series());
        assert_eq!(stats.total_packets_received, 15.0);
    }

    #[test]
    fn test_pearson_perfect_correlation() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let inverted: Vec<f64> = x.iter().map(|v| -v).collect();

        assert!((pearson(&x, &x) - 1.0).abs() < 1e-9);
        assert!((pearson(&x, &inverted) + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_pearson_undefined_cases() {
        assert!(pearson(&[1.0], &[2.0]).is_nan());
        assert!(pearson(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]).is_nan());
        assert!(pearson(&[], &[]).is_nan());
    }
}
