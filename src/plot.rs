//! Comparison chart rendering.
//!
//! Thin layer over `plotters`: the four image artifacts mirror the
//! analysis report (time-series grid, average bar charts, distribution
//! box plots, correlation heatmaps). Protocols with an empty series are
//! skipped rather than plotted.

use crate::loader::LoadedData;
use crate::models::{Metric, ProtocolStats};
use crate::stats::pearson;
use anyhow::{Context, Result};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::Path;
use tracing::debug;

/// File names of the generated artifacts, in render order.
pub const ARTIFACTS: [&str; 4] = [
    "time_series_comparison.png",
    "average_performance.png",
    "distribution_analysis.png",
    "correlation_heatmap.png",
];

/// Generate all comparison charts into `dir`, creating it if absent.
pub fn render_all(
    data: &LoadedData,
    stats: &[(String, ProtocolStats)],
    dir: &Path,
) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create plot directory {}", dir.display()))?;

    time_series_comparison(data, &dir.join(ARTIFACTS[0]))?;
    average_performance(stats, &dir.join(ARTIFACTS[1]))?;
    distribution_analysis(data, &dir.join(ARTIFACTS[2]))?;
    correlation_heatmap(data, &dir.join(ARTIFACTS[3]))?;

    debug!("rendered {} artifacts into {}", ARTIFACTS.len(), dir.display());
    Ok(())
}

/// Fixed per-protocol palette, matching the published comparison figures.
fn protocol_color(protocol: &str) -> RGBColor {
    match protocol {
        "AODV" => RGBColor(228, 26, 28),
        "OLSR" => RGBColor(55, 126, 184),
        "DSR" => RGBColor(77, 175, 74),
        "DSDV" => RGBColor(152, 78, 163),
        _ => RGBColor(128, 128, 128),
    }
}

/// Finite-value range of an iterator, with a degenerate-range fallback.
fn axis_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for v in values {
        if v.is_finite() {
            lo = lo.min(v);
            hi = hi.max(v);
        }
    }
    if lo > hi {
        return (0.0, 1.0);
    }
    if lo == hi {
        return (lo - 0.5, hi + 0.5);
    }
    (lo, hi)
}

/// Y range for a metric panel: PDR is pinned to [0, 1.1] like the
/// reference figures, everything else grows from 0 with headroom.
fn metric_y_range(metric: Metric, values: impl Iterator<Item = f64>) -> (f64, f64) {
    if metric == Metric::Pdr {
        return (0.0, 1.1);
    }
    let (_, hi) = axis_range(values);
    (0.0, if hi > 0.0 { hi * 1.05 } else { 1.0 })
}

fn time_series_comparison(data: &LoadedData, path: &Path) -> Result<()> {
    let root = BitMapBackend::new(path, (1500, 1000)).into_drawing_area();
    root.fill(&WHITE)?;
    let root = root.titled(
        "MANET Routing Protocol Performance Comparison",
        ("sans-serif", 30),
    )?;
    let panels = root.split_evenly((2, 2));

    for (panel, metric) in panels.iter().zip(Metric::ALL) {
        let (t_lo, t_hi) = axis_range(data.datasets.iter().flat_map(|(_, s)| s.times()));
        let (y_lo, y_hi) = metric_y_range(
            metric,
            data.datasets
                .iter()
                .flat_map(|(_, s)| s.metric_values(metric)),
        );

        let mut chart = ChartBuilder::on(panel)
            .caption(format!("{} Over Time", metric.title()), ("sans-serif", 20))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(t_lo..t_hi, y_lo..y_hi)?;

        chart
            .configure_mesh()
            .x_desc("Time (seconds)")
            .y_desc(metric.axis_label())
            .draw()?;

        for (protocol, series) in &data.datasets {
            if series.is_empty() {
                continue;
            }
            let color = protocol_color(protocol);
            chart
                .draw_series(LineSeries::new(
                    series.samples.iter().map(|s| (s.time, metric.value(s))),
                    color.stroke_width(2),
                ))?
                .label(protocol.as_str())
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 18, y)], color.stroke_width(2))
                });
        }

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;
    }

    root.present()?;
    Ok(())
}

fn average_performance(stats: &[(String, ProtocolStats)], path: &Path) -> Result<()> {
    let root = BitMapBackend::new(path, (1400, 1000)).into_drawing_area();
    root.fill(&WHITE)?;
    let root = root.titled(
        "Average Performance Metrics Comparison",
        ("sans-serif", 30),
    )?;
    let panels = root.split_evenly((2, 2));

    let names: Vec<String> = stats.iter().map(|(name, _)| name.clone()).collect();
    let n = names.len();

    for (panel, metric) in panels.iter().zip(Metric::ALL) {
        let values: Vec<f64> = stats.iter().map(|(_, s)| bar_value(s, metric)).collect();
        let (y_lo, y_hi) = metric_y_range(metric, values.iter().copied());

        let mut chart = ChartBuilder::on(panel)
            .caption(bar_title(metric), ("sans-serif", 20))
            .margin(10)
            .x_label_area_size(35)
            .y_label_area_size(60)
            .build_cartesian_2d((0..n).into_segmented(), y_lo..y_hi)?;

        let label_names = names.clone();
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc("Protocol")
            .y_desc(metric.axis_label())
            .x_label_formatter(&move |seg| match seg {
                SegmentValue::CenterOf(i) if *i < label_names.len() => label_names[*i].clone(),
                _ => String::new(),
            })
            .draw()?;

        chart.draw_series((0..n).filter(|&i| values[i].is_finite()).map(|i| {
            let mut bar = Rectangle::new(
                [
                    (SegmentValue::Exact(i), 0.0),
                    (SegmentValue::Exact(i + 1), values[i]),
                ],
                protocol_color(&names[i]).filled(),
            );
            bar.set_margin(0, 0, 14, 14);
            bar
        }))?;

        // Value labels above each bar.
        let label_style = TextStyle::from(("sans-serif", 15).into_font())
            .pos(Pos::new(HPos::Center, VPos::Bottom));
        chart.draw_series((0..n).filter(|&i| values[i].is_finite()).map(|i| {
            Text::new(
                bar_label(metric, values[i]),
                (SegmentValue::CenterOf(i), values[i]),
                label_style.clone(),
            )
        }))?;
    }

    root.present()?;
    Ok(())
}

/// Bar height for a metric: overhead compares totals, the rest averages.
fn bar_value(stats: &ProtocolStats, metric: Metric) -> f64 {
    match stats.metric_summary(metric) {
        Some(summary) => summary.avg,
        None => stats.overhead.total,
    }
}

fn bar_title(metric: Metric) -> String {
    match metric {
        Metric::Overhead => "Total Routing Overhead".to_string(),
        other => format!("Average {}", other.title()),
    }
}

fn bar_label(metric: Metric, value: f64) -> String {
    match metric {
        Metric::Throughput => format!("{value:.1}"),
        Metric::Pdr => format!("{value:.3}"),
        Metric::Delay => format!("{value:.4}"),
        Metric::Overhead => format!("{value:.0}"),
    }
}

fn distribution_analysis(data: &LoadedData, path: &Path) -> Result<()> {
    let root = BitMapBackend::new(path, (1400, 1000)).into_drawing_area();
    root.fill(&WHITE)?;
    let root = root.titled("Performance Distribution Analysis", ("sans-serif", 30))?;
    let panels = root.split_evenly((2, 2));

    let names: Vec<String> = data.datasets.iter().map(|(name, _)| name.clone()).collect();
    let n = names.len();

    // Overhead is cumulative; its distribution panel is omitted, matching
    // the three box plots of the reference figures.
    let boxed_metrics = [Metric::Throughput, Metric::Pdr, Metric::Delay];

    for (panel, metric) in panels.iter().zip(boxed_metrics) {
        let (y_lo, y_hi) = metric_y_range(
            metric,
            data.datasets
                .iter()
                .flat_map(|(_, s)| s.metric_values(metric)),
        );

        let mut chart = ChartBuilder::on(panel)
            .caption(
                format!("{} Distribution", metric.title()),
                ("sans-serif", 20),
            )
            .margin(10)
            .x_label_area_size(35)
            .y_label_area_size(60)
            .build_cartesian_2d((0..n).into_segmented(), y_lo..y_hi)?;

        let label_names = names.clone();
        chart
            .configure_mesh()
            .disable_x_mesh()
            .y_desc(metric.axis_label())
            .x_label_formatter(&move |seg| match seg {
                SegmentValue::CenterOf(i) if *i < label_names.len() => label_names[*i].clone(),
                _ => String::new(),
            })
            .draw()?;

        chart.draw_series(data.datasets.iter().enumerate().filter_map(
            |(i, (protocol, series))| {
                if series.is_empty() {
                    return None;
                }
                let quartiles = Quartiles::new(&series.metric_values(metric));
                Some(
                    Boxplot::new_vertical(SegmentValue::CenterOf(i), &quartiles)
                        .width(26)
                        .style(protocol_color(protocol)),
                )
            },
        ))?;
    }

    root.present()?;
    Ok(())
}

fn correlation_heatmap(data: &LoadedData, path: &Path) -> Result<()> {
    let n = data.datasets.len().max(1);
    let root = BitMapBackend::new(path, (400 * n as u32, 460)).into_drawing_area();
    root.fill(&WHITE)?;
    let root = root.titled("Metric Correlation Analysis", ("sans-serif", 26))?;
    let panels = root.split_evenly((1, n));

    for (panel, (protocol, series)) in panels.iter().zip(&data.datasets) {
        let columns: Vec<Vec<f64>> = Metric::ALL
            .iter()
            .map(|m| series.metric_values(*m))
            .collect();

        let (width, height) = panel.dim_in_pixel();
        let left = 70i32;
        let top = 40i32;
        let right = 20i32;
        let bottom = 30i32;
        let cell_w = (width as i32 - left - right) / 4;
        let cell_h = (height as i32 - top - bottom) / 4;

        let title_style = TextStyle::from(("sans-serif", 20).into_font())
            .pos(Pos::new(HPos::Center, VPos::Top));
        panel.draw(&Text::new(
            protocol.clone(),
            (left + cell_w * 2, 8),
            title_style,
        ))?;

        let cell_style = TextStyle::from(("sans-serif", 15).into_font())
            .pos(Pos::new(HPos::Center, VPos::Center));
        let axis_style = TextStyle::from(("sans-serif", 14).into_font())
            .pos(Pos::new(HPos::Center, VPos::Center));

        for (row, row_metric) in Metric::ALL.iter().enumerate() {
            let y0 = top + row as i32 * cell_h;

            // Row label on the left edge.
            panel.draw(&Text::new(
                row_metric.short_label(),
                (left / 2, y0 + cell_h / 2),
                axis_style.clone(),
            ))?;

            for (col, col_metric) in Metric::ALL.iter().enumerate() {
                let x0 = left + col as i32 * cell_w;
                let r = pearson(&columns[col], &columns[row]);

                panel.draw(&Rectangle::new(
                    [(x0, y0), (x0 + cell_w, y0 + cell_h)],
                    correlation_color(r).filled(),
                ))?;
                panel.draw(&Rectangle::new(
                    [(x0, y0), (x0 + cell_w, y0 + cell_h)],
                    BLACK.stroke_width(1),
                ))?;

                let label = if r.is_nan() {
                    "N/A".to_string()
                } else {
                    format!("{r:.2}")
                };
                panel.draw(&Text::new(
                    label,
                    (x0 + cell_w / 2, y0 + cell_h / 2),
                    cell_style.clone(),
                ))?;

                // Column labels under the bottom row.
                if row == Metric::ALL.len() - 1 {
                    panel.draw(&Text::new(
                        col_metric.short_label(),
                        (x0 + cell_w / 2, y0 + cell_h + bottom / 2),
                        axis_style.clone(),
                    ))?;
                }
            }
        }
    }

    root.present()?;
    Ok(())
}

/// Diverging blue/white/red scale over [-1, 1]; NaN renders neutral gray.
fn correlation_color(r: f64) -> RGBColor {
    if r.is_nan() {
        return RGBColor(220, 220, 220);
    }
    let t = r.clamp(-1.0, 1.0);
    let blend = |from: u8, to: u8, f: f64| (from as f64 + (to as f64 - from as f64) * f) as u8;
    if t < 0.0 {
        let f = -t;
        RGBColor(blend(255, 59, f), blend(255, 76, f), blend(255, 192, f))
    } else {
        RGBColor(blend(255, 180, t), blend(255, 4, t), blend(255, 38, t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_palette() {
        assert_eq!(protocol_color("AODV"), RGBColor(228, 26, 28));
        assert_eq!(protocol_color("OLSR"), RGBColor(55, 126, 184));
        assert_eq!(protocol_color("UNKNOWN"), RGBColor(128, 128, 128));
    }

    #[test]
    fn test_axis_range_fallbacks() {
        assert_eq!(axis_range(std::iter::empty()), (0.0, 1.0));
        assert_eq!(axis_range([f64::NAN].into_iter()), (0.0, 1.0));
        assert_eq!(axis_range([5.0].into_iter()), (4.5, 5.5));
        assert_eq!(axis_range([1.0, 3.0, 2.0].into_iter()), (1.0, 3.0));
    }

    #[test]
    fn test_correlation_color_endpoints() {
        assert_eq!(correlation_color(0.0), RGBColor(255, 255, 255));
        assert_eq!(correlation_color(1.0), RGBColor(180, 4, 38));
        assert_eq!(correlation_color(-1.0), RGBColor(59, 76, 192));
        assert_eq!(correlation_color(f64::NAN), RGBColor(220, 220, 220));
    }

    #[test]
    fn test_bar_value_uses_total_for_overhead() {
        use crate::models::{MetricSummary, OverheadSummary};
        let summary = MetricSummary {
            avg: 2.0,
            min: 1.0,
            max: 3.0,
            std_dev: 0.5,
        };
        let stats = ProtocolStats {
            throughput: summary,
            pdr: summary,
            delay: summary,
            overhead: OverheadSummary {
                total: 99.0,
                avg_rate: 3.0,
            },
            total_packets_received: 10.0,
        };

        assert_eq!(bar_value(&stats, Metric::Throughput), 2.0);
        assert_eq!(bar_value(&stats, Metric::Overhead), 99.0);
    }
}
