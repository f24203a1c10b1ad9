//! Grouped-bar chart rendering.
//!
//! Renders the aggregated table as one image with three horizontal
//! subplots (RMSE, MAE, R2). Bar positions, scaling, and annotation
//! text are computed by pure layout functions; `render` hands the
//! result to plotters' bitmap backend.

use crate::models::{MetricRow, MODEL_ORDER, TARGET_ORDER};
use anyhow::{Context, Result};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Width of one bar in target-axis units.
pub const BAR_WIDTH: f64 = 0.22;

/// Metrics drawn, one subplot each, in this order.
pub const METRICS: [&str; 3] = ["RMSE", "MAE", "R2"];

/// One color per model in `MODEL_ORDER` (matplotlib's default cycle).
pub const MODEL_COLORS: [RGBColor; 3] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
];

/// Rendering options for the comparison chart.
#[derive(Debug, Clone)]
pub struct ChartOptions {
    /// Output resolution; the figure is 18in x 5in.
    pub dpi: u32,
    /// Multiplier applied to all values before plotting and annotation.
    pub scale: f64,
    /// Decimal places in bar annotations.
    pub decimals: usize,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            dpi: 150,
            scale: 1.0,
            decimals: 4,
        }
    }
}

/// One positioned bar with its annotation.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    /// Index into `MODEL_ORDER`, selects the color and legend entry.
    pub model_idx: usize,
    /// Left edge on the target axis.
    pub x0: f64,
    /// Right edge on the target axis.
    pub x1: f64,
    /// Bar height after scaling.
    pub value: f64,
    /// Annotation text above the bar.
    pub annotation: String,
    /// Vertical position of the annotation baseline.
    pub annotation_y: f64,
}

impl Bar {
    /// Horizontal center of the bar.
    pub fn center(&self) -> f64 {
        (self.x0 + self.x1) / 2.0
    }
}

/// Computed layout of one subplot.
#[derive(Debug, Clone)]
pub struct SubplotLayout {
    /// Metric this subplot shows.
    pub metric: String,
    /// All bars, in (model, target) order.
    pub bars: Vec<Bar>,
    /// Largest scaled value in the subplot.
    pub max_value: f64,
    /// Smallest scaled value in the subplot.
    pub min_value: f64,
}

/// Offset of model `i`'s bar center from its target tick, for `n` models.
pub fn bar_offset(i: usize, n: usize) -> f64 {
    (i as f64 - (n as f64 - 1.0) / 2.0) * BAR_WIDTH
}

/// Format a value for annotation with the configured decimal places.
pub fn format_value(value: f64, decimals: usize) -> String {
    format!("{value:.decimals$}")
}

/// Gap between a bar top and its annotation: 1% of the subplot maximum,
/// or a small epsilon when every value is zero.
pub fn annotation_offset(max_value: f64) -> f64 {
    if max_value > 0.0 {
        max_value * 0.01
    } else {
        0.001
    }
}

/// Drop rows whose model or target is outside the fixed category lists,
/// warning about each dropped row.
pub fn known_rows(rows: &[MetricRow]) -> Vec<&MetricRow> {
    rows.iter()
        .filter(|row| {
            let known = MODEL_ORDER.contains(&row.model.as_str())
                && TARGET_ORDER.contains(&row.target.as_str());
            if !known {
                warn!(
                    "Dropping row with unknown category: model={}, target={}",
                    row.model, row.target
                );
            }
            known
        })
        .collect()
}

/// Compute the bar layout of one metric's subplot.
///
/// Bars appear in (model, target) order; (model, target) pairs absent
/// from the input simply produce no bar.
pub fn layout_subplot(
    rows: &[&MetricRow],
    metric: &str,
    scale: f64,
    decimals: usize,
) -> SubplotLayout {
    let values: HashMap<(&str, &str), f64> = rows
        .iter()
        .filter_map(|row| {
            row.metric(metric)
                .map(|v| ((row.model.as_str(), row.target.as_str()), v * scale))
        })
        .collect();

    let max_value = values.values().cloned().fold(0.0, f64::max);
    let min_value = values.values().cloned().fold(0.0, f64::min);
    let offset = annotation_offset(max_value);

    let mut bars = Vec::new();
    for (model_idx, model) in MODEL_ORDER.iter().enumerate() {
        for (target_idx, target) in TARGET_ORDER.iter().enumerate() {
            let value = match values.get(&(*model, *target)) {
                Some(v) => *v,
                None => continue,
            };
            let center = target_idx as f64 + bar_offset(model_idx, MODEL_ORDER.len());
            bars.push(Bar {
                model_idx,
                x0: center - BAR_WIDTH / 2.0,
                x1: center + BAR_WIDTH / 2.0,
                value,
                annotation: format_value(value, decimals),
                annotation_y: value + offset,
            });
        }
    }

    SubplotLayout {
        metric: metric.to_string(),
        bars,
        max_value,
        min_value,
    }
}

/// Layouts for all three subplots, in `METRICS` order.
pub fn layout_chart(rows: &[MetricRow], options: &ChartOptions) -> Vec<SubplotLayout> {
    let rows = known_rows(rows);
    METRICS
        .iter()
        .map(|metric| layout_subplot(&rows, metric, options.scale, options.decimals))
        .collect()
}

/// Y-axis label for a metric, reflecting the display scale.
fn y_label(metric: &str, scale: f64) -> String {
    if scale != 1.0 {
        format!("{} (x{})", metric, scale as i64)
    } else {
        metric.to_string()
    }
}

/// Render the comparison chart to `output`.
///
/// The parent directory is created if missing. Figure dimensions are
/// 18in x 5in at the configured dpi.
pub fn render(rows: &[MetricRow], output: &Path, options: &ChartOptions) -> Result<()> {
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
    }

    let layouts = layout_chart(rows, options);
    let width = 18 * options.dpi;
    let height = 5 * options.dpi;

    let root = BitMapBackend::new(output, (width, height)).into_drawing_area();
    root.fill(&WHITE)
        .with_context(|| format!("Failed to draw to {}", output.display()))?;

    let titled = root.titled("Model Performance Comparison", ("sans-serif", 32))?;
    let areas = titled.split_evenly((1, METRICS.len()));

    for (subplot_idx, (area, layout)) in areas.iter().zip(&layouts).enumerate() {
        // Headroom above the tallest bar so annotations stay inside.
        let y_max = if layout.max_value > 0.0 {
            layout.max_value * 1.15
        } else {
            1.0
        };
        let y_min = if layout.min_value < 0.0 {
            layout.min_value * 1.15
        } else {
            0.0
        };
        let x_max = TARGET_ORDER.len() as f64 - 0.5;

        let mut chart = ChartBuilder::on(area)
            .caption(format!("{} Comparison", layout.metric), ("sans-serif", 24))
            .margin(10)
            .x_label_area_size(50)
            .y_label_area_size(70)
            .build_cartesian_2d(-0.5f64..x_max, y_min..y_max)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(TARGET_ORDER.len())
            .x_label_formatter(&|x| {
                let idx = x.round();
                if (x - idx).abs() < 0.01 && idx >= 0.0 && (idx as usize) < TARGET_ORDER.len() {
                    TARGET_ORDER[idx as usize].to_string()
                } else {
                    String::new()
                }
            })
            .x_desc("Target Variables")
            .y_desc(y_label(&layout.metric, options.scale))
            .light_line_style(RGBColor(220, 220, 220))
            .draw()?;

        for (model_idx, model) in MODEL_ORDER.iter().enumerate() {
            let color = MODEL_COLORS[model_idx];
            let bars: Vec<&Bar> = layout
                .bars
                .iter()
                .filter(|b| b.model_idx == model_idx)
                .collect();

            let series = chart.draw_series(bars.iter().map(|bar| {
                Rectangle::new([(bar.x0, 0.0), (bar.x1, bar.value)], color.filled())
            }))?;

            // Legend only on the first subplot.
            if subplot_idx == 0 {
                series.label(*model).legend(move |(x, y)| {
                    Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled())
                });
            }
        }

        let annotation_style = TextStyle::from(("sans-serif", 14))
            .pos(Pos::new(HPos::Center, VPos::Bottom));
        chart.draw_series(layout.bars.iter().map(|bar| {
            Text::new(
                bar.annotation.clone(),
                (bar.center(), bar.annotation_y),
                annotation_style.clone(),
            )
        }))?;

        if subplot_idx == 0 {
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperRight)
                .border_style(BLACK)
                .background_style(WHITE.mix(0.8))
                .draw()?;
        }
    }

    root.present()
        .with_context(|| format!("Failed to save chart to {}", output.display()))?;
    info!("Chart saved to {}", output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(model: &str, target: &str, r2: f64, mae: f64, rmse: f64) -> MetricRow {
        MetricRow {
            model: model.to_string(),
            target: target.to_string(),
            r2,
            mae,
            rmse,
        }
    }

    /// 3 models x 4 targets with distinct values per metric.
    fn full_table() -> Vec<MetricRow> {
        let mut rows = Vec::new();
        for (i, model) in MODEL_ORDER.iter().enumerate() {
            for (j, target) in TARGET_ORDER.iter().enumerate() {
                let base = (i * 4 + j) as f64;
                rows.push(row(
                    model,
                    target,
                    0.80 + base * 0.01,
                    0.010 + base * 0.001,
                    0.020 + base * 0.001,
                ));
            }
        }
        rows
    }

    #[test]
    fn test_bar_offset_symmetric() {
        // Three models: offsets -w, 0, +w around the tick.
        assert_eq!(bar_offset(0, 3), -BAR_WIDTH);
        assert_eq!(bar_offset(1, 3), 0.0);
        assert_eq!(bar_offset(2, 3), BAR_WIDTH);
        // Two models: half a width either side.
        assert_eq!(bar_offset(0, 2), -BAR_WIDTH / 2.0);
        assert_eq!(bar_offset(1, 2), BAR_WIDTH / 2.0);
    }

    #[test]
    fn test_bars_do_not_overlap_within_group() {
        let rows = full_table();
        let refs: Vec<&MetricRow> = rows.iter().collect();
        let layout = layout_subplot(&refs, "RMSE", 1.0, 4);

        // Bars for target 0, sorted by left edge.
        let mut group: Vec<&Bar> = layout.bars.iter().filter(|b| b.x1 < 0.5).collect();
        group.sort_by(|a, b| a.x0.partial_cmp(&b.x0).unwrap());
        assert_eq!(group.len(), 3);
        for pair in group.windows(2) {
            assert!(pair[0].x1 <= pair[1].x0 + 1e-9);
        }
    }

    #[test]
    fn test_chart_has_three_subplots_of_twelve_bars() {
        let rows = full_table();
        let layouts = layout_chart(&rows, &ChartOptions::default());
        assert_eq!(layouts.len(), 3);
        for layout in &layouts {
            assert_eq!(layout.bars.len(), 12);
        }
        assert_eq!(layouts[0].metric, "RMSE");
        assert_eq!(layouts[1].metric, "MAE");
        assert_eq!(layouts[2].metric, "R2");
    }

    #[test]
    fn test_max_bar_annotation_matches_formatting() {
        let rows = full_table();
        let options = ChartOptions::default();
        let layouts = layout_chart(&rows, &options);

        for layout in &layouts {
            let max_bar = layout
                .bars
                .iter()
                .max_by(|a, b| a.value.partial_cmp(&b.value).unwrap())
                .unwrap();
            assert_eq!(max_bar.value, layout.max_value);
            assert_eq!(max_bar.annotation, format_value(layout.max_value, 4));
        }
    }

    #[test]
    fn test_scale_applies_to_values_and_annotations() {
        let rows = vec![row("XGBoost", "CETR", 0.9, 0.001, 0.002)];
        let refs: Vec<&MetricRow> = rows.iter().collect();
        let layout = layout_subplot(&refs, "MAE", 1000.0, 2);

        assert_eq!(layout.bars.len(), 1);
        assert_eq!(layout.bars[0].value, 1.0);
        assert_eq!(layout.bars[0].annotation, "1.00");
    }

    #[test]
    fn test_annotation_offset_epsilon_when_all_zero() {
        assert_eq!(annotation_offset(0.0), 0.001);
        assert_eq!(annotation_offset(2.0), 0.02);
    }

    #[test]
    fn test_unknown_categories_are_dropped() {
        let mut rows = full_table();
        rows.push(row("LightGBM", "CETR", 0.9, 0.01, 0.02));
        rows.push(row("XGBoost", "EXTRA", 0.9, 0.01, 0.02));

        let kept = known_rows(&rows);
        assert_eq!(kept.len(), 12);

        let layouts = layout_chart(&rows, &ChartOptions::default());
        assert!(layouts.iter().all(|l| l.bars.len() == 12));
    }

    #[test]
    fn test_missing_pairs_produce_no_bars() {
        let rows = vec![
            row("XGBoost", "CETR", 0.9, 0.01, 0.02),
            row("CatBoost", "GETR", 0.8, 0.02, 0.03),
        ];
        let layouts = layout_chart(&rows, &ChartOptions::default());
        assert!(layouts.iter().all(|l| l.bars.len() == 2));
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(0.123456, 4), "0.1235");
        assert_eq!(format_value(1.0, 2), "1.00");
        assert_eq!(format_value(0.0, 4), "0.0000");
    }

    #[test]
    fn test_y_label_reflects_scale() {
        assert_eq!(y_label("RMSE", 1.0), "RMSE");
        assert_eq!(y_label("RMSE", 1000.0), "RMSE (x1000)");
    }
}
