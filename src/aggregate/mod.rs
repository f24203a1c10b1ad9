//! Metrics aggregation.
//!
//! Best-effort merge of per-model metrics files into one table: locate
//! each model's file, validate its columns, tag rows with the model
//! name, round the metric values, and sort by the fixed category
//! orders. A model that cannot be loaded is skipped with a log
//! message; the run only fails when no model produced any rows.

use crate::locator::MetricsLocator;
use crate::models::{model_rank, round_to, target_rank, MetricRow, ModelSpec};
use crate::table::load_model_metrics;
use anyhow::{bail, Result};
use std::path::Path;
use tracing::{error, info, warn};

/// Aggregate all configured models under `base_dir` into one sorted table.
pub fn aggregate(base_dir: &Path, specs: &[ModelSpec], round_digits: usize) -> Result<Vec<MetricRow>> {
    let locator = MetricsLocator::new(base_dir.to_path_buf());
    let mut rows: Vec<MetricRow> = Vec::new();

    for spec in specs {
        let path = match locator.locate(spec)? {
            Some(path) => path,
            None => {
                warn!("{}: no metrics CSV found, skipping", spec.name);
                continue;
            }
        };

        let metrics = match load_model_metrics(&path) {
            Ok(metrics) => metrics,
            Err(e) => {
                error!("{}: failed to load metrics: {}", spec.name, e);
                continue;
            }
        };

        info!(
            "{}: loaded '{}' ({} rows)",
            spec.name,
            path.file_name().and_then(|n| n.to_str()).unwrap_or("?"),
            metrics.len()
        );

        rows.extend(metrics.into_iter().map(|m| MetricRow {
            model: spec.name.clone(),
            target: m.target,
            r2: round_to(m.r2, round_digits),
            mae: round_to(m.mae, round_digits),
            rmse: round_to(m.rmse, round_digits),
        }));
    }

    if rows.is_empty() {
        bail!("No metrics data collected from any model");
    }

    sort_rows(&mut rows, specs);
    Ok(rows)
}

/// Sort rows by spec order, then by the fixed target order.
///
/// Models or targets outside the known orders rank after all known
/// values and keep their relative input order (stable sort).
pub fn sort_rows(rows: &mut [MetricRow], specs: &[ModelSpec]) {
    rows.sort_by_key(|row| (model_rank(specs, &row.model), target_rank(&row.target)));
}
