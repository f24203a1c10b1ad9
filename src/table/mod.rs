//! CSV reading and writing for metric tables.
//!
//! Two file shapes pass through here: the per-model metrics files
//! produced by the training pipelines (columns `target,R2,MAE,RMSE`,
//! extras ignored) and the aggregated table handed from the aggregator
//! to the chart renderer (header exactly `model,target,R2,MAE,RMSE`).

use crate::models::{MetricRow, OUTPUT_COLUMNS, REQUIRED_COLUMNS};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors produced while reading metric CSV files.
#[derive(Debug, Error)]
pub enum TableError {
    /// The file header is missing one or more required columns.
    #[error("{}: missing required columns: {}", path.display(), columns.join(", "))]
    MissingColumns {
        /// File that failed validation.
        path: PathBuf,
        /// Names of the absent columns.
        columns: Vec<String>,
    },

    /// The file could not be read or a record could not be parsed.
    #[error("failed to read metrics CSV")]
    Csv(#[from] csv::Error),
}

/// Metrics for one target as read from a per-model file, before the
/// model name is attached.
#[derive(Debug, Clone, Deserialize)]
pub struct RawMetrics {
    /// Prediction target name.
    pub target: String,
    /// Coefficient of determination.
    #[serde(rename = "R2")]
    pub r2: f64,
    /// Mean absolute error.
    #[serde(rename = "MAE")]
    pub mae: f64,
    /// Root mean squared error.
    #[serde(rename = "RMSE")]
    pub rmse: f64,
}

/// Validate that `headers` contains every column in `required`.
fn missing_columns(headers: &csv::StringRecord, required: &[&str]) -> Vec<String> {
    required
        .iter()
        .filter(|col| !headers.iter().any(|h| h == **col))
        .map(|col| col.to_string())
        .collect()
}

/// Load one model's metrics file.
///
/// The header must contain {target, R2, MAE, RMSE}; any additional
/// columns are ignored.
pub fn load_model_metrics(path: &Path) -> Result<Vec<RawMetrics>, TableError> {
    let mut reader = csv::Reader::from_path(path)?;

    let missing = missing_columns(reader.headers()?, &REQUIRED_COLUMNS);
    if !missing.is_empty() {
        return Err(TableError::MissingColumns {
            path: path.to_path_buf(),
            columns: missing,
        });
    }

    let mut rows = Vec::new();
    for result in reader.deserialize() {
        rows.push(result?);
    }
    Ok(rows)
}

/// Load an aggregated table, validating the full output schema.
pub fn read_table(path: &Path) -> Result<Vec<MetricRow>, TableError> {
    let mut reader = csv::Reader::from_path(path)?;

    let missing = missing_columns(reader.headers()?, &OUTPUT_COLUMNS);
    if !missing.is_empty() {
        return Err(TableError::MissingColumns {
            path: path.to_path_buf(),
            columns: missing,
        });
    }

    let mut rows = Vec::new();
    for result in reader.deserialize() {
        rows.push(result?);
    }
    Ok(rows)
}

/// Write the aggregated table with the fixed column order.
///
/// Floats are written in their shortest round-trip form, so the
/// trailing-zero behavior of the rounding step is preserved.
pub fn write_table(path: &Path, rows: &[MetricRow]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
    }

    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to open output file: {}", path.display()))?;

    writer.write_record(OUTPUT_COLUMNS)?;
    for row in rows {
        writer.write_record(&[
            row.model.clone(),
            row.target.clone(),
            row.r2.to_string(),
            row.mae.to_string(),
            row.rmse.to_string(),
        ])?;
    }

    writer
        .flush()
        .with_context(|| format!("Failed to write output file: {}", path.display()))?;
    Ok(())
}
