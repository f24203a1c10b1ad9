//! Data models for the metrics pipeline.
//!
//! This module contains the core data structures shared by the
//! aggregator and the chart renderer: model specifications, metric
//! rows, and the fixed category orders used for sorting and layout.

use serde::{Deserialize, Serialize};

/// Fixed prediction-target order used for sorting and the chart x-axis.
pub const TARGET_ORDER: [&str; 4] = ["CETR", "GETR", "TSTA", "TSDA"];

/// Fixed model order used for chart grouping and coloring.
pub const MODEL_ORDER: [&str; 3] = ["XGBoost", "CatBoost", "RandomForest"];

/// Columns every per-model metrics file must contain.
pub const REQUIRED_COLUMNS: [&str; 4] = ["target", "R2", "MAE", "RMSE"];

/// Column order of the aggregated table.
pub const OUTPUT_COLUMNS: [&str; 5] = ["model", "target", "R2", "MAE", "RMSE"];

/// Where to find one model's metrics file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSpec {
    /// Model name written to the `model` column of the output.
    pub name: String,
    /// Directory name under the base directory.
    pub folder: String,
    /// Substring the metrics file name must contain.
    #[serde(default = "default_pattern")]
    pub pattern: String,
}

fn default_pattern() -> String {
    "metrics_seen".to_string()
}

impl ModelSpec {
    /// Creates a spec with the default file name pattern.
    pub fn new(name: &str, folder: &str) -> Self {
        Self {
            name: name.to_string(),
            folder: folder.to_string(),
            pattern: default_pattern(),
        }
    }
}

/// The default three training pipelines the aggregator collects from.
pub fn default_model_specs() -> Vec<ModelSpec> {
    vec![
        ModelSpec::new("XGBoost", "ML_XGBoost"),
        ModelSpec::new("CatBoost", "ML_CatBoost"),
        ModelSpec::new("RandomForest", "ML_Random_Forest"),
    ]
}

/// One row of the aggregated table: metrics for a (model, target) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRow {
    /// Model name, from the spec that sourced the row.
    pub model: String,
    /// Prediction target (CETR, GETR, TSTA, TSDA).
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

impl MetricRow {
    /// Returns the named metric value (column name as in the CSV header).
    pub fn metric(&self, name: &str) -> Option<f64> {
        match name {
            "R2" => Some(self.r2),
            "MAE" => Some(self.mae),
            "RMSE" => Some(self.rmse),
            _ => None,
        }
    }
}

/// Rank of a target in the fixed order. Unknown targets rank last.
pub fn target_rank(target: &str) -> usize {
    TARGET_ORDER
        .iter()
        .position(|t| *t == target)
        .unwrap_or(usize::MAX)
}

/// Rank of a model name in the given spec order. Unknown models rank last.
pub fn model_rank(specs: &[ModelSpec], model: &str) -> usize {
    specs
        .iter()
        .position(|s| s.name == model)
        .unwrap_or(usize::MAX)
}

/// Rounds a value to `digits` decimal places.
pub fn round_to(value: f64, digits: usize) -> f64 {
    let factor = 10f64.powi(digits as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_rank_fixed_order() {
        assert_eq!(target_rank("CETR"), 0);
        assert_eq!(target_rank("GETR"), 1);
        assert_eq!(target_rank("TSTA"), 2);
        assert_eq!(target_rank("TSDA"), 3);
    }

    #[test]
    fn test_target_rank_unknown_sorts_last() {
        assert_eq!(target_rank("OTHER"), usize::MAX);
        assert!(target_rank("OTHER") > target_rank("TSDA"));
    }

    #[test]
    fn test_model_rank_follows_spec_order() {
        let specs = default_model_specs();
        assert_eq!(model_rank(&specs, "XGBoost"), 0);
        assert_eq!(model_rank(&specs, "CatBoost"), 1);
        assert_eq!(model_rank(&specs, "RandomForest"), 2);
        assert_eq!(model_rank(&specs, "LightGBM"), usize::MAX);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(0.1234567, 6), 0.123457);
        assert_eq!(round_to(1.5, 0), 2.0);
        assert_eq!(round_to(0.1, 6), 0.1);
        // Error bound: at most half of the last kept digit.
        let v = 0.987654321;
        assert!((round_to(v, 4) - v).abs() <= 0.5 * 1e-4);
    }

    #[test]
    fn test_metric_lookup() {
        let row = MetricRow {
            model: "XGBoost".to_string(),
            target: "CETR".to_string(),
            r2: 0.9,
            mae: 0.01,
            rmse: 0.02,
        };
        assert_eq!(row.metric("R2"), Some(0.9));
        assert_eq!(row.metric("MAE"), Some(0.01));
        assert_eq!(row.metric("RMSE"), Some(0.02));
        assert_eq!(row.metric("MAPE"), None);
    }

    #[test]
    fn test_default_specs_pattern() {
        let specs = default_model_specs();
        assert_eq!(specs.len(), 3);
        assert!(specs.iter().all(|s| s.pattern == "metrics_seen"));
        assert_eq!(specs[2].folder, "ML_Random_Forest");
    }
}
