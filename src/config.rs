//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.mlreport.toml` files. The config file is the only place the
//! model spec list can be customized; everything else can also be set
//! on the command line, and CLI values take precedence.

use crate::models::{default_model_specs, ModelSpec};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default config file name, looked up in the current directory.
pub const CONFIG_FILE: &str = ".mlreport.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Aggregator settings.
    #[serde(default)]
    pub aggregate: AggregateConfig,

    /// Models to collect metrics from, in output order.
    #[serde(default = "default_model_specs")]
    pub models: Vec<ModelSpec>,

    /// Chart settings.
    #[serde(default)]
    pub chart: ChartConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            aggregate: AggregateConfig::default(),
            models: default_model_specs(),
            chart: ChartConfig::default(),
        }
    }
}

/// Aggregator settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateConfig {
    /// Decimal digits metric values are rounded to.
    #[serde(default = "default_round_digits")]
    pub round_digits: usize,

    /// Output CSV path.
    #[serde(default = "default_table_path")]
    pub output: String,

    /// Directory containing the per-model folders.
    #[serde(default = "default_base_dir")]
    pub base_dir: String,
}

impl Default for AggregateConfig {
    fn default() -> Self {
        Self {
            round_digits: default_round_digits(),
            output: default_table_path(),
            base_dir: default_base_dir(),
        }
    }
}

fn default_round_digits() -> usize {
    6
}

fn default_table_path() -> String {
    "ML_Overall_Result.csv".to_string()
}

fn default_base_dir() -> String {
    "..".to_string()
}

/// Chart settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartConfig {
    /// Input CSV path (the aggregator's output).
    #[serde(default = "default_table_path")]
    pub input: String,

    /// Output image path.
    #[serde(default = "default_chart_path")]
    pub output: String,

    /// Output resolution in dots per inch.
    #[serde(default = "default_dpi")]
    pub dpi: u32,

    /// Display scale multiplier for metric values.
    #[serde(default = "default_scale")]
    pub scale: f64,

    /// Decimal places in bar annotations.
    #[serde(default = "default_decimals")]
    pub decimals: usize,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            input: default_table_path(),
            output: default_chart_path(),
            dpi: default_dpi(),
            scale: default_scale(),
            decimals: default_decimals(),
        }
    }
}

fn default_chart_path() -> String {
    "ml_metrics_comparison.png".to_string()
}

fn default_dpi() -> u32 {
    150
}

fn default_scale() -> f64 {
    1.0
}

fn default_decimals() -> usize {
    4
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with aggregator CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    pub fn merge_with_aggregate_args(&mut self, args: &crate::cli::AggregateArgs) {
        if let Some(round) = args.round {
            self.aggregate.round_digits = round;
        }
        if let Some(ref output) = args.output {
            self.aggregate.output = output.display().to_string();
        }
        if let Some(ref base_dir) = args.base_dir {
            self.aggregate.base_dir = base_dir.display().to_string();
        }
    }

    /// Merge this configuration with chart CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    pub fn merge_with_plot_args(&mut self, args: &crate::cli::PlotArgs) {
        if let Some(ref input) = args.input {
            self.chart.input = input.display().to_string();
        }
        if let Some(ref output) = args.output {
            self.chart.output = output.display().to_string();
        }
        if let Some(dpi) = args.dpi {
            self.chart.dpi = dpi;
        }
        if let Some(scale) = args.scale {
            self.chart.scale = scale;
        }
        if let Some(decimals) = args.decimals {
            self.chart.decimals = decimals;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.aggregate.round_digits, 6);
        assert_eq!(config.aggregate.output, "ML_Overall_Result.csv");
        assert_eq!(config.models.len(), 3);
        assert_eq!(config.chart.dpi, 150);
        assert_eq!(config.chart.scale, 1.0);
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[aggregate]
round_digits = 4
output = "results/overall.csv"

[[models]]
name = "XGBoost"
folder = "ML_XGBoost"

[[models]]
name = "LightGBM"
folder = "ML_LightGBM"
pattern = "metrics_eval"

[chart]
dpi = 300
scale = 1000.0
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.aggregate.round_digits, 4);
        assert_eq!(config.aggregate.output, "results/overall.csv");
        assert_eq!(config.models.len(), 2);
        assert_eq!(config.models[0].pattern, "metrics_seen");
        assert_eq!(config.models[1].pattern, "metrics_eval");
        assert_eq!(config.chart.dpi, 300);
        assert_eq!(config.chart.scale, 1000.0);
        // Unset sections keep their defaults.
        assert_eq!(config.chart.decimals, 4);
        assert_eq!(config.aggregate.base_dir, "..");
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.models, default_model_specs());
        assert_eq!(config.chart.output, "ml_metrics_comparison.png");
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(!toml_str.is_empty());
        assert!(toml_str.contains("[aggregate]"));
        assert!(toml_str.contains("[[models]]"));
        assert!(toml_str.contains("[chart]"));

        // Round-trips back into the same config.
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.models.len(), 3);
    }
}
