//! Command-line interface argument parsing.
//!
//! This module handles CLI argument parsing for both binaries using
//! clap, including validation and verbosity handling. Flags left unset
//! fall back to the config file, which falls back to built-in defaults,
//! so every argument that the config file also covers is an `Option`.

use clap::Parser;
use std::path::PathBuf;

/// Aggregate per-model metrics CSV files into one summary table
///
/// Scans the configured model directories for the newest metrics CSV,
/// merges them into a single table sorted by model and target, and
/// writes it with the fixed column order model,target,R2,MAE,RMSE.
///
/// Examples:
///   aggregate-metrics
///   aggregate-metrics --round 4 --output results/ML_Overall_Result.csv
///   aggregate-metrics --base-dir /data/runs --verbose
///   aggregate-metrics --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct AggregateArgs {
    /// Decimal digits to round metric values to (default 6)
    #[arg(long, value_name = "DIGITS")]
    pub round: Option<usize>,

    /// Output CSV path (default ML_Overall_Result.csv)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Directory containing the per-model folders (default ..)
    #[arg(long, value_name = "DIR", env = "MLREPORT_BASE_DIR")]
    pub base_dir: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .mlreport.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (warnings and errors only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .mlreport.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

impl AggregateArgs {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(round) = self.round {
            if round > 15 {
                return Err("Rounding digits must be at most 15".to_string());
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        log_level(self.verbose, self.quiet)
    }
}

/// Render the aggregated metrics table as a grouped-bar comparison chart
///
/// Reads the aggregator's CSV output and draws three side-by-side bar
/// charts (RMSE, MAE, R2) across the four prediction targets, with the
/// value annotated above each bar.
///
/// Examples:
///   plot-metrics
///   plot-metrics --input results/ML_Overall_Result.csv --dpi 300
///   plot-metrics --scale 1000 --decimals 2
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct PlotArgs {
    /// Input CSV path (default ML_Overall_Result.csv)
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Output image path (default ml_metrics_comparison.png)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output resolution in dots per inch (default 150)
    #[arg(long, value_name = "DPI")]
    pub dpi: Option<u32>,

    /// Multiply values for display readability, e.g. 1000 (default 1)
    #[arg(long, value_name = "FACTOR")]
    pub scale: Option<f64>,

    /// Decimal places in bar annotations (default 4)
    #[arg(long, value_name = "COUNT")]
    pub decimals: Option<usize>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .mlreport.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (warnings and errors only)
    #[arg(short, long)]
    pub quiet: bool,
}

impl PlotArgs {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(dpi) = self.dpi {
            if dpi == 0 {
                return Err("DPI must be at least 1".to_string());
            }
        }

        if let Some(scale) = self.scale {
            if !scale.is_finite() || scale <= 0.0 {
                return Err("Scale must be a positive number".to_string());
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        log_level(self.verbose, self.quiet)
    }
}

fn log_level(verbose: bool, quiet: bool) -> tracing::Level {
    if quiet {
        tracing::Level::WARN
    } else if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_aggregate_args() -> AggregateArgs {
        AggregateArgs {
            round: None,
            output: None,
            base_dir: None,
            config: None,
            verbose: false,
            quiet: false,
            init_config: false,
        }
    }

    fn make_plot_args() -> PlotArgs {
        PlotArgs {
            input: None,
            output: None,
            dpi: None,
            scale: None,
            decimals: None,
            config: None,
            verbose: false,
            quiet: false,
        }
    }

    #[test]
    fn test_aggregate_defaults_are_valid() {
        assert!(make_aggregate_args().validate().is_ok());
    }

    #[test]
    fn test_validation_conflicting_verbosity() {
        let mut args = make_aggregate_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_round_too_large() {
        let mut args = make_aggregate_args();
        args.round = Some(16);
        assert!(args.validate().is_err());
        args.round = Some(15);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_plot_dpi_and_scale() {
        let mut args = make_plot_args();
        args.dpi = Some(0);
        assert!(args.validate().is_err());

        args.dpi = Some(300);
        args.scale = Some(0.0);
        assert!(args.validate().is_err());

        args.scale = Some(1000.0);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_plot_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::WARN);
    }
}
