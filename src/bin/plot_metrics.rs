//! plot-metrics - render the aggregated metrics table as a bar chart
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (missing input, invalid schema, render failure)

use anyhow::{Context, Result};
use ml_metrics_report::chart::{render, ChartOptions};
use ml_metrics_report::cli::PlotArgs;
use ml_metrics_report::config::{Config, CONFIG_FILE};
use ml_metrics_report::table::read_table;
use std::path::PathBuf;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() {
    let args = PlotArgs::parse_args();

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    init_logging(&args);

    match run_plot(args) {
        Ok(()) => {}
        Err(e) => {
            error!("Chart rendering failed: {}", e);
            eprintln!("\n❌ Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &PlotArgs) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level())
        .with_target(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Run the chart rendering workflow.
fn run_plot(args: PlotArgs) -> Result<()> {
    let mut config = load_config(&args)?;
    config.merge_with_plot_args(&args);
    debug!("Effective config: {:?}", config.chart);

    let input = PathBuf::from(&config.chart.input);
    let output = PathBuf::from(&config.chart.output);

    let rows = read_table(&input)
        .with_context(|| format!("Failed to load table from {}", input.display()))?;
    info!("Loaded {} rows from {}", rows.len(), input.display());

    let options = ChartOptions {
        dpi: config.chart.dpi,
        scale: config.chart.scale,
        decimals: config.chart.decimals,
    };
    render(&rows, &output, &options)?;

    println!("✅ Saved {}", output.display());
    Ok(())
}

/// Load configuration from file or use defaults.
fn load_config(args: &PlotArgs) -> Result<Config> {
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", CONFIG_FILE);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
