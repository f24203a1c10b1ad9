//! aggregate-metrics - merge per-model metrics CSVs into one table
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (no usable model data, unwritable output, etc.)

use anyhow::{Context, Result};
use ml_metrics_report::aggregate::aggregate;
use ml_metrics_report::cli::AggregateArgs;
use ml_metrics_report::config::{Config, CONFIG_FILE};
use ml_metrics_report::table::write_table;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() {
    let args = AggregateArgs::parse_args();

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        match handle_init_config() {
            Ok(()) => std::process::exit(0),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
    }

    init_logging(&args);

    match run_aggregate(args) {
        Ok(()) => {}
        Err(e) => {
            error!("Aggregation failed: {}", e);
            eprintln!("\n❌ Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .mlreport.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE);

    if path.exists() {
        anyhow::bail!("{} already exists. Remove it first or edit it manually.", CONFIG_FILE);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE);
    println!("   Edit it to customize the model list, rounding, and paths.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &AggregateArgs) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level())
        .with_target(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Run the aggregation workflow.
fn run_aggregate(args: AggregateArgs) -> Result<()> {
    let mut config = load_config(&args)?;
    config.merge_with_aggregate_args(&args);
    debug!("Effective config: {:?}", config.aggregate);

    let base_dir = PathBuf::from(&config.aggregate.base_dir);
    let output = PathBuf::from(&config.aggregate.output);

    let rows = aggregate(&base_dir, &config.models, config.aggregate.round_digits)?;
    write_table(&output, &rows)?;

    info!("Result saved: {} ({} rows)", output.display(), rows.len());
    println!("✅ Saved {} ({} rows)", output.display(), rows.len());
    Ok(())
}

/// Load configuration from file or use defaults.
fn load_config(args: &AggregateArgs) -> Result<Config> {
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
