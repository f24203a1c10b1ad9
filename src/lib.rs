//! ml-metrics-report - per-model metrics aggregation and charting
//!
//! Two binaries built on this library:
//!
//! - `aggregate-metrics` collects each training pipeline's metrics CSV
//!   (located by newest mtime), merges them into one table sorted by
//!   model and target, and writes `ML_Overall_Result.csv`.
//! - `plot-metrics` reads that table and renders a three-panel grouped
//!   bar chart (RMSE, MAE, R2) across the prediction targets.
//!
//! The two stages share no state; the CSV file is the only hand-off.

pub mod aggregate;
pub mod chart;
pub mod cli;
pub mod config;
pub mod locator;
pub mod models;
pub mod table;
