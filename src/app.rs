//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - resolves configuration from the environment
//! - installs logging
//! - builds the FRED client and opens the warehouse connection
//! - runs the fetch-and-load routine

use chrono::Local;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::data::FredClient;
use crate::error::AppError;
use crate::warehouse::PostgresWarehouse;

pub mod pipeline;

use pipeline::{LoadOutcome, RunReport};

/// Entry point for the `fred-ingest` binary.
pub fn run() -> Result<(), AppError> {
    let config = AppConfig::from_env()?;
    crate::logging::init(config.log_format);

    let client = FredClient::new(&config.fred);
    let warehouse = PostgresWarehouse::connect(&config.warehouse)?;

    let report = pipeline::run(&client, warehouse, Local::now().naive_local())?;
    log_summary(&report);
    Ok(())
}

fn log_summary(report: &RunReport) {
    if !report.failures.is_empty() {
        let ids: Vec<&str> = report.failures.iter().map(|f| f.indicator_id.as_str()).collect();
        warn!(failed = ids.len(), "Indicators skipped this run: {}", ids.join(", "));
    }

    match report.outcome {
        LoadOutcome::Loaded { rows } => info!(
            rows,
            indicators = report.fetched.len(),
            start = %report.window.start,
            end = %report.window.end,
            "Run complete"
        ),
        LoadOutcome::Skipped => info!("Run complete; nothing loaded"),
    }
}
