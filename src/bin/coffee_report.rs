//! coffee-report: sales report service
//!
//! Serves totals, the newest orders and the employee accounts stored in
//! MongoDB as a single JSON document.
//!
//! ## Architecture
//! ```text
//! [client] --GET /report--> [coffee-report] --find/aggregate--> [MongoDB]
//!                                                                 orders
//!                                                                 employeeAccounts
//! ```
//!
//! ## Configuration
//! - `--config` / COFFEE_REPORT_CONFIG: YAML file (optional)
//! - COFFEE_REPORT__<SECTION>__<KEY>: per-setting overrides
//! - `--verbose`, `--addr`, `--mongo`, `--tls`, `--cert`, `--certkey`
//! - COFFEE_REPORT_LOG: tracing filter (default: info, debug with --verbose)

use clap::Parser;
use tracing::{error, info};

use coffee_report::config::CliArgs;
use coffee_report::handlers::report::{serve, ReportState};
use coffee_report::report::ReportOptions;
use coffee_report::storage::init_storage;
use coffee_report::utils::bootstrap::init_tracing;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();
    let config = args.load_config();

    init_tracing(
        config
            .as_ref()
            .map(|c| c.server.verbose)
            .unwrap_or(args.verbose),
    );

    let config = config.map_err(|e| {
        error!(error = %e, "Failed to load configuration");
        e
    })?;

    let store = init_storage(&config.storage.mongodb).await;
    let state = ReportState::new(store, ReportOptions::from(&config.report));

    serve(&config.server, state).await.map_err(|e| {
        error!(error = %e, "HTTP server shutdown");
        e
    })?;

    info!("coffee-report stopped");
    Ok(())
}
