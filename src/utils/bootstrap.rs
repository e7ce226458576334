//! Bootstrap utilities for the coffee-report binary.

use tracing::{debug, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LOG_ENV_VAR;

/// Initialize tracing.
///
/// `COFFEE_REPORT_LOG` wins when set; otherwise the level is `debug` with
/// `verbose` and `info` without.
pub fn init_tracing(verbose: bool) {
    tracing_subscriber::registry()
        .with(default_filter(verbose))
        .with(tracing_subscriber::fmt::layer())
        .init();

    if verbose {
        debug!("Logging level set to debug");
    }
}

fn default_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| {
        EnvFilter::new(if verbose { "debug" } else { "info" })
    })
}

/// Resolves on Ctrl-C.
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
