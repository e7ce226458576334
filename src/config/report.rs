//! Report shape and deadline configuration.

use std::time::Duration;

use serde::Deserialize;

/// Default number of orders listed under `recentsales`.
pub const DEFAULT_RECENT_ORDERS: i64 = 5;

/// Default deadline for all queries of one report, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Report configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Number of most recent orders to include.
    pub recent_orders: i64,
    /// Deadline covering every query of a single report.
    pub timeout_secs: u64,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            recent_orders: DEFAULT_RECENT_ORDERS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ReportConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
