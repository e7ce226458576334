//! Storage implementations.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::config::MongodbConfig;
use crate::interfaces::ReportStore;

pub mod mock;
pub mod mongodb;

pub use mock::MockReportStore;
pub use self::mongodb::MongoReportStore;

pub use crate::interfaces::{Result, StorageError};

/// Collection holding coffee orders.
pub const ORDERS_COLLECTION: &str = "orders";
/// Collection holding employee accounts.
pub const ACCOUNTS_COLLECTION: &str = "employeeAccounts";

/// Initialize the process-wide report store.
///
/// Returns `None` (degraded mode) when no connection string is configured or
/// the client cannot be created. Callers keep serving; every report then
/// renders as empty.
pub async fn init_storage(config: &MongodbConfig) -> Option<Arc<dyn ReportStore>> {
    if config.uri.is_empty() {
        warn!("No MongoDB connection string configured, serving empty reports");
        return None;
    }

    match ::mongodb::Client::with_uri_str(&config.uri).await {
        Ok(client) => {
            info!(uri = %config.uri, database = %config.database, "Created mongodb connection");
            Some(Arc::new(MongoReportStore::new(&client, &config.database)))
        }
        Err(e) => {
            error!(uri = %config.uri, error = %e, "Error creating mongodb connection");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_names() {
        assert_eq!(ORDERS_COLLECTION, "orders");
        assert_eq!(ACCOUNTS_COLLECTION, "employeeAccounts");
    }

    #[tokio::test]
    async fn test_empty_uri_leaves_store_unset() {
        let config = MongodbConfig {
            uri: String::new(),
            ..MongodbConfig::default()
        };
        assert!(init_storage(&config).await.is_none());
    }

    #[tokio::test]
    async fn test_well_formed_uri_creates_store() {
        let config = MongodbConfig {
            uri: "mongodb://127.0.0.1:27017".to_string(),
            database: "coffee-report-test".to_string(),
        };
        assert!(init_storage(&config).await.is_some());
    }

    #[tokio::test]
    async fn test_malformed_uri_leaves_store_unset() {
        let config = MongodbConfig {
            uri: "not-a-mongodb-uri".to_string(),
            ..MongodbConfig::default()
        };
        assert!(init_storage(&config).await.is_none());
    }
}
