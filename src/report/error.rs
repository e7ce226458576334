//! Report assembly errors.

use std::time::Duration;

use crate::interfaces::StorageError;

/// Why a report could not be assembled.
///
/// Every variant renders as the empty sentinel body; the distinction exists
/// for logs and for callers that want to map failures differently.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("No document store connection")]
    StoreUnavailable,

    #[error("Error querying {collection}: {source}")]
    Query {
        collection: &'static str,
        #[source]
        source: StorageError,
    },

    #[error("Aggregation over {collection} returned no rows")]
    EmptyAggregate { collection: &'static str },

    #[error("Report not assembled within {0:?}")]
    Timeout(Duration),
}

impl ReportError {
    pub(crate) fn query(collection: &'static str) -> impl FnOnce(StorageError) -> Self {
        move |source| ReportError::Query { collection, source }
    }
}
