//! Sales report assembly.
//!
//! A report is built from three sequential queries against the store:
//!
//! 1. the newest orders (sorted by `_id` descending, limited),
//! 2. every employee account,
//! 3. a group/sum aggregation over all orders for the totals.
//!
//! Documents that fail to decode are skipped individually. A failed query,
//! or a totals aggregation with no rows, fails the whole report, discarding
//! whatever the earlier steps gathered. All three queries share one deadline.

mod body;
mod error;
mod model;


use std::time::Duration;

use mongodb::bson::{from_document, Document};
use serde::de::DeserializeOwned;
use tracing::{debug, error};

use crate::config::ReportConfig;
use crate::interfaces::{FindQuery, GroupSumPipeline, ReportStore};
use crate::storage::{ACCOUNTS_COLLECTION, ORDERS_COLLECTION};

pub use body::{ReportBody, EMPTY_REPORT_BODY};
pub use error::ReportError;
pub use model::{
    CoffeeOrder, EmployeeAccount, Report, SalesTotals, TOTAL_REVENUE_FIELD, TOTAL_SALES_FIELD,
};

/// Field orders are sorted by to find the newest.
pub const INSERTION_ORDER_FIELD: &str = "_id";

/// Per-request report parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOptions {
    /// How many of the newest orders to list.
    pub recent_orders: i64,
    /// Deadline covering every query of the report.
    pub timeout: Duration,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self::from(&ReportConfig::default())
    }
}

impl From<&ReportConfig> for ReportOptions {
    fn from(config: &ReportConfig) -> Self {
        Self {
            recent_orders: config.recent_orders,
            timeout: config.timeout(),
        }
    }
}

/// The totals aggregation: quantity and amount summed over every order.
pub fn sales_totals_pipeline() -> GroupSumPipeline {
    GroupSumPipeline::new()
        .sum(TOTAL_SALES_FIELD, "coffeeqty")
        .sum(TOTAL_REVENUE_FIELD, "amount")
}

/// Build a report from `store`.
///
/// `None` means no store is configured; that is reported as
/// [`ReportError::StoreUnavailable`] rather than a panic. When
/// `options.timeout` elapses the in-flight query is dropped and the report
/// fails with [`ReportError::Timeout`].
pub async fn build_report(
    store: Option<&dyn ReportStore>,
    options: ReportOptions,
) -> Result<Report, ReportError> {
    let result = match store {
        Some(store) => tokio::time::timeout(options.timeout, assemble(store, options))
            .await
            .unwrap_or(Err(ReportError::Timeout(options.timeout))),
        None => Err(ReportError::StoreUnavailable),
    };

    if let Err(e) = &result {
        error!(error = %e, "Error querying database");
    }

    result
}

async fn assemble(store: &dyn ReportStore, options: ReportOptions) -> Result<Report, ReportError> {
    let orders = store
        .find(
            ORDERS_COLLECTION,
            FindQuery::latest(INSERTION_ORDER_FIELD, options.recent_orders),
        )
        .await
        .map_err(ReportError::query(ORDERS_COLLECTION))?;
    let recent_sales = decode_all::<CoffeeOrder>(ORDERS_COLLECTION, orders);

    let accounts = store
        .find(ACCOUNTS_COLLECTION, FindQuery::all())
        .await
        .map_err(ReportError::query(ACCOUNTS_COLLECTION))?;
    let employee_accounts = decode_all::<EmployeeAccount>(ACCOUNTS_COLLECTION, accounts);

    let totals_row = store
        .aggregate(ORDERS_COLLECTION, &sales_totals_pipeline())
        .await
        .map_err(ReportError::query(ORDERS_COLLECTION))?
        .ok_or(ReportError::EmptyAggregate {
            collection: ORDERS_COLLECTION,
        })?;

    // A present but unreadable totals row keeps the listings with zero totals.
    let totals = SalesTotals::from_document(&totals_row).unwrap_or_else(|| {
        error!(row = %totals_row, "Error decoding sales totals");
        SalesTotals::default()
    });

    Ok(Report {
        total_sales: totals.total_sales,
        total_revenue: totals.total_revenue,
        recent_sales,
        employee_accounts,
    })
}

/// Decode every document, skipping (not failing on) the ones that don't fit.
fn decode_all<T: DeserializeOwned>(collection: &str, documents: Vec<Document>) -> Vec<T> {
    documents
        .into_iter()
        .filter_map(|document| match from_document::<T>(document) {
            Ok(record) => Some(record),
            Err(e) => {
                debug!(collection, error = %e, "Skipping undecodable document");
                None
            }
        })
        .collect()
}
