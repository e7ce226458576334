//! Report storage interface.
//!
//! The report only needs two capabilities from the document store: fetching a
//! collection (optionally sorted and limited) and running a group/sum
//! aggregation that reduces a collection to a single totals row.

use async_trait::async_trait;
use mongodb::bson::{doc, Document};

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Sort direction for a find query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    /// MongoDB sort direction (`1` / `-1`).
    pub fn direction(self) -> i32 {
        match self {
            SortOrder::Ascending => 1,
            SortOrder::Descending => -1,
        }
    }
}

/// Sort specification: a single field and a direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub field: String,
    pub order: SortOrder,
}

/// Unfiltered find over a collection.
///
/// No filter is ever applied; the report reads whole collections or the
/// newest slice of one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FindQuery {
    /// Optional sort. Without one, documents come back in natural order.
    pub sort: Option<SortKey>,
    /// Maximum number of documents. `None` (or a non-positive value) means all.
    pub limit: Option<i64>,
}

impl FindQuery {
    /// Every document in the collection.
    pub fn all() -> Self {
        Self::default()
    }

    /// The `limit` documents with the highest `field` values, highest first.
    pub fn latest(field: impl Into<String>, limit: i64) -> Self {
        Self {
            sort: Some(SortKey {
                field: field.into(),
                order: SortOrder::Descending,
            }),
            limit: Some(limit),
        }
    }

    /// Sort document in MongoDB form, e.g. `{ "_id": -1 }`.
    pub fn sort_document(&self) -> Option<Document> {
        self.sort.as_ref().map(|key| {
            let mut sort = Document::new();
            sort.insert(key.field.clone(), key.order.direction());
            sort
        })
    }

    /// The effective limit, if any.
    pub fn effective_limit(&self) -> Option<usize> {
        self.limit
            .filter(|limit| *limit > 0)
            .map(|limit| limit as usize)
    }
}

/// One `output = sum(source)` accumulator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SumField {
    pub output: String,
    pub source: String,
}

/// Declarative single-bucket aggregation: group every document together and
/// sum the configured fields.
///
/// Backends either lower it to their own pipeline syntax ([`Self::to_stages`]
/// for MongoDB) or evaluate it directly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupSumPipeline {
    sums: Vec<SumField>,
}

impl GroupSumPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an accumulator writing `sum(source)` into `output`.
    pub fn sum(mut self, output: impl Into<String>, source: impl Into<String>) -> Self {
        self.sums.push(SumField {
            output: output.into(),
            source: source.into(),
        });
        self
    }

    pub fn fields(&self) -> &[SumField] {
        &self.sums
    }

    /// MongoDB pipeline stages: a single `$group` with `_id: 0`.
    pub fn to_stages(&self) -> Vec<Document> {
        let mut group = doc! { "_id": 0_i64 };
        for field in &self.sums {
            group.insert(
                field.output.clone(),
                doc! { "$sum": format!("${}", field.source) },
            );
        }
        vec![doc! { "$group": group }]
    }
}

/// Read access to the collections a report is built from.
///
/// Implementations:
/// - `MongoReportStore`: MongoDB storage
/// - `MockReportStore`: in-memory storage for tests
///
/// Implementations must be safe to share across concurrent requests; the
/// server holds a single instance for the life of the process.
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Fetch documents from `collection`, in query order.
    async fn find(&self, collection: &str, query: FindQuery) -> Result<Vec<Document>>;

    /// Run `pipeline` over `collection`.
    ///
    /// Returns the single totals row, or `None` when the pipeline produced no
    /// rows (an empty collection).
    async fn aggregate(
        &self,
        collection: &str,
        pipeline: &GroupSumPipeline,
    ) -> Result<Option<Document>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_query_sorts_descending_with_limit() {
        let query = FindQuery::latest("_id", 5);
        assert_eq!(query.sort_document(), Some(doc! { "_id": -1 }));
        assert_eq!(query.effective_limit(), Some(5));
    }

    #[test]
    fn test_all_query_has_no_sort_or_limit() {
        let query = FindQuery::all();
        assert!(query.sort_document().is_none());
        assert!(query.effective_limit().is_none());
    }

    #[test]
    fn test_non_positive_limit_means_unbounded() {
        assert!(FindQuery::latest("_id", 0).effective_limit().is_none());
        assert!(FindQuery::latest("_id", -3).effective_limit().is_none());
    }

    #[test]
    fn test_group_sum_pipeline_lowers_to_single_group_stage() {
        let pipeline = GroupSumPipeline::new()
            .sum("totalSales", "coffeeqty")
            .sum("totalRevenue", "amount");

        let stages = pipeline.to_stages();
        assert_eq!(stages.len(), 1);
        assert_eq!(
            stages[0],
            doc! {
                "$group": {
                    "_id": 0_i64,
                    "totalSales": { "$sum": "$coffeeqty" },
                    "totalRevenue": { "$sum": "$amount" },
                }
            }
        );
    }
}
