//! Mock storage implementation for testing.
//!
//! Keeps collections as ordered lists of BSON documents and evaluates
//! [`FindQuery`] and [`GroupSumPipeline`] the way MongoDB does for the shapes
//! the report uses: missing sort keys sort lowest, `$sum` ignores
//! non-numeric values and yields a double once any double is summed or the
//! integer total overflows.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::time::Duration;

use async_trait::async_trait;
use mongodb::bson::{Bson, Document};
use tokio::sync::RwLock;

use crate::interfaces::{FindQuery, GroupSumPipeline, ReportStore, Result, SortOrder, StorageError};


/// Mock report store that stores documents in memory.
#[derive(Default)]
pub struct MockReportStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
    fail_on_find: RwLock<HashSet<String>>,
    fail_on_aggregate: RwLock<bool>,
    latency: RwLock<Option<Duration>>,
}

impl MockReportStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a document to `collection`.
    pub async fn insert(&self, collection: &str, document: Document) {
        self.collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .push(document);
    }

    /// Append documents to `collection`, preserving their order.
    pub async fn insert_many(&self, collection: &str, documents: impl IntoIterator<Item = Document>) {
        self.collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .extend(documents);
    }

    /// Replace the contents of `collection`.
    pub async fn replace_collection(&self, collection: &str, documents: Vec<Document>) {
        self.collections
            .write()
            .await
            .insert(collection.to_string(), documents);
    }

    /// Make every `find` against `collection` fail.
    pub async fn set_fail_on_find(&self, collection: &str, fail: bool) {
        let mut failing = self.fail_on_find.write().await;
        if fail {
            failing.insert(collection.to_string());
        } else {
            failing.remove(collection);
        }
    }

    pub async fn set_fail_on_aggregate(&self, fail: bool) {
        *self.fail_on_aggregate.write().await = fail;
    }

    /// Delay every operation by `latency` before answering.
    pub async fn set_latency(&self, latency: Duration) {
        *self.latency.write().await = Some(latency);
    }

    pub async fn stored_count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map(Vec::len)
            .unwrap_or_default()
    }

    async fn simulate_latency(&self) {
        let latency = *self.latency.read().await;
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl ReportStore for MockReportStore {
    async fn find(&self, collection: &str, query: FindQuery) -> Result<Vec<Document>> {
        self.simulate_latency().await;

        if self.fail_on_find.read().await.contains(collection) {
            return Err(StorageError::Unavailable(format!(
                "find on {collection} failed"
            )));
        }

        let mut documents = self
            .collections
            .read()
            .await
            .get(collection)
            .cloned()
            .unwrap_or_default();

        if let Some(key) = &query.sort {
            documents.sort_by(|a, b| {
                let ordering = compare_values(a.get(&key.field), b.get(&key.field));
                match key.order {
                    SortOrder::Ascending => ordering,
                    SortOrder::Descending => ordering.reverse(),
                }
            });
        }

        if let Some(limit) = query.effective_limit() {
            documents.truncate(limit);
        }

        Ok(documents)
    }

    async fn aggregate(
        &self,
        collection: &str,
        pipeline: &GroupSumPipeline,
    ) -> Result<Option<Document>> {
        self.simulate_latency().await;

        if *self.fail_on_aggregate.read().await {
            return Err(StorageError::Unavailable(format!(
                "aggregate on {collection} failed"
            )));
        }

        let collections = self.collections.read().await;
        let documents = match collections.get(collection) {
            Some(documents) if !documents.is_empty() => documents,
            _ => return Ok(None),
        };

        let mut row = Document::new();
        row.insert("_id", 0_i64);
        for field in pipeline.fields() {
            let total = documents
                .iter()
                .filter_map(|document| document.get(&field.source))
                .fold(Sum::default(), Sum::add);
            row.insert(field.output.clone(), total.into_bson());
        }

        Ok(Some(row))
    }
}

/// Running `$sum`: integral until the first double or an overflow.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Sum {
    Integral(i64),
    Double(f64),
}

impl Default for Sum {
    fn default() -> Self {
        Sum::Integral(0)
    }
}

impl Sum {
    fn add(self, value: &Bson) -> Self {
        let n = match value {
            Bson::Int32(n) => Sum::Integral(i64::from(*n)),
            Bson::Int64(n) => Sum::Integral(*n),
            Bson::Double(n) => Sum::Double(*n),
            _ => return self,
        };

        match (self, n) {
            (Sum::Integral(a), Sum::Integral(b)) => a
                .checked_add(b)
                .map(Sum::Integral)
                .unwrap_or(Sum::Double(a as f64 + b as f64)),
            (a, b) => Sum::Double(a.as_f64() + b.as_f64()),
        }
    }

    fn as_f64(self) -> f64 {
        match self {
            Sum::Integral(n) => n as f64,
            Sum::Double(n) => n,
        }
    }

    fn into_bson(self) -> Bson {
        match self {
            Sum::Integral(n) => Bson::Int64(n),
            Sum::Double(n) => Bson::Double(n),
        }
    }
}

/// BSON comparison order for the value types a sort key can hold.
///
/// Missing and null sort first, then numbers, strings, and object ids.
fn compare_values(a: Option<&Bson>, b: Option<&Bson>) -> Ordering {
    fn rank(value: Option<&Bson>) -> u8 {
        match value {
            None | Some(Bson::Null) => 0,
            Some(Bson::Int32(_) | Bson::Int64(_) | Bson::Double(_)) => 1,
            Some(Bson::String(_)) => 2,
            Some(Bson::ObjectId(_)) => 3,
            Some(_) => 4,
        }
    }

    fn as_f64(value: &Bson) -> f64 {
        match value {
            Bson::Int32(n) => f64::from(*n),
            Bson::Int64(n) => *n as f64,
            Bson::Double(n) => *n,
            _ => 0.0,
        }
    }

    match (a, b) {
        (Some(Bson::String(x)), Some(Bson::String(y))) => x.cmp(y),
        (Some(Bson::ObjectId(x)), Some(Bson::ObjectId(y))) => x.bytes().cmp(&y.bytes()),
        (Some(x), Some(y)) if rank(a) == 1 && rank(b) == 1 => {
            as_f64(x).partial_cmp(&as_f64(y)).unwrap_or(Ordering::Equal)
        }
        _ => rank(a).cmp(&rank(b)),
    }
}
