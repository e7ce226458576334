//! MongoDB implementation of the report storage interface.

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::{Client, Collection, Database};

use crate::interfaces::{FindQuery, GroupSumPipeline, ReportStore, Result};

/// MongoDB implementation of ReportStore.
///
/// Holds a database handle from a shared [`Client`]; the client pools
/// connections internally, so one store serves every request.
#[derive(Clone)]
pub struct MongoReportStore {
    database: Database,
}

impl MongoReportStore {
    /// Create a store reading from `database_name`.
    pub fn new(client: &Client, database_name: &str) -> Self {
        Self {
            database: client.database(database_name),
        }
    }

    /// Get the database reference.
    pub fn database(&self) -> &Database {
        &self.database
    }

    fn collection(&self, name: &str) -> Collection<Document> {
        self.database.collection(name)
    }
}

#[async_trait]
impl ReportStore for MongoReportStore {
    async fn find(&self, collection: &str, query: FindQuery) -> Result<Vec<Document>> {
        let collection = self.collection(collection);
        let mut find = collection.find(doc! {});
        if let Some(sort) = query.sort_document() {
            find = find.sort(sort);
        }
        if let Some(limit) = query.effective_limit() {
            find = find.limit(limit as i64);
        }

        let cursor = find.await?;
        let documents: Vec<Document> = cursor.try_collect().await?;

        Ok(documents)
    }

    async fn aggregate(
        &self,
        collection: &str,
        pipeline: &GroupSumPipeline,
    ) -> Result<Option<Document>> {
        let mut cursor = self
            .collection(collection)
            .aggregate(pipeline.to_stages())
            .await?;

        Ok(cursor.try_next().await?)
    }
}
