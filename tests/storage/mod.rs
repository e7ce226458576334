//! Shared storage integration tests.
//!
//! Tests the ReportStore interface against all implementations.
//! Each implementation module imports these test functions and runs them.

use async_trait::async_trait;
use mongodb::bson::Document;

pub mod report_store_tests;

/// Writes fixture documents into a backend.
///
/// Seeding replaces whatever the collection held before, so every contract
/// test starts from a known state.
#[async_trait]
pub trait Seeder: Send + Sync {
    async fn seed(&self, collection: &str, documents: Vec<Document>);
}
