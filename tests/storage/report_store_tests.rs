//! ReportStore interface tests.
//!
//! These tests verify the contract of the ReportStore trait.
//! Each storage implementation should run these tests.

use mongodb::bson::{doc, Bson, Document};

use coffee_report::interfaces::{FindQuery, GroupSumPipeline, ReportStore};

use super::Seeder;

/// Create an order document with an integer `_id`.
pub fn make_order(id: i64, qty: i32, amount: f64) -> Document {
    doc! {
        "_id": id,
        "coffeetype": "cappuccino",
        "coffeeqty": qty,
        "employeeId": format!("emp-{}", id % 3),
        "amount": amount,
    }
}

fn totals_pipeline() -> GroupSumPipeline {
    GroupSumPipeline::new()
        .sum("totalSales", "coffeeqty")
        .sum("totalRevenue", "amount")
}

fn ids(documents: &[Document]) -> Vec<i64> {
    documents
        .iter()
        .map(|d| d.get_i64("_id").expect("_id should be an i64"))
        .collect()
}

fn as_f64(value: Option<&Bson>) -> f64 {
    match value {
        Some(Bson::Int32(n)) => f64::from(*n),
        Some(Bson::Int64(n)) => *n as f64,
        Some(Bson::Double(n)) => *n,
        other => panic!("expected a number, got {:?}", other),
    }
}

// =============================================================================
// ReportStore::find tests
// =============================================================================

pub async fn test_find_all_returns_every_document<S: ReportStore, D: Seeder>(
    store: &S,
    seeder: &D,
) {
    let collection = "test_find_all";
    seeder
        .seed(
            collection,
            vec![
                doc! { "_id": 1_i64, "name": "Ana" },
                doc! { "_id": 2_i64, "name": "Ben" },
                doc! { "_id": 3_i64, "name": "Cy" },
            ],
        )
        .await;

    let documents = store
        .find(collection, FindQuery::all())
        .await
        .expect("find should succeed");

    let mut found = ids(&documents);
    found.sort_unstable();
    assert_eq!(found, vec![1, 2, 3]);
}

pub async fn test_find_latest_sorts_descending_and_limits<S: ReportStore, D: Seeder>(
    store: &S,
    seeder: &D,
) {
    let collection = "test_find_latest";
    seeder
        .seed(
            collection,
            (1..=7).map(|id| make_order(id, id as i32, 1.0)).collect(),
        )
        .await;

    let documents = store
        .find(collection, FindQuery::latest("_id", 5))
        .await
        .expect("find should succeed");

    assert_eq!(ids(&documents), vec![7, 6, 5, 4, 3]);
}

pub async fn test_find_latest_with_fewer_documents_than_limit<S: ReportStore, D: Seeder>(
    store: &S,
    seeder: &D,
) {
    let collection = "test_find_latest_short";
    seeder
        .seed(
            collection,
            vec![make_order(2, 1, 1.0), make_order(9, 1, 1.0)],
        )
        .await;

    let documents = store
        .find(collection, FindQuery::latest("_id", 5))
        .await
        .expect("find should succeed");

    assert_eq!(ids(&documents), vec![9, 2]);
}

pub async fn test_find_empty_collection<S: ReportStore, D: Seeder>(store: &S, seeder: &D) {
    let collection = "test_find_empty";
    seeder.seed(collection, vec![]).await;

    let documents = store
        .find(collection, FindQuery::all())
        .await
        .expect("find should succeed");

    assert!(documents.is_empty());
}

// =============================================================================
// ReportStore::aggregate tests
// =============================================================================

pub async fn test_aggregate_sums_whole_collection<S: ReportStore, D: Seeder>(
    store: &S,
    seeder: &D,
) {
    let collection = "test_aggregate_sums";
    seeder
        .seed(
            collection,
            (1..=7).map(|id| make_order(id, id as i32, 1.5)).collect(),
        )
        .await;

    let row = store
        .aggregate(collection, &totals_pipeline())
        .await
        .expect("aggregate should succeed")
        .expect("non-empty collection should produce a row");

    assert_eq!(as_f64(row.get("totalSales")), 28.0);
    assert_eq!(as_f64(row.get("totalRevenue")), 10.5);
}

pub async fn test_aggregate_empty_collection_has_no_rows<S: ReportStore, D: Seeder>(
    store: &S,
    seeder: &D,
) {
    let collection = "test_aggregate_empty";
    seeder.seed(collection, vec![]).await;

    let row = store
        .aggregate(collection, &totals_pipeline())
        .await
        .expect("aggregate should succeed");

    assert!(row.is_none(), "empty collection should produce no rows");
}

/// Run all ReportStore interface tests against a store implementation.
#[macro_export]
macro_rules! run_report_store_tests {
    ($store:expr, $seeder:expr) => {
        use $crate::storage::report_store_tests::*;

        // find tests
        test_find_all_returns_every_document($store, $seeder).await;
        println!("  test_find_all_returns_every_document: PASSED");

        test_find_latest_sorts_descending_and_limits($store, $seeder).await;
        println!("  test_find_latest_sorts_descending_and_limits: PASSED");

        test_find_latest_with_fewer_documents_than_limit($store, $seeder).await;
        println!("  test_find_latest_with_fewer_documents_than_limit: PASSED");

        test_find_empty_collection($store, $seeder).await;
        println!("  test_find_empty_collection: PASSED");

        // aggregate tests
        test_aggregate_sums_whole_collection($store, $seeder).await;
        println!("  test_aggregate_sums_whole_collection: PASSED");

        test_aggregate_empty_collection_has_no_rows($store, $seeder).await;
        println!("  test_aggregate_empty_collection_has_no_rows: PASSED");
    };
}
