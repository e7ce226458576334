//! coffee-report - sales report service
//!
//! Serves `GET /report`: order totals, the newest orders and every employee
//! account from a MongoDB store, as one JSON document.

pub mod config;
pub mod handlers;
pub mod interfaces;
pub mod report;
pub mod storage;
pub mod utils;
