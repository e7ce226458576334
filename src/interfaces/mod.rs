//! Abstract interfaces for coffee-report components.
//!
//! The report assembler depends only on these traits, never on a concrete
//! document-store driver.

pub mod report_store;

pub use report_store::{
    FindQuery, GroupSumPipeline, ReportStore, Result, SortKey, SortOrder, StorageError, SumField,
};
