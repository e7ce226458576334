//! HTTP handlers.

pub mod report;
