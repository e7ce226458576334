//! JSON response bodies.
//!
//! A report renders as a JSON object. Anything else (a failed report, a
//! serialization error, a value that encodes as `null`) renders as the
//! sentinel `[]`, so clients only ever see those two shapes.

use serde::Serialize;
use tracing::{debug, error};

use super::{Report, ReportError};

/// Body sent when there is no report to show.
pub const EMPTY_REPORT_BODY: &str = "[]";

/// A rendered `application/json` body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportBody(String);

impl ReportBody {
    /// The sentinel body.
    pub fn empty() -> Self {
        Self(EMPTY_REPORT_BODY.to_string())
    }

    /// Render the outcome of a report build.
    ///
    /// Every error maps to the sentinel. This is the single place that policy
    /// lives.
    pub fn render(outcome: &Result<Report, ReportError>) -> Self {
        match outcome {
            Ok(report) => Self::from_value(report),
            Err(_) => Self::empty(),
        }
    }

    /// Serialize `value`, falling back to the sentinel on error or `null`.
    pub fn from_value<T: Serialize>(value: &T) -> Self {
        match serde_json::to_string(value) {
            Ok(json) if json == "null" => Self::empty(),
            Ok(json) => {
                debug!(bytes = json.len(), "Sending response");
                Self(json)
            }
            Err(e) => {
                error!(error = %e, "Error serializing report");
                Self::empty()
            }
        }
    }

    pub fn is_empty_report(&self) -> bool {
        self.0 == EMPTY_REPORT_BODY
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}
