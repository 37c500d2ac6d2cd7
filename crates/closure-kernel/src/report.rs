//! Accepted/rejected envelope around a single check.

use crate::failure::ClosureFailure;
use serde::{Deserialize, Serialize};

pub const ACCEPTED: &str = "accepted";
pub const REJECTED: &str = "rejected";

/// The outcome of one named check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckReport {
    /// Schema version (always 1).
    pub report_schema: u32,

    /// Which check ran, e.g. `check_closure_combine`.
    pub check: String,

    /// "accepted" or "rejected".
    pub result: String,

    /// The failure, if rejected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<ClosureFailure>,
}

impl CheckReport {
    pub fn accepted(check: impl Into<String>) -> Self {
        Self {
            report_schema: 1,
            check: check.into(),
            result: ACCEPTED.to_string(),
            failure: None,
        }
    }

    pub fn rejected(check: impl Into<String>, failure: ClosureFailure) -> Self {
        Self {
            report_schema: 1,
            check: check.into(),
            result: REJECTED.to_string(),
            failure: Some(failure),
        }
    }

    /// Wrap the result of running `check`.
    pub fn from_result(check: impl Into<String>, result: Result<(), ClosureFailure>) -> Self {
        match result {
            Ok(()) => Self::accepted(check),
            Err(failure) => Self::rejected(check, failure),
        }
    }

    pub fn is_accepted(&self) -> bool {
        self.result == ACCEPTED
    }
}
