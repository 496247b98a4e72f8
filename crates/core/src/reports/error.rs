//! Report error types.

use chrono::NaiveDate;
use thiserror::Error;

use crate::store::StoreError;

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Invalid date range.
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange {
        /// Start date.
        start: NaiveDate,
        /// End date.
        end: NaiveDate,
    },

    /// Ledger rows could not be read.
    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl ReportError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidDateRange { .. } => "VALIDATION_ERROR",
            Self::Storage(_) => "INTERNAL_ERROR",
        }
    }
}
