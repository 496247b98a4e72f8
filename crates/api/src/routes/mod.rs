//! API route definitions.

use axum::{Router, response::Response};

use tally_core::posting::{EntryStatus, LineType, SourceKind};
use tally_shared::AppError;

use crate::AppState;
use crate::error::app_error_response;

pub mod health;
pub mod payroll;
pub mod reimbursements;
pub mod reports;
pub mod sales;
pub mod transactions;
pub mod webhook;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(webhook::routes())
        .merge(reimbursements::routes())
        .merge(sales::routes())
        .merge(payroll::routes())
        .merge(transactions::routes())
        .merge(reports::routes())
}

// ============================================================================
// Query Helpers
// ============================================================================

/// Parses an optional `status` query value.
pub(crate) fn parse_status(raw: Option<&str>) -> Result<Option<EntryStatus>, Response> {
    parse_optional(raw, "status", EntryStatus::parse)
}

/// Parses an optional `line_type` query value.
pub(crate) fn parse_line_type(raw: Option<&str>) -> Result<Option<LineType>, Response> {
    parse_optional(raw, "line_type", LineType::parse)
}

/// Parses an optional `source` query value.
pub(crate) fn parse_source_kind(raw: Option<&str>) -> Result<Option<SourceKind>, Response> {
    parse_optional(raw, "source", SourceKind::parse)
}

fn parse_optional<T>(
    raw: Option<&str>,
    field: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<Option<T>, Response> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(value) => parse(value).map(Some).ok_or_else(|| {
            app_error_response(&AppError::Validation(format!(
                "Invalid {field}: unknown value '{value}'"
            )))
        }),
    }
}

/// Treats an empty search string as absent.
pub(crate) fn search_term(raw: Option<String>) -> Option<String> {
    raw.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}
