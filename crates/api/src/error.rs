//! Mapping of domain errors onto HTTP responses.
//!
//! Every failure renders as `{"error": CODE, "message": ...}`. Storage and
//! internal failures are logged in full and shown to the caller opaquely.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

use tally_core::posting::PostingError;
use tally_core::reports::ReportError;
use tally_shared::AppError;

/// Renders an application error.
pub fn app_error_response(err: &AppError) -> Response {
    if err.is_opaque() {
        error!(error = %err, "Request failed");
    }
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(json!({
            "error": err.error_code(),
            "message": err.public_message()
        })),
    )
        .into_response()
}

/// Converts a posting error into the shared error type.
pub fn posting_app_error(err: PostingError) -> AppError {
    match err {
        PostingError::Validation { .. } => AppError::Validation(err.to_string()),
        PostingError::NotFound(_) => AppError::NotFound(err.to_string()),
        PostingError::Conflict(message) => AppError::Conflict(message),
        PostingError::Code(e) => AppError::Internal(e.to_string()),
        PostingError::Storage(e) => AppError::Database(e.to_string()),
    }
}

/// Converts a report error into the shared error type.
pub fn report_app_error(err: ReportError) -> AppError {
    match err {
        ReportError::InvalidDateRange { .. } => AppError::Validation(err.to_string()),
        ReportError::Storage(e) => AppError::Database(e.to_string()),
    }
}

/// Maps posting errors to HTTP responses.
pub fn map_posting_error(err: PostingError) -> Response {
    app_error_response(&posting_app_error(err))
}

/// Maps report errors to HTTP responses.
pub fn map_report_error(err: ReportError) -> Response {
    app_error_response(&report_app_error(err))
}

/// Maps a failure to open or commit a database transaction.
pub fn map_db_error(err: &sea_orm::DbErr) -> Response {
    app_error_response(&AppError::Database(err.to_string()))
}
