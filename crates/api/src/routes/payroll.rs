//! Payroll routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::NaiveDate;
use sea_orm::TransactionTrait;
use serde::Deserialize;
use uuid::Uuid;

use tally_core::posting::{PayrollBatch, PayrollFilter, PayrollPatch, PayrollService};
use tally_db::PayrollRepository;
use tally_shared::types::PageRequest;

use super::{parse_status, search_term};
use crate::AppState;
use crate::error::{map_db_error, map_posting_error};

/// Creates the payroll routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/payroll", get(list_entries))
        .route("/payroll/batch", post(create_batch))
        .route("/payroll/post", post(post_entries))
        .route(
            "/payroll/{id}",
            get(get_entry).patch(update_entry).delete(delete_entry),
        )
}

/// Query parameters for listing payroll entries.
#[derive(Debug, Deserialize)]
pub struct ListPayrollQuery {
    /// Payroll period label, e.g. `2026-03`.
    pub period: Option<String>,
    /// `draft` or `posted`.
    pub status: Option<String>,
    /// First payroll date included.
    pub start_date: Option<NaiveDate>,
    /// Last payroll date included.
    pub end_date: Option<NaiveDate>,
    /// Booked account.
    pub account_id: Option<Uuid>,
    /// Text contained in the employee name.
    pub q: Option<String>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Page size (max 100).
    pub per_page: Option<u32>,
}

/// Request body for posting payroll entries.
#[derive(Debug, Deserialize)]
pub struct PostPayrollRequest {
    /// Entries to post. Entries already posted are ignored.
    pub ids: Vec<Uuid>,
}

/// GET `/payroll` - List entries with filters.
async fn list_entries(
    State(state): State<AppState>,
    Query(query): Query<ListPayrollQuery>,
) -> impl IntoResponse {
    let status = match parse_status(query.status.as_deref()) {
        Ok(status) => status,
        Err(response) => return response,
    };

    let filter = PayrollFilter {
        period: search_term(query.period),
        status,
        start_date: query.start_date,
        end_date: query.end_date,
        account_id: query.account_id,
        search: search_term(query.q),
    };
    let page = PageRequest::new(query.page, query.per_page);

    let service = PayrollService::new(PayrollRepository::new(&*state.db));
    match service.list(&filter, &page).await {
        Ok(entries) => (StatusCode::OK, Json(entries)).into_response(),
        Err(e) => map_posting_error(e),
    }
}

/// POST `/payroll/batch` - Record a payroll run as Draft entries.
async fn create_batch(
    State(state): State<AppState>,
    Json(batch): Json<PayrollBatch>,
) -> impl IntoResponse {
    let txn = match state.db.begin().await {
        Ok(txn) => txn,
        Err(e) => return map_db_error(&e),
    };

    let service = PayrollService::new(PayrollRepository::new(&txn));
    let entries = match service.create_batch(batch).await {
        Ok(entries) => entries,
        Err(e) => return map_posting_error(e),
    };

    if let Err(e) = txn.commit().await {
        return map_db_error(&e);
    }
    (StatusCode::CREATED, Json(entries)).into_response()
}

/// GET `/payroll/{id}` - Get one entry.
async fn get_entry(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    let service = PayrollService::new(PayrollRepository::new(&*state.db));
    match service.get(id).await {
        Ok(entry) => (StatusCode::OK, Json(entry)).into_response(),
        Err(e) => map_posting_error(e),
    }
}

/// PATCH `/payroll/{id}` - Update a Draft entry.
async fn update_entry(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<PayrollPatch>,
) -> impl IntoResponse {
    let service = PayrollService::new(PayrollRepository::new(&*state.db));
    match service.update(id, patch).await {
        Ok(entry) => (StatusCode::OK, Json(entry)).into_response(),
        Err(e) => map_posting_error(e),
    }
}

/// DELETE `/payroll/{id}` - Delete a Draft entry.
async fn delete_entry(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    let service = PayrollService::new(PayrollRepository::new(&*state.db));
    match service.delete(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => map_posting_error(e),
    }
}

/// POST `/payroll/post` - Post the selected Draft entries.
async fn post_entries(
    State(state): State<AppState>,
    Json(request): Json<PostPayrollRequest>,
) -> impl IntoResponse {
    let txn = match state.db.begin().await {
        Ok(txn) => txn,
        Err(e) => return map_db_error(&e),
    };

    let service = PayrollService::new(PayrollRepository::new(&txn));
    let outcome = match service
        .post(&state.posting_engine(&txn), &request.ids)
        .await
    {
        Ok(outcome) => outcome,
        Err(e) => return map_posting_error(e),
    };

    if let Err(e) = txn.commit().await {
        return map_db_error(&e);
    }
    (StatusCode::OK, Json(outcome)).into_response()
}
