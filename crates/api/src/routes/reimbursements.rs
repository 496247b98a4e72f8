//! Reimbursement routes: draft CRUD, batch assignment and batch posting.

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

use tally_core::posting::{DraftFilter, DraftPatch, NewDraftEntry, ReimbursementService};
use tally_db::ReimbursementRepository;
use tally_shared::types::PageRequest;

use super::{parse_line_type, parse_status, search_term};
use crate::AppState;
use crate::error::{map_db_error, map_posting_error};

/// Creates the reimbursement routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reimbursements", get(list_entries).post(create_entry))
        .route(
            "/reimbursements/{id}",
            get(get_entry).patch(update_entry).delete(delete_entry),
        )
        .route("/reimbursements/batch", post(assign_batch))
        .route("/reimbursements/batches/{batch_code}/post", post(post_batch))
}

// ============================================================================
// Request Types
// ============================================================================

/// Query parameters for listing reimbursements.
#[derive(Debug, Deserialize)]
pub struct ListReimbursementsQuery {
    /// `draft`, `ready` or `posted`.
    pub status: Option<String>,
    /// Batch code.
    pub batch_code: Option<String>,
    /// Exact requester label.
    pub requested_by: Option<String>,
    /// First entry date included.
    pub start_date: Option<NaiveDate>,
    /// Last entry date included.
    pub end_date: Option<NaiveDate>,
    /// Line type, e.g. `EXPENSE`.
    pub line_type: Option<String>,
    /// Booked account.
    pub account_id: Option<Uuid>,
    /// Text contained in the description.
    pub q: Option<String>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Page size (max 100).
    pub per_page: Option<u32>,
}

/// Request body for batch assignment.
#[derive(Debug, Deserialize)]
pub struct AssignBatchRequest {
    /// Entries to move into the new batch.
    pub ids: Vec<Uuid>,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/reimbursements` - List entries with filters.
async fn list_entries(
    State(state): State<AppState>,
    Query(query): Query<ListReimbursementsQuery>,
) -> impl IntoResponse {
    let status = match parse_status(query.status.as_deref()) {
        Ok(status) => status,
        Err(response) => return response,
    };
    let line_type = match parse_line_type(query.line_type.as_deref()) {
        Ok(line_type) => line_type,
        Err(response) => return response,
    };

    let filter = DraftFilter {
        status,
        batch_code: search_term(query.batch_code),
        requested_by: search_term(query.requested_by),
        start_date: query.start_date,
        end_date: query.end_date,
        line_type,
        account_id: query.account_id,
        search: search_term(query.q),
    };
    let page = PageRequest::new(query.page, query.per_page);

    let service = ReimbursementService::new(ReimbursementRepository::new(&*state.db));
    match service.list(&filter, &page).await {
        Ok(entries) => (StatusCode::OK, Json(entries)).into_response(),
        Err(e) => map_posting_error(e),
    }
}

/// POST `/reimbursements` - Create a draft entry.
async fn create_entry(
    State(state): State<AppState>,
    Json(payload): Json<NewDraftEntry>,
) -> impl IntoResponse {
    let service = ReimbursementService::new(ReimbursementRepository::new(&*state.db));
    match service.create_draft(payload).await {
        Ok(entry) => (StatusCode::CREATED, Json(entry)).into_response(),
        Err(e) => map_posting_error(e),
    }
}

/// GET `/reimbursements/{id}` - Get one entry in any status.
async fn get_entry(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    let service = ReimbursementService::new(ReimbursementRepository::new(&*state.db));
    match service.get(id).await {
        Ok(entry) => (StatusCode::OK, Json(entry)).into_response(),
        Err(e) => map_posting_error(e),
    }
}

/// PATCH `/reimbursements/{id}` - Update a Draft entry.
async fn update_entry(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<DraftPatch>,
) -> impl IntoResponse {
    let service = ReimbursementService::new(ReimbursementRepository::new(&*state.db));
    match service.update(id, patch).await {
        Ok(entry) => (StatusCode::OK, Json(entry)).into_response(),
        Err(e) => map_posting_error(e),
    }
}

/// DELETE `/reimbursements/{id}` - Delete a Draft entry.
async fn delete_entry(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    let service = ReimbursementService::new(ReimbursementRepository::new(&*state.db));
    match service.delete(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => map_posting_error(e),
    }
}

/// POST `/reimbursements/batch` - Move Draft entries into a new batch.
async fn assign_batch(
    State(state): State<AppState>,
    Json(payload): Json<AssignBatchRequest>,
) -> impl IntoResponse {
    let txn = match state.db.begin().await {
        Ok(txn) => txn,
        Err(e) => return map_db_error(&e),
    };

    let service = ReimbursementService::new(ReimbursementRepository::new(&txn));
    let assignment = match service
        .assign_batch(&state.batch_codes(&txn), &payload.ids)
        .await
    {
        Ok(assignment) => assignment,
        Err(e) => return map_posting_error(e),
    };

    if let Err(e) = txn.commit().await {
        return map_db_error(&e);
    }
    (StatusCode::OK, Json(assignment)).into_response()
}

/// POST `/reimbursements/batches/{batch_code}/post` - Post every Ready entry of a batch.
///
/// Ledger writes and status changes commit together. Posting a batch with
/// nothing left in Ready succeeds with an empty result.
async fn post_batch(
    State(state): State<AppState>,
    Path(batch_code): Path<String>,
) -> impl IntoResponse {
    let txn = match state.db.begin().await {
        Ok(txn) => txn,
        Err(e) => return map_db_error(&e),
    };

    let service = ReimbursementService::new(ReimbursementRepository::new(&txn));
    let outcome = match service
        .post_batch(&state.posting_engine(&txn), &batch_code)
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
