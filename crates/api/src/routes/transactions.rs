//! Ledger transaction routes. The ledger is append-only: list and get only.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use tally_core::posting::{LedgerFilter, LedgerStore};
use tally_db::LedgerRepository;
use tally_shared::AppError;
use tally_shared::types::{PageRequest, PageResponse};

use super::{parse_line_type, parse_source_kind, search_term};
use crate::AppState;
use crate::error::app_error_response;

/// Creates the transaction routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/transactions", get(list_transactions))
        .route("/transactions/{id}", get(get_transaction))
}

/// Query parameters for listing ledger transactions.
#[derive(Debug, Deserialize)]
pub struct ListTransactionsQuery {
    /// First transaction date included.
    pub start_date: Option<NaiveDate>,
    /// Last transaction date included.
    pub end_date: Option<NaiveDate>,
    /// Line type, e.g. `SALES`.
    pub line_type: Option<String>,
    /// Booked account.
    pub account_id: Option<Uuid>,
    /// `reimbursement`, `sales` or `payroll`.
    pub source: Option<String>,
    /// Reimbursement batch code.
    pub batch_code: Option<String>,
    /// Outlet.
    pub outlet_id: Option<Uuid>,
    /// Text contained in the description.
    pub q: Option<String>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Page size (max 100).
    pub per_page: Option<u32>,
}

/// GET `/transactions` - List ledger transactions, newest code first.
async fn list_transactions(
    State(state): State<AppState>,
    Query(query): Query<ListTransactionsQuery>,
) -> impl IntoResponse {
    let line_type = match parse_line_type(query.line_type.as_deref()) {
        Ok(line_type) => line_type,
        Err(response) => return response,
    };
    let source_kind = match parse_source_kind(query.source.as_deref()) {
        Ok(source_kind) => source_kind,
        Err(response) => return response,
    };

    let filter = LedgerFilter {
        start_date: query.start_date,
        end_date: query.end_date,
        line_type,
        account_id: query.account_id,
        source_kind,
        batch_code: search_term(query.batch_code),
        outlet_id: query.outlet_id,
        search: search_term(query.q),
    };
    let page = PageRequest::new(query.page, query.per_page);

    let repo = LedgerRepository::new(&*state.db);
    match repo.list_transactions(&filter, &page).await {
        Ok((transactions, total)) => (
            StatusCode::OK,
            Json(PageResponse::new(transactions, &page, total)),
        )
            .into_response(),
        Err(e) => app_error_response(&AppError::Database(e.to_string())),
    }
}

/// GET `/transactions/{id}` - Get one ledger transaction.
async fn get_transaction(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = LedgerRepository::new(&*state.db);
    match repo.find_transaction(id).await {
        Ok(Some(transaction)) => (StatusCode::OK, Json(transaction)).into_response(),
        Ok(None) => app_error_response(&AppError::NotFound(format!("Transaction {id}"))),
        Err(e) => app_error_response(&AppError::Database(e.to_string())),
    }
}
