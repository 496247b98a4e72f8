//! Sales summary routes.

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

use tally_core::posting::{
    NewSalesSummary, SalesFilter, SalesPatch, SalesSelection, SalesService, SalesSyncRequest,
};
use tally_db::SalesRepository;
use tally_shared::types::PageRequest;

use super::{parse_status, search_term};
use crate::AppState;
use crate::error::{map_db_error, map_posting_error};

/// Creates the sales summary routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/sales-summaries", get(list_summaries).post(create_summary))
        .route(
            "/sales-summaries/{id}",
            get(get_summary).patch(update_summary).delete(delete_summary),
        )
        .route("/sales-summaries/sync", post(sync_summaries))
        .route("/sales-summaries/post", post(post_summaries))
}

/// Query parameters for listing sales summaries.
#[derive(Debug, Deserialize)]
pub struct ListSalesQuery {
    /// First business date included.
    pub start_date: Option<NaiveDate>,
    /// Last business date included.
    pub end_date: Option<NaiveDate>,
    /// Outlet.
    pub outlet_id: Option<Uuid>,
    /// Sales channel.
    pub channel: Option<String>,
    /// Payment method.
    pub payment_method: Option<String>,
    /// `draft` or `posted`.
    pub status: Option<String>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Page size (max 100).
    pub per_page: Option<u32>,
}

/// GET `/sales-summaries` - List summaries with filters.
async fn list_summaries(
    State(state): State<AppState>,
    Query(query): Query<ListSalesQuery>,
) -> impl IntoResponse {
    let status = match parse_status(query.status.as_deref()) {
        Ok(status) => status,
        Err(response) => return response,
    };

    let filter = SalesFilter {
        start_date: query.start_date,
        end_date: query.end_date,
        outlet_id: query.outlet_id,
        channel: search_term(query.channel),
        payment_method: search_term(query.payment_method),
        status,
    };
    let page = PageRequest::new(query.page, query.per_page);

    let service = SalesService::new(SalesRepository::new(&*state.db));
    match service.list(&filter, &page).await {
        Ok(summaries) => (StatusCode::OK, Json(summaries)).into_response(),
        Err(e) => map_posting_error(e),
    }
}

/// POST `/sales-summaries` - Enter a summary by hand.
async fn create_summary(
    State(state): State<AppState>,
    Json(payload): Json<NewSalesSummary>,
) -> impl IntoResponse {
    let service = SalesService::new(SalesRepository::new(&*state.db));
    match service.create(payload).await {
        Ok(summary) => (StatusCode::CREATED, Json(summary)).into_response(),
        Err(e) => map_posting_error(e),
    }
}

/// GET `/sales-summaries/{id}` - Get one summary.
async fn get_summary(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    let service = SalesService::new(SalesRepository::new(&*state.db));
    match service.get(id).await {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(e) => map_posting_error(e),
    }
}

/// PATCH `/sales-summaries/{id}` - Update a Draft summary.
async fn update_summary(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<SalesPatch>,
) -> impl IntoResponse {
    let service = SalesService::new(SalesRepository::new(&*state.db));
    match service.update(id, patch).await {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(e) => map_posting_error(e),
    }
}

/// DELETE `/sales-summaries/{id}` - Delete a Draft summary.
async fn delete_summary(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    let service = SalesService::new(SalesRepository::new(&*state.db));
    match service.delete(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => map_posting_error(e),
    }
}

/// POST `/sales-summaries/sync` - Rebuild Draft summaries from completed orders.
async fn sync_summaries(
    State(state): State<AppState>,
    Json(request): Json<SalesSyncRequest>,
) -> impl IntoResponse {
    let txn = match state.db.begin().await {
        Ok(txn) => txn,
        Err(e) => return map_db_error(&e),
    };

    let service = SalesService::new(SalesRepository::new(&txn));
    let outcome = match service.sync(&request).await {
        Ok(outcome) => outcome,
        Err(e) => return map_posting_error(e),
    };

    if let Err(e) = txn.commit().await {
        return map_db_error(&e);
    }
    (StatusCode::OK, Json(outcome)).into_response()
}

/// POST `/sales-summaries/post` - Post the Draft summaries of one business date.
async fn post_summaries(
    State(state): State<AppState>,
    Json(selection): Json<SalesSelection>,
) -> impl IntoResponse {
    let txn = match state.db.begin().await {
        Ok(txn) => txn,
        Err(e) => return map_db_error(&e),
    };

    let service = SalesService::new(SalesRepository::new(&txn));
    let outcome = match service.post(&state.posting_engine(&txn), &selection).await {
        Ok(outcome) => outcome,
        Err(e) => return map_posting_error(e),
    };

    if let Err(e) = txn.commit().await {
        return map_db_error(&e);
    }
    (StatusCode::OK, Json(outcome)).into_response()
}
