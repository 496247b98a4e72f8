//! Report routes.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde_json::json;

use tally_core::reports::{ReportFilter, ReportService};
use tally_db::ReportRepository;

use crate::AppState;
use crate::error::map_report_error;

/// Creates the report routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reports/profit-and-loss", get(get_profit_and_loss))
        .route("/reports/cash-flow", get(get_cash_flow))
}

/// GET `/reports/profit-and-loss` - Monthly profit and loss.
///
/// Query: optional `start_date`, `end_date` (YYYY-MM-DD) and `outlet_id`.
async fn get_profit_and_loss(
    State(state): State<AppState>,
    Query(filter): Query<ReportFilter>,
) -> impl IntoResponse {
    let repo = ReportRepository::new(&*state.db);
    match ReportService::profit_and_loss(&repo, &filter).await {
        Ok(periods) => (
            StatusCode::OK,
            Json(json!({
                "report_type": "profit_and_loss",
                "start_date": filter.start_date,
                "end_date": filter.end_date,
                "outlet_id": filter.outlet_id,
                "periods": periods,
            })),
        )
            .into_response(),
        Err(e) => map_report_error(e),
    }
}

/// GET `/reports/cash-flow` - Monthly cash in and out per cash account.
async fn get_cash_flow(
    State(state): State<AppState>,
    Query(filter): Query<ReportFilter>,
) -> impl IntoResponse {
    let repo = ReportRepository::new(&*state.db);
    match ReportService::cash_flow(&repo, &filter).await {
        Ok(periods) => (
            StatusCode::OK,
            Json(json!({
                "report_type": "cash_flow",
                "start_date": filter.start_date,
                "end_date": filter.end_date,
                "outlet_id": filter.outlet_id,
                "periods": periods,
            })),
        )
            .into_response(),
        Err(e) => map_report_error(e),
    }
}
