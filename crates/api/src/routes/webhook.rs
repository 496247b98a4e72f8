//! Inbound chat message webhook.
//!
//! The messaging gateway forwards every message here and relays the `reply`
//! field back to the chat. An unreadable message is not an HTTP error: it
//! answers 200 with `ok: false` and a reply asking the sender to fix it.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use chrono::Utc;
use sea_orm::TransactionTrait;
use serde_json::json;

use tally_core::ingest::{InboundMessage, IngestAccounts, IngestOutcome, IngestService};
use tally_core::posting::ReimbursementService;
use tally_db::{CatalogRepository, ReimbursementRepository};

use crate::AppState;
use crate::error::{map_db_error, map_posting_error};

/// Creates the webhook routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/webhook/messages", post(receive_message))
}

/// POST `/webhook/messages` - Record the expenses in one chat message.
///
/// All drafts of a message are written in one transaction.
async fn receive_message(
    State(state): State<AppState>,
    Json(message): Json<InboundMessage>,
) -> impl IntoResponse {
    let txn = match state.db.begin().await {
        Ok(txn) => txn,
        Err(e) => return map_db_error(&e),
    };

    let ingest = &state.config.ingest;
    let service = IngestService::new(
        CatalogRepository::new(&txn),
        ReimbursementService::new(ReimbursementRepository::new(&txn)),
        IngestAccounts {
            inventory_account_id: ingest.inventory_account_id,
            expense_account_id: ingest.expense_account_id,
            cash_account_id: ingest.cash_account_id,
        },
    );

    let outcome = match service.handle(&message, ingest.local_today(Utc::now())).await {
        Ok(outcome) => outcome,
        Err(e) => return map_posting_error(e),
    };

    if let Err(e) = txn.commit().await {
        return map_db_error(&e);
    }

    match outcome {
        IngestOutcome::Recorded(report) => (
            StatusCode::OK,
            Json(json!({
                "ok": true,
                "reply": report.reply,
                "expense_date": report.expense_date,
                "counts": report.counts,
                "total_amount": report.total_amount,
                "lines": report.lines,
            })),
        )
            .into_response(),
        IngestOutcome::Rejected(rejection) => (
            StatusCode::OK,
            Json(json!({
                "ok": false,
                "reply": rejection.reply,
                "error": rejection.error_code,
                "message": rejection.message,
                "line": rejection.line,
            })),
        )
            .into_response(),
    }
}
