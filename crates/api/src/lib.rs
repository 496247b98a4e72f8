//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST API routes for drafts, posting, the ledger and reports
//! - The inbound chat message webhook
//! - Error-to-response mapping

pub mod error;
pub mod routes;

use axum::Router;
use sea_orm::{ConnectionTrait, DatabaseConnection};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use tally_core::posting::{CodeSequence, PostingEngine, ReadMaxAllocator};
use tally_db::{BatchCodes, LedgerRepository, TransactionCodes};
use tally_shared::AppConfig;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// Loaded configuration.
    pub config: Arc<AppConfig>,
}

/// Posting engine bound to one connection or transaction.
pub type Engine<'a, C> =
    PostingEngine<LedgerRepository<'a, C>, ReadMaxAllocator<TransactionCodes<'a, C>>>;

impl AppState {
    /// Builds a posting engine that writes through `db`.
    pub fn posting_engine<'a, C: ConnectionTrait>(&self, db: &'a C) -> Engine<'a, C> {
        let codes = &self.config.codes;
        PostingEngine::new(
            LedgerRepository::new(db),
            ReadMaxAllocator::new(
                TransactionCodes::new(db, codes.transaction_prefix.clone()),
                CodeSequence::new(codes.transaction_prefix.clone(), codes.width),
            ),
        )
    }

    /// Builds the reimbursement batch code allocator over `db`.
    pub fn batch_codes<'a, C: ConnectionTrait>(
        &self,
        db: &'a C,
    ) -> ReadMaxAllocator<BatchCodes<'a, C>> {
        let codes = &self.config.codes;
        ReadMaxAllocator::new(
            BatchCodes::new(db, codes.batch_prefix.clone()),
            CodeSequence::new(codes.batch_prefix.clone(), codes.width),
        )
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
