//! Repository implementations of the core store contracts.
//!
//! Every repository borrows a [`ConnectionTrait`](sea_orm::ConnectionTrait),
//! so the same type works against the pool or inside an open transaction.

pub mod catalog;
pub mod ledger;
pub mod payroll;
pub mod reimbursement;
pub mod report;
pub mod sales;

pub use catalog::CatalogRepository;
pub use ledger::{LedgerRepository, TransactionCodes};
pub use payroll::PayrollRepository;
pub use reimbursement::{BatchCodes, ReimbursementRepository};
pub use report::ReportRepository;
pub use sales::SalesRepository;

use sea_orm::sea_query::{Expr, Func, SimpleExpr};
use sea_orm::{ColumnTrait, DbErr, SqlErr};
use tally_core::store::StoreError;

/// Case-insensitive substring match on a text column.
pub(crate) fn search_condition(column: impl ColumnTrait, needle: &str) -> SimpleExpr {
    let escaped = needle
        .trim()
        .to_lowercase()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    Expr::expr(Func::lower(Expr::col(column))).like(format!("%{escaped}%"))
}

/// Maps a database error onto the core's storage error.
pub(crate) fn store_err(err: DbErr) -> StoreError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => StoreError::Conflict(detail),
        Some(SqlErr::ForeignKeyConstraintViolation(detail)) => StoreError::InvalidReference(detail),
        _ => StoreError::Backend(err.to_string()),
    }
}
