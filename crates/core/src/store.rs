//! Errors reported by data-access contract implementations.
//!
//! The core never talks to a database directly. Each domain module declares
//! the narrow async trait it needs and persistence adapters implement it,
//! translating their own failures into [`StoreError`].

use thiserror::Error;

/// Failure reported by a persistence adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A unique key would be duplicated.
    #[error("Duplicate key: {0}")]
    Conflict(String),

    /// A referenced row (account, item, outlet) does not exist.
    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    /// Any other storage failure. The detail is for server-side logs only.
    #[error("Storage failure: {0}")]
    Backend(String),
}

/// Result type alias using `StoreError`.
pub type StoreResult<T> = Result<T, StoreError>;
