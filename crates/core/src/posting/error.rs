//! Posting pipeline error types.

use thiserror::Error;

use super::code::CodeError;
use crate::store::StoreError;

/// Errors that can occur while creating, editing or posting draft rows.
#[derive(Debug, Error)]
pub enum PostingError {
    /// A required field is missing or malformed.
    #[error("Invalid {field}: {message}")]
    Validation {
        /// The offending field.
        field: &'static str,
        /// What is wrong with it.
        message: String,
    },

    /// The row does not exist, or its status rules out the operation.
    #[error("{0} not found")]
    NotFound(String),

    /// A natural key is already taken.
    #[error("{0}")]
    Conflict(String),

    /// The current maximum code could not be incremented.
    #[error(transparent)]
    Code(#[from] CodeError),

    /// Opaque storage failure.
    #[error(transparent)]
    Storage(StoreError),
}

impl PostingError {
    /// Shorthand for a validation error.
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Conflict(_) => "CONFLICT",
            Self::Code(_) | Self::Storage(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<StoreError> for PostingError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(message) => Self::Conflict(message),
            StoreError::InvalidReference(message) => Self::Validation {
                field: "reference",
                message,
            },
            StoreError::Backend(_) => Self::Storage(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_errors_map_to_taxonomy() {
        assert!(matches!(
            PostingError::from(StoreError::Conflict("dup".into())),
            PostingError::Conflict(_)
        ));
        assert!(matches!(
            PostingError::from(StoreError::InvalidReference("account".into())),
            PostingError::Validation {
                field: "reference",
                ..
            }
        ));
        assert!(matches!(
            PostingError::from(StoreError::Backend("io".into())),
            PostingError::Storage(_)
        ));
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            PostingError::validation("quantity", "must be greater than zero").to_string(),
            "Invalid quantity: must be greater than zero"
        );
        assert_eq!(
            PostingError::NotFound("Reimbursement 42".into()).to_string(),
            "Reimbursement 42 not found"
        );
        assert_eq!(
            PostingError::NotFound(String::new()).error_code(),
            "NOT_FOUND"
        );
    }
}
