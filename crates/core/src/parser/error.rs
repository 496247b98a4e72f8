//! Message parser error types.

use thiserror::Error;

/// Errors produced while reading a free-text expense report.
///
/// Every variant carries enough of the original text for the sender to
/// correct the message and send it again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The message has no non-empty lines.
    #[error("Message is empty")]
    EmptyMessage,

    /// The first non-empty line is not a date.
    #[error(
        "Line {line}: could not read a date from \"{content}\", start the message with a date such as \"20 jan\" or \"2025-01-20\""
    )]
    InvalidDate {
        /// 1-indexed line number in the original message.
        line: usize,
        /// The offending line as sent.
        content: String,
    },

    /// An item line does not split into name, quantity and price.
    #[error(
        "Line {line}: could not read \"{content}\", write items as \"<name> <quantity><unit> <price>\", e.g. \"cabe merah 5kg 500k\""
    )]
    InvalidItemLine {
        /// 1-indexed line number in the original message.
        line: usize,
        /// The offending line as sent.
        content: String,
    },

    /// A quantity or price is too large or too precise to record.
    #[error(
        "Line {line}: \"{content}\" is out of range, quantities take at most 4 decimals and stay below 1,000,000, prices take at most 2 decimals and stay below 1,000,000,000,000"
    )]
    OutOfRange {
        /// 1-indexed line number in the original message.
        line: usize,
        /// The offending line as sent.
        content: String,
    },

    /// A date was found but no item lines follow it.
    #[error("Message has a date but no item lines")]
    NoItems,
}

impl ParseError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyMessage => "EMPTY_MESSAGE",
            Self::InvalidDate { .. } => "INVALID_DATE",
            Self::InvalidItemLine { .. } => "INVALID_ITEM_LINE",
            Self::OutOfRange { .. } => "OUT_OF_RANGE",
            Self::NoItems => "NO_ITEMS",
        }
    }

    /// Returns the 1-indexed line the error refers to, if any.
    #[must_use]
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::InvalidDate { line, .. }
            | Self::InvalidItemLine { line, .. }
            | Self::OutOfRange { line, .. } => Some(*line),
            Self::EmptyMessage | Self::NoItems => None,
        }
    }
}
