//! Sequential human-readable codes for ledger transactions and batches.
//!
//! A code is a fixed prefix followed by a zero-padded counter, e.g.
//! `PCS000042`. The next code is derived from the highest code currently
//! stored, so allocation is only as safe as the caller's isolation.

use async_trait::async_trait;
use thiserror::Error;

use super::error::PostingError;
use crate::store::StoreResult;

/// Errors raised while deriving the next code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodeError {
    /// The stored maximum does not follow the expected format.
    #[error("Code '{code}' does not match sequence prefix '{prefix}'")]
    Malformed {
        /// The code that could not be read.
        code: String,
        /// The expected prefix.
        prefix: String,
    },

    /// The counter cannot be incremented any further.
    #[error("Code sequence '{0}' is exhausted")]
    Exhausted(String),
}

/// A prefix plus zero-padded counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeSequence {
    prefix: String,
    width: usize,
}

impl CodeSequence {
    /// Creates a sequence of codes with exactly `width` counter digits.
    pub fn new(prefix: impl Into<String>, width: usize) -> Self {
        Self {
            prefix: prefix.into(),
            width,
        }
    }

    /// The fixed prefix of every code in this sequence.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Largest counter that still fits in `width` digits.
    #[must_use]
    pub fn max_number(&self) -> u64 {
        u32::try_from(self.width)
            .ok()
            .and_then(|width| 10u64.checked_pow(width))
            .map_or(u64::MAX, |limit| limit - 1)
    }

    /// Formats counter `n` as a code.
    #[must_use]
    pub fn format(&self, n: u64) -> String {
        format!("{}{:0width$}", self.prefix, n, width = self.width)
    }

    /// Reads the counter out of a code of this sequence.
    pub fn number_of(&self, code: &str) -> Result<u64, CodeError> {
        code.strip_prefix(self.prefix.as_str())
            .filter(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|digits| digits.parse::<u64>().ok())
            .ok_or_else(|| CodeError::Malformed {
                code: code.to_string(),
                prefix: self.prefix.clone(),
            })
    }

    /// The code that follows `current_max`, or the first code when nothing
    /// has been issued yet.
    ///
    /// Codes never grow past `width` digits: a wider code would sort below
    /// the stored maximum and the sequence could not advance.
    pub fn next_after(&self, current_max: Option<&str>) -> Result<String, CodeError> {
        let next = match current_max {
            None => Some(1),
            Some(code) => self.number_of(code)?.checked_add(1),
        };
        match next {
            Some(n) if n <= self.max_number() => Ok(self.format(n)),
            _ => Err(CodeError::Exhausted(self.prefix.clone())),
        }
    }
}

/// Reports the highest code issued so far for one sequence.
#[async_trait]
pub trait CodeSource: Send + Sync {
    /// Highest stored code, if any.
    async fn current_max(&self) -> StoreResult<Option<String>>;
}

/// Hands out the next code of a sequence.
#[async_trait]
pub trait CodeAllocator: Send + Sync {
    /// Allocates one fresh code.
    async fn allocate(&self) -> Result<String, PostingError>;
}

/// Read-max-then-increment allocator.
///
/// Two concurrent callers can observe the same maximum; the unique index on
/// the code column turns the loser into a conflict.
pub struct ReadMaxAllocator<S> {
    source: S,
    sequence: CodeSequence,
}

impl<S: CodeSource> ReadMaxAllocator<S> {
    /// Creates an allocator reading the current maximum from `source`.
    pub const fn new(source: S, sequence: CodeSequence) -> Self {
        Self { source, sequence }
    }
}

#[async_trait]
impl<S: CodeSource> CodeAllocator for ReadMaxAllocator<S> {
    async fn allocate(&self) -> Result<String, PostingError> {
        let current = self.source.current_max().await?;
        Ok(self.sequence.next_after(current.as_deref())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, "PCS000001")]
    #[case(Some("PCS000001"), "PCS000002")]
    #[case(Some("PCS000099"), "PCS000100")]
    #[case(Some("PCS999998"), "PCS999999")]
    fn test_next_after(#[case] current: Option<&str>, #[case] expected: &str) {
        let sequence = CodeSequence::new("PCS", 6);
        assert_eq!(sequence.next_after(current).unwrap(), expected);
    }

    #[rstest]
    #[case("RMB000001")]
    #[case("PCS")]
    #[case("PCS12A")]
    #[case("PCS-00001")]
    fn test_foreign_or_malformed_code_is_rejected(#[case] code: &str) {
        let sequence = CodeSequence::new("PCS", 6);
        assert!(matches!(
            sequence.next_after(Some(code)),
            Err(CodeError::Malformed { .. })
        ));
    }

    #[rstest]
    #[case(6, "RMB999999")]
    #[case(3, "RMB999")]
    #[case(30, "RMB18446744073709551615")]
    fn test_exhausted_sequence(#[case] width: usize, #[case] last: &str) {
        let sequence = CodeSequence::new("RMB", width);
        assert_eq!(
            sequence.next_after(Some(last)),
            Err(CodeError::Exhausted("RMB".into()))
        );
    }

    #[test]
    fn test_max_number_follows_width() {
        assert_eq!(CodeSequence::new("PCS", 6).max_number(), 999_999);
        assert_eq!(CodeSequence::new("PCS", 1).max_number(), 9);
        assert_eq!(CodeSequence::new("PCS", 25).max_number(), u64::MAX);
    }

    proptest! {
        /// The next code always sorts after the current one within the padded width.
        #[test]
        fn prop_next_code_is_strictly_greater(n in 1u64..999_998) {
            let sequence = CodeSequence::new("PCS", 6);
            let current = sequence.format(n);
            let next = sequence.next_after(Some(&current)).unwrap();
            prop_assert!(next > current);
            prop_assert_eq!(sequence.number_of(&next).unwrap(), n + 1);
        }
    }
}
