//! Generic draft-to-ledger posting.
//!
//! Every draft source (reimbursement batches, sales summaries, payroll runs)
//! follows the same flow: select the rows not yet posted, write one ledger
//! transaction per row under a freshly allocated code, then flip the rows
//! to Posted. A selection with nothing left to post is a no-op.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use tracing::{info, warn};

use super::code::CodeAllocator;
use super::error::PostingError;
use super::ledger::{LedgerDraft, LedgerStore, LedgerTransaction, NewLedgerTransaction};
use super::types::SourceKind;
use crate::store::StoreResult;

/// A kind of draft row that can be turned into ledger transactions.
#[async_trait]
pub trait DraftLedgerSource: Send + Sync {
    /// Identifies which rows a post call covers.
    type Selection: fmt::Debug + Send + Sync;
    /// One draft row.
    type Row: Send + Sync;

    /// Source kind stamped on produced transactions.
    const KIND: SourceKind;

    /// Rows covered by `selection` that are eligible and not yet posted.
    async fn select_unposted(&self, selection: &Self::Selection) -> StoreResult<Vec<Self::Row>>;

    /// Maps a row to its ledger transaction, minus the code.
    fn to_ledger(&self, selection: &Self::Selection, row: &Self::Row) -> LedgerDraft;

    /// Marks the given rows posted. Returns the number of rows changed.
    async fn mark_posted(
        &self,
        selection: &Self::Selection,
        rows: &[Self::Row],
        posted_at: DateTime<Utc>,
    ) -> StoreResult<u64>;
}

/// Result of one post call.
#[derive(Debug, Clone, Serialize)]
pub struct PostOutcome {
    pub source_kind: SourceKind,
    pub transactions: Vec<LedgerTransaction>,
    pub rows_posted: u64,
}

impl PostOutcome {
    fn empty(source_kind: SourceKind) -> Self {
        Self {
            source_kind,
            transactions: Vec::new(),
            rows_posted: 0,
        }
    }

    /// True when the selection had nothing left to post.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Codes of the transactions created, in allocation order.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.transactions.iter().map(|tx| tx.code.as_str())
    }
}

/// Writes ledger transactions for any [`DraftLedgerSource`].
///
/// The engine does not open a database transaction itself. Callers that
/// need all-or-nothing posting hand it stores bound to one.
pub struct PostingEngine<L, C> {
    ledger: L,
    codes: C,
}

impl<L: LedgerStore, C: CodeAllocator> PostingEngine<L, C> {
    /// Creates an engine writing to `ledger` with codes from `codes`.
    pub const fn new(ledger: L, codes: C) -> Self {
        Self { ledger, codes }
    }

    /// Posts every unposted row covered by `selection`.
    pub async fn post<S>(
        &self,
        source: &S,
        selection: &S::Selection,
    ) -> Result<PostOutcome, PostingError>
    where
        S: DraftLedgerSource,
    {
        let rows = source.select_unposted(selection).await?;
        if rows.is_empty() {
            info!(source = %S::KIND, selection = ?selection, "Nothing left to post");
            return Ok(PostOutcome::empty(S::KIND));
        }

        let mut transactions = Vec::with_capacity(rows.len());
        for row in &rows {
            match self.write_one(source.to_ledger(selection, row)).await {
                Ok(tx) => transactions.push(tx),
                Err(e) => {
                    if !transactions.is_empty() {
                        warn!(
                            source = %S::KIND,
                            selection = ?selection,
                            written = transactions.len(),
                            remaining = rows.len() - transactions.len(),
                            error = %e,
                            "Posting interrupted after partial ledger writes"
                        );
                    }
                    return Err(e);
                }
            }
        }

        let rows_posted = source.mark_posted(selection, &rows, Utc::now()).await?;
        if usize::try_from(rows_posted).ok() != Some(rows.len()) {
            warn!(
                source = %S::KIND,
                selected = rows.len(),
                marked = rows_posted,
                "Posted row count differs from selection"
            );
        }

        info!(
            source = %S::KIND,
            selection = ?selection,
            transactions = transactions.len(),
            "Drafts posted to ledger"
        );

        Ok(PostOutcome {
            source_kind: S::KIND,
            transactions,
            rows_posted,
        })
    }

    async fn write_one(&self, entry: LedgerDraft) -> Result<LedgerTransaction, PostingError> {
        let code = self.codes.allocate().await?;
        let tx = self
            .ledger
            .insert_transaction(NewLedgerTransaction { code, entry })
            .await?;
        Ok(tx)
    }
}
