//! Ledger transactions: the posted, append-only side of the pipeline.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tally_shared::types::PageRequest;

use super::types::{LineType, SourceKind};
use crate::store::StoreResult;

/// Everything a ledger transaction carries except its code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerDraft {
    pub transaction_date: NaiveDate,
    pub item_id: Option<Uuid>,
    pub description: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub amount: Decimal,
    pub line_type: LineType,
    pub account_id: Uuid,
    pub cash_account_id: Option<Uuid>,
    pub outlet_id: Option<Uuid>,
    pub batch_code: Option<String>,
    pub source_kind: SourceKind,
    pub source_id: Uuid,
}

/// A ledger transaction ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLedgerTransaction {
    pub code: String,
    pub entry: LedgerDraft,
}

/// A stored ledger transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerTransaction {
    pub id: Uuid,
    pub code: String,
    #[serde(flatten)]
    pub entry: LedgerDraft,
    pub created_at: DateTime<Utc>,
}

/// Filters for browsing the ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LedgerFilter {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub line_type: Option<LineType>,
    pub account_id: Option<Uuid>,
    pub source_kind: Option<SourceKind>,
    pub batch_code: Option<String>,
    pub outlet_id: Option<Uuid>,
    /// Case-insensitive substring of the description.
    pub search: Option<String>,
}

/// Persistence contract for ledger transactions.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Appends one transaction.
    async fn insert_transaction(&self, tx: NewLedgerTransaction) -> StoreResult<LedgerTransaction>;

    /// Loads a transaction by id.
    async fn find_transaction(&self, id: Uuid) -> StoreResult<Option<LedgerTransaction>>;

    /// Lists transactions newest code first, with the total matching count.
    async fn list_transactions(
        &self,
        filter: &LedgerFilter,
        page: &PageRequest,
    ) -> StoreResult<(Vec<LedgerTransaction>, u64)>;
}
