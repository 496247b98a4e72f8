//! Expense reimbursements: draft entries grouped into batches and posted.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use tally_shared::types::{
    MAX_AMOUNT, MAX_QUANTITY, MAX_UNIT_PRICE_SCALE, PageRequest, PageResponse, QUANTITY_SCALE,
    round_money,
};

use super::code::CodeAllocator;
use super::engine::{DraftLedgerSource, PostOutcome, PostingEngine};
use super::error::PostingError;
use super::ledger::{LedgerDraft, LedgerStore};
use super::types::{EntryStatus, LineType, SourceKind};
use crate::store::StoreResult;

/// One reimbursable expense line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftEntry {
    pub id: Uuid,
    pub entry_date: NaiveDate,
    pub item_id: Option<Uuid>,
    pub description: String,
    pub quantity: Decimal,
    pub unit: Option<String>,
    pub unit_price: Decimal,
    pub amount: Decimal,
    pub line_type: LineType,
    pub account_id: Uuid,
    pub cash_account_id: Option<Uuid>,
    pub outlet_id: Option<Uuid>,
    pub status: EntryStatus,
    pub batch_code: Option<String>,
    pub requested_by: String,
    pub receipt_ref: Option<String>,
    pub posted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a draft entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewDraftEntry {
    pub entry_date: NaiveDate,
    pub item_id: Option<Uuid>,
    pub description: String,
    pub quantity: Decimal,
    pub unit: Option<String>,
    pub unit_price: Decimal,
    pub line_type: LineType,
    pub account_id: Uuid,
    pub cash_account_id: Option<Uuid>,
    pub outlet_id: Option<Uuid>,
    pub requested_by: String,
    pub receipt_ref: Option<String>,
}

/// Partial update of a draft entry. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DraftPatch {
    pub entry_date: Option<NaiveDate>,
    pub item_id: Option<Uuid>,
    pub description: Option<String>,
    pub quantity: Option<Decimal>,
    pub unit: Option<String>,
    pub unit_price: Option<Decimal>,
    pub line_type: Option<LineType>,
    pub account_id: Option<Uuid>,
    pub cash_account_id: Option<Uuid>,
    pub outlet_id: Option<Uuid>,
    pub receipt_ref: Option<String>,
}

/// Filters for listing draft entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DraftFilter {
    pub status: Option<EntryStatus>,
    pub batch_code: Option<String>,
    pub requested_by: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub line_type: Option<LineType>,
    pub account_id: Option<Uuid>,
    /// Case-insensitive substring of the description.
    pub search: Option<String>,
}

/// Result of grouping drafts into a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchAssignment {
    /// The batch code, absent when no row qualified.
    pub batch_code: Option<String>,
    pub assigned: u64,
}

/// Persistence contract for reimbursement entries.
///
/// Update, delete and batch assignment only touch rows still in Draft; the
/// boolean and count results report whether anything matched.
#[async_trait]
pub trait ReimbursementStore: Send + Sync {
    async fn insert_entry(&self, entry: DraftEntry) -> StoreResult<DraftEntry>;

    async fn find_entry(&self, id: Uuid) -> StoreResult<Option<DraftEntry>>;

    async fn list_entries(
        &self,
        filter: &DraftFilter,
        page: &PageRequest,
    ) -> StoreResult<(Vec<DraftEntry>, u64)>;

    async fn update_draft(&self, entry: &DraftEntry) -> StoreResult<bool>;

    async fn delete_draft(&self, id: Uuid) -> StoreResult<bool>;

    async fn assign_batch(&self, ids: &[Uuid], batch_code: &str) -> StoreResult<u64>;

    /// Ready rows of a batch, oldest first.
    async fn ready_in_batch(&self, batch_code: &str) -> StoreResult<Vec<DraftEntry>>;

    async fn mark_batch_posted(&self, batch_code: &str, posted_at: DateTime<Utc>)
    -> StoreResult<u64>;
}

/// Amount charged for a line: quantity × unit price at money precision.
///
/// # Errors
///
/// Returns a validation error when the product reaches [`MAX_AMOUNT`].
pub fn line_amount(quantity: Decimal, unit_price: Decimal) -> Result<Decimal, PostingError> {
    quantity
        .checked_mul(unit_price)
        .map(round_money)
        .filter(|amount| *amount < MAX_AMOUNT)
        .ok_or_else(|| PostingError::validation("amount", "quantity × unit_price is too large"))
}

/// Reimbursement draft lifecycle.
pub struct ReimbursementService<S> {
    store: S,
}

impl<S: ReimbursementStore> ReimbursementService<S> {
    /// Creates the service on top of `store`.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Creates a draft entry. The amount is derived, never supplied.
    pub async fn create_draft(&self, input: NewDraftEntry) -> Result<DraftEntry, PostingError> {
        let description = input.description.trim().to_string();
        let requested_by = input.requested_by.trim().to_string();
        validate_line(&description, input.quantity, input.unit_price, input.account_id)?;
        if requested_by.is_empty() {
            return Err(PostingError::validation("requested_by", "must not be empty"));
        }

        let now = Utc::now();
        let entry = DraftEntry {
            id: Uuid::now_v7(),
            entry_date: input.entry_date,
            item_id: input.item_id,
            description,
            quantity: input.quantity,
            unit: input.unit.filter(|u| !u.trim().is_empty()),
            unit_price: input.unit_price,
            amount: line_amount(input.quantity, input.unit_price)?,
            line_type: input.line_type,
            account_id: input.account_id,
            cash_account_id: input.cash_account_id,
            outlet_id: input.outlet_id,
            status: EntryStatus::Draft,
            batch_code: None,
            requested_by,
            receipt_ref: input.receipt_ref,
            posted_at: None,
            created_at: now,
            updated_at: now,
        };

        let entry = self.store.insert_entry(entry).await?;
        info!(entry_id = %entry.id, amount = %entry.amount, "Reimbursement draft created");
        Ok(entry)
    }

    /// Loads one entry in any status.
    pub async fn get(&self, id: Uuid) -> Result<DraftEntry, PostingError> {
        self.store
            .find_entry(id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    /// Lists entries, optionally filtered by status and batch.
    pub async fn list(
        &self,
        filter: &DraftFilter,
        page: &PageRequest,
    ) -> Result<PageResponse<DraftEntry>, PostingError> {
        let (data, total) = self.store.list_entries(filter, page).await?;
        Ok(PageResponse::new(data, page, total))
    }

    /// Applies `patch` to a Draft entry and recomputes its amount.
    ///
    /// Ready and Posted entries report NotFound, the same as a missing id.
    pub async fn update(&self, id: Uuid, patch: DraftPatch) -> Result<DraftEntry, PostingError> {
        let mut entry = self
            .store
            .find_entry(id)
            .await?
            .filter(|e| e.status.is_editable())
            .ok_or_else(|| not_found(id))?;

        if let Some(date) = patch.entry_date {
            entry.entry_date = date;
        }
        if let Some(item_id) = patch.item_id {
            entry.item_id = Some(item_id);
        }
        if let Some(description) = patch.description {
            entry.description = description.trim().to_string();
        }
        if let Some(quantity) = patch.quantity {
            entry.quantity = quantity;
        }
        if let Some(unit) = patch.unit {
            entry.unit = Some(unit).filter(|u| !u.trim().is_empty());
        }
        if let Some(unit_price) = patch.unit_price {
            entry.unit_price = unit_price;
        }
        if let Some(line_type) = patch.line_type {
            entry.line_type = line_type;
        }
        if let Some(account_id) = patch.account_id {
            entry.account_id = account_id;
        }
        if let Some(cash_account_id) = patch.cash_account_id {
            entry.cash_account_id = Some(cash_account_id);
        }
        if let Some(outlet_id) = patch.outlet_id {
            entry.outlet_id = Some(outlet_id);
        }
        if let Some(receipt_ref) = patch.receipt_ref {
            entry.receipt_ref = Some(receipt_ref);
        }

        validate_line(
            &entry.description,
            entry.quantity,
            entry.unit_price,
            entry.account_id,
        )?;
        entry.amount = line_amount(entry.quantity, entry.unit_price)?;
        entry.updated_at = Utc::now();

        if !self.store.update_draft(&entry).await? {
            return Err(not_found(id));
        }
        info!(entry_id = %id, "Reimbursement draft updated");
        Ok(entry)
    }

    /// Deletes a Draft entry.
    pub async fn delete(&self, id: Uuid) -> Result<(), PostingError> {
        if !self.store.delete_draft(id).await? {
            return Err(not_found(id));
        }
        info!(entry_id = %id, "Reimbursement draft deleted");
        Ok(())
    }

    /// Moves the Draft entries among `ids` into a fresh batch.
    ///
    /// Ids that are unknown or no longer Draft are skipped silently. When
    /// none qualify the batch code is discarded and nothing changes.
    pub async fn assign_batch<A>(
        &self,
        batch_codes: &A,
        ids: &[Uuid],
    ) -> Result<BatchAssignment, PostingError>
    where
        A: CodeAllocator + ?Sized,
    {
        if ids.is_empty() {
            return Err(PostingError::validation("ids", "at least one id is required"));
        }

        let batch_code = batch_codes.allocate().await?;
        let assigned = self.store.assign_batch(ids, &batch_code).await?;
        if assigned == 0 {
            warn!(batch_code = %batch_code, requested = ids.len(), "No draft entries to batch");
            return Ok(BatchAssignment {
                batch_code: None,
                assigned,
            });
        }

        info!(batch_code = %batch_code, assigned, "Reimbursement batch assigned");
        Ok(BatchAssignment {
            batch_code: Some(batch_code),
            assigned,
        })
    }

    /// Posts every Ready entry of a batch.
    pub async fn post_batch<L, C>(
        &self,
        engine: &PostingEngine<L, C>,
        batch_code: &str,
    ) -> Result<PostOutcome, PostingError>
    where
        L: LedgerStore,
        C: CodeAllocator,
    {
        let batch_code = batch_code.trim();
        if batch_code.is_empty() {
            return Err(PostingError::validation("batch_code", "must not be empty"));
        }
        engine.post(self, &batch_code.to_string()).await
    }
}

#[async_trait]
impl<S: ReimbursementStore> DraftLedgerSource for ReimbursementService<S> {
    type Selection = String;
    type Row = DraftEntry;

    const KIND: SourceKind = SourceKind::Reimbursement;

    async fn select_unposted(&self, batch_code: &String) -> StoreResult<Vec<DraftEntry>> {
        self.store.ready_in_batch(batch_code).await
    }

    fn to_ledger(&self, batch_code: &String, row: &DraftEntry) -> LedgerDraft {
        LedgerDraft {
            transaction_date: row.entry_date,
            item_id: row.item_id,
            description: row.description.clone(),
            quantity: row.quantity,
            unit_price: row.unit_price,
            amount: row.amount,
            line_type: row.line_type,
            account_id: row.account_id,
            cash_account_id: row.cash_account_id,
            outlet_id: row.outlet_id,
            batch_code: Some(batch_code.clone()),
            source_kind: SourceKind::Reimbursement,
            source_id: row.id,
        }
    }

    async fn mark_posted(
        &self,
        batch_code: &String,
        _rows: &[DraftEntry],
        posted_at: DateTime<Utc>,
    ) -> StoreResult<u64> {
        self.store.mark_batch_posted(batch_code, posted_at).await
    }
}

fn validate_line(
    description: &str,
    quantity: Decimal,
    unit_price: Decimal,
    account_id: Uuid,
) -> Result<(), PostingError> {
    if description.is_empty() {
        return Err(PostingError::validation("description", "must not be empty"));
    }
    if quantity <= Decimal::ZERO {
        return Err(PostingError::validation("quantity", "must be greater than zero"));
    }
    if quantity >= MAX_QUANTITY {
        return Err(PostingError::validation("quantity", "must be below 1000000"));
    }
    if quantity.normalize().scale() > QUANTITY_SCALE {
        return Err(PostingError::validation(
            "quantity",
            "must have at most 4 decimal places",
        ));
    }
    if unit_price < Decimal::ZERO {
        return Err(PostingError::validation("unit_price", "must not be negative"));
    }
    if unit_price.normalize().scale() > MAX_UNIT_PRICE_SCALE {
        return Err(PostingError::validation(
            "unit_price",
            "must have at most 10 decimal places",
        ));
    }
    if account_id.is_nil() {
        return Err(PostingError::validation("account_id", "is required"));
    }
    Ok(())
}

fn not_found(id: Uuid) -> PostingError {
    PostingError::NotFound(format!("Draft reimbursement {id}"))
}
