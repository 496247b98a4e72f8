//! Payroll runs: one Draft entry per employee, posted by id.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use tally_shared::types::{PageRequest, PageResponse};

use super::code::CodeAllocator;
use super::engine::{DraftLedgerSource, PostOutcome, PostingEngine};
use super::error::PostingError;
use super::ledger::{LedgerDraft, LedgerStore};
use super::types::{EntryStatus, LineType, SourceKind};
use crate::store::StoreResult;

/// Wages owed to one employee for one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollEntry {
    pub id: Uuid,
    pub payroll_date: NaiveDate,
    pub period: String,
    pub employee_name: String,
    pub gross_pay: Decimal,
    pub payment_method: String,
    pub account_id: Uuid,
    pub cash_account_id: Option<Uuid>,
    pub outlet_id: Option<Uuid>,
    pub status: EntryStatus,
    pub created_by: String,
    pub posted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One employee line of a payroll run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PayrollLine {
    pub employee_name: String,
    pub gross_pay: Decimal,
    #[serde(default = "default_payment_method")]
    pub payment_method: String,
}

/// A payroll run to record as Draft entries.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PayrollBatch {
    pub payroll_date: NaiveDate,
    pub period: String,
    pub account_id: Uuid,
    pub cash_account_id: Option<Uuid>,
    pub outlet_id: Option<Uuid>,
    pub created_by: String,
    pub lines: Vec<PayrollLine>,
}

/// Partial update of a Draft payroll entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PayrollPatch {
    pub payroll_date: Option<NaiveDate>,
    pub period: Option<String>,
    pub employee_name: Option<String>,
    pub gross_pay: Option<Decimal>,
    pub payment_method: Option<String>,
    pub account_id: Option<Uuid>,
    pub cash_account_id: Option<Uuid>,
}

/// Filters for listing payroll entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PayrollFilter {
    pub period: Option<String>,
    pub status: Option<EntryStatus>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub account_id: Option<Uuid>,
    /// Case-insensitive substring of the employee name.
    pub search: Option<String>,
}

/// Persistence contract for payroll entries.
#[async_trait]
pub trait PayrollStore: Send + Sync {
    async fn insert_entries(&self, entries: Vec<PayrollEntry>) -> StoreResult<Vec<PayrollEntry>>;

    async fn find_entry(&self, id: Uuid) -> StoreResult<Option<PayrollEntry>>;

    async fn list_entries(
        &self,
        filter: &PayrollFilter,
        page: &PageRequest,
    ) -> StoreResult<(Vec<PayrollEntry>, u64)>;

    async fn update_draft_entry(&self, entry: &PayrollEntry) -> StoreResult<bool>;

    async fn delete_draft_entry(&self, id: Uuid) -> StoreResult<bool>;

    /// The Draft entries among `ids`, in id order.
    async fn unposted_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<PayrollEntry>>;

    async fn mark_entries_posted(&self, ids: &[Uuid], posted_at: DateTime<Utc>) -> StoreResult<u64>;
}

/// Payroll lifecycle.
pub struct PayrollService<S> {
    store: S,
}

impl<S: PayrollStore> PayrollService<S> {
    /// Creates the service on top of `store`.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Records every line of a run as a Draft entry.
    pub async fn create_batch(&self, batch: PayrollBatch) -> Result<Vec<PayrollEntry>, PostingError> {
        let period = batch.period.trim().to_string();
        let created_by = batch.created_by.trim().to_string();
        if period.is_empty() {
            return Err(PostingError::validation("period", "must not be empty"));
        }
        if created_by.is_empty() {
            return Err(PostingError::validation("created_by", "must not be empty"));
        }
        if batch.lines.is_empty() {
            return Err(PostingError::validation("lines", "at least one line is required"));
        }
        if batch.account_id.is_nil() {
            return Err(PostingError::validation("account_id", "is required"));
        }

        let now = Utc::now();
        let mut entries = Vec::with_capacity(batch.lines.len());
        for line in batch.lines {
            let employee_name = line.employee_name.trim().to_string();
            validate_pay(&employee_name, line.gross_pay)?;
            entries.push(PayrollEntry {
                id: Uuid::now_v7(),
                payroll_date: batch.payroll_date,
                period: period.clone(),
                employee_name,
                gross_pay: line.gross_pay,
                payment_method: line.payment_method.trim().to_lowercase(),
                account_id: batch.account_id,
                cash_account_id: batch.cash_account_id,
                outlet_id: batch.outlet_id,
                status: EntryStatus::Draft,
                created_by: created_by.clone(),
                posted_at: None,
                created_at: now,
                updated_at: now,
            });
        }

        let entries = self.store.insert_entries(entries).await?;
        info!(period = %period, entries = entries.len(), "Payroll batch created");
        Ok(entries)
    }

    /// Loads one entry.
    pub async fn get(&self, id: Uuid) -> Result<PayrollEntry, PostingError> {
        self.store
            .find_entry(id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    /// Lists entries.
    pub async fn list(
        &self,
        filter: &PayrollFilter,
        page: &PageRequest,
    ) -> Result<PageResponse<PayrollEntry>, PostingError> {
        let (data, total) = self.store.list_entries(filter, page).await?;
        Ok(PageResponse::new(data, page, total))
    }

    /// Edits a Draft entry.
    pub async fn update(&self, id: Uuid, patch: PayrollPatch) -> Result<PayrollEntry, PostingError> {
        let mut entry = self
            .store
            .find_entry(id)
            .await?
            .filter(|e| e.status.is_editable())
            .ok_or_else(|| not_found(id))?;

        if let Some(payroll_date) = patch.payroll_date {
            entry.payroll_date = payroll_date;
        }
        if let Some(period) = patch.period {
            entry.period = period.trim().to_string();
        }
        if let Some(employee_name) = patch.employee_name {
            entry.employee_name = employee_name.trim().to_string();
        }
        if let Some(gross_pay) = patch.gross_pay {
            entry.gross_pay = gross_pay;
        }
        if let Some(payment_method) = patch.payment_method {
            entry.payment_method = payment_method.trim().to_lowercase();
        }
        if let Some(account_id) = patch.account_id {
            entry.account_id = account_id;
        }
        if let Some(cash_account_id) = patch.cash_account_id {
            entry.cash_account_id = Some(cash_account_id);
        }
        if entry.period.is_empty() {
            return Err(PostingError::validation("period", "must not be empty"));
        }
        validate_pay(&entry.employee_name, entry.gross_pay)?;
        entry.updated_at = Utc::now();

        if !self.store.update_draft_entry(&entry).await? {
            return Err(not_found(id));
        }
        info!(entry_id = %id, "Payroll entry updated");
        Ok(entry)
    }

    /// Deletes a Draft entry.
    pub async fn delete(&self, id: Uuid) -> Result<(), PostingError> {
        if !self.store.delete_draft_entry(id).await? {
            return Err(not_found(id));
        }
        info!(entry_id = %id, "Payroll entry deleted");
        Ok(())
    }

    /// Posts the Draft entries among `ids`. Ids already posted are ignored.
    pub async fn post<L, C>(
        &self,
        engine: &PostingEngine<L, C>,
        ids: &[Uuid],
    ) -> Result<PostOutcome, PostingError>
    where
        L: LedgerStore,
        C: CodeAllocator,
    {
        if ids.is_empty() {
            return Err(PostingError::validation("ids", "at least one id is required"));
        }
        engine.post(self, &ids.to_vec()).await
    }
}

#[async_trait]
impl<S: PayrollStore> DraftLedgerSource for PayrollService<S> {
    type Selection = Vec<Uuid>;
    type Row = PayrollEntry;

    const KIND: SourceKind = SourceKind::Payroll;

    async fn select_unposted(&self, ids: &Vec<Uuid>) -> StoreResult<Vec<PayrollEntry>> {
        self.store.unposted_by_ids(ids).await
    }

    fn to_ledger(&self, _ids: &Vec<Uuid>, row: &PayrollEntry) -> LedgerDraft {
        LedgerDraft {
            transaction_date: row.payroll_date,
            item_id: None,
            description: format!("Payroll {} - {}", row.period, row.employee_name),
            quantity: Decimal::ONE,
            unit_price: row.gross_pay,
            amount: row.gross_pay,
            line_type: LineType::Expense,
            account_id: row.account_id,
            cash_account_id: row.cash_account_id,
            outlet_id: row.outlet_id,
            batch_code: None,
            source_kind: SourceKind::Payroll,
            source_id: row.id,
        }
    }

    async fn mark_posted(
        &self,
        _ids: &Vec<Uuid>,
        rows: &[PayrollEntry],
        posted_at: DateTime<Utc>,
    ) -> StoreResult<u64> {
        let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
        self.store.mark_entries_posted(&ids, posted_at).await
    }
}

fn default_payment_method() -> String {
    "cash".to_string()
}

fn validate_pay(employee_name: &str, gross_pay: Decimal) -> Result<(), PostingError> {
    if employee_name.is_empty() {
        return Err(PostingError::validation("employee_name", "must not be empty"));
    }
    if gross_pay <= Decimal::ZERO {
        return Err(PostingError::validation("gross_pay", "must be greater than zero"));
    }
    Ok(())
}

fn not_found(id: Uuid) -> PostingError {
    PostingError::NotFound(format!("Draft payroll entry {id}"))
}
