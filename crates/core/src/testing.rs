//! In-memory implementations of every store contract, for unit tests.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use tally_shared::types::PageRequest;

use crate::matcher::{CatalogStore, Item};
use crate::posting::{
    CodeSource, DraftEntry, DraftFilter, EntryStatus, LedgerFilter, LedgerStore,
    LedgerTransaction, NewLedgerTransaction, OrderAggregate, PayrollEntry, PayrollFilter,
    PayrollStore, ReimbursementStore, SalesFilter, SalesKey, SalesSelection, SalesStore,
    SalesSummary,
};
use crate::store::{StoreError, StoreResult};

#[derive(Default)]
struct State {
    items: Vec<Item>,
    reimbursements: Vec<DraftEntry>,
    orders: Vec<OrderAggregate>,
    summaries: Vec<SalesSummary>,
    payroll: Vec<PayrollEntry>,
    ledger: Vec<LedgerTransaction>,
    batch_codes: Vec<String>,
    fail_ledger_after: Option<usize>,
}

/// Shared in-memory backing store. Clones see the same data.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
}

/// Transaction code source over a [`MemoryStore`].
pub struct LedgerCodes(pub MemoryStore);

/// Batch code source over a [`MemoryStore`].
pub struct BatchCodes(pub MemoryStore);

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    pub fn with_items(self, items: Vec<Item>) -> Self {
        self.lock().items = items;
        self
    }

    /// Adds one completed-orders aggregate for the sales sync to find.
    pub fn add_orders(&self, aggregate: OrderAggregate) {
        self.lock().orders.push(aggregate);
    }

    pub fn clear_orders(&self) {
        self.lock().orders.clear();
    }

    /// Makes every ledger insert after the first `n` fail.
    pub fn fail_ledger_after(&self, n: usize) {
        self.lock().fail_ledger_after = Some(n);
    }

    pub fn ledger(&self) -> Vec<LedgerTransaction> {
        self.lock().ledger.clone()
    }

    pub fn reimbursements(&self) -> Vec<DraftEntry> {
        self.lock().reimbursements.clone()
    }
}

fn matches_search(text: &str, search: Option<&String>) -> bool {
    search.is_none_or(|needle| text.to_lowercase().contains(&needle.to_lowercase()))
}

fn in_range(date: NaiveDate, start: Option<NaiveDate>, end: Option<NaiveDate>) -> bool {
    start.is_none_or(|s| date >= s) && end.is_none_or(|e| date <= e)
}

fn page<T: Clone>(rows: Vec<T>, page: &PageRequest) -> (Vec<T>, u64) {
    let total = rows.len() as u64;
    let data = rows
        .into_iter()
        .skip(usize::try_from(page.offset()).unwrap())
        .take(usize::try_from(page.limit()).unwrap())
        .collect();
    (data, total)
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn active_items(&self) -> StoreResult<Vec<Item>> {
        Ok(self.lock().items.iter().filter(|i| i.is_active).cloned().collect())
    }
}

#[async_trait]
impl ReimbursementStore for MemoryStore {
    async fn insert_entry(&self, entry: DraftEntry) -> StoreResult<DraftEntry> {
        self.lock().reimbursements.push(entry.clone());
        Ok(entry)
    }

    async fn find_entry(&self, id: Uuid) -> StoreResult<Option<DraftEntry>> {
        Ok(self.lock().reimbursements.iter().find(|e| e.id == id).cloned())
    }

    async fn list_entries(
        &self,
        filter: &DraftFilter,
        page_request: &PageRequest,
    ) -> StoreResult<(Vec<DraftEntry>, u64)> {
        let rows = self
            .lock()
            .reimbursements
            .iter()
            .filter(|e| filter.status.is_none_or(|s| e.status == s))
            .filter(|e| {
                filter
                    .batch_code
                    .as_ref()
                    .is_none_or(|code| e.batch_code.as_ref() == Some(code))
            })
            .filter(|e| {
                filter
                    .requested_by
                    .as_ref()
                    .is_none_or(|who| &e.requested_by == who)
            })
            .filter(|e| in_range(e.entry_date, filter.start_date, filter.end_date))
            .filter(|e| filter.line_type.is_none_or(|l| e.line_type == l))
            .filter(|e| filter.account_id.is_none_or(|a| e.account_id == a))
            .filter(|e| matches_search(&e.description, filter.search.as_ref()))
            .cloned()
            .collect();
        Ok(page(rows, page_request))
    }

    async fn update_draft(&self, entry: &DraftEntry) -> StoreResult<bool> {
        let mut state = self.lock();
        match state
            .reimbursements
            .iter_mut()
            .find(|e| e.id == entry.id && e.status == EntryStatus::Draft)
        {
            Some(existing) => {
                *existing = entry.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_draft(&self, id: Uuid) -> StoreResult<bool> {
        let mut state = self.lock();
        let before = state.reimbursements.len();
        state
            .reimbursements
            .retain(|e| !(e.id == id && e.status == EntryStatus::Draft));
        Ok(state.reimbursements.len() < before)
    }

    async fn assign_batch(&self, ids: &[Uuid], batch_code: &str) -> StoreResult<u64> {
        let mut state = self.lock();
        let mut assigned = 0;
        for entry in state
            .reimbursements
            .iter_mut()
            .filter(|e| ids.contains(&e.id) && e.status == EntryStatus::Draft)
        {
            entry.status = EntryStatus::Ready;
            entry.batch_code = Some(batch_code.to_string());
            assigned += 1;
        }
        if assigned > 0 {
            state.batch_codes.push(batch_code.to_string());
        }
        Ok(assigned)
    }

    async fn ready_in_batch(&self, batch_code: &str) -> StoreResult<Vec<DraftEntry>> {
        Ok(self
            .lock()
            .reimbursements
            .iter()
            .filter(|e| e.status == EntryStatus::Ready && e.batch_code.as_deref() == Some(batch_code))
            .cloned()
            .collect())
    }

    async fn mark_batch_posted(
        &self,
        batch_code: &str,
        posted_at: DateTime<Utc>,
    ) -> StoreResult<u64> {
        let mut state = self.lock();
        let mut marked = 0;
        for entry in state.reimbursements.iter_mut().filter(|e| {
            e.status == EntryStatus::Ready && e.batch_code.as_deref() == Some(batch_code)
        }) {
            entry.status = EntryStatus::Posted;
            entry.posted_at = Some(posted_at);
            marked += 1;
        }
        Ok(marked)
    }
}

#[async_trait]
impl SalesStore for MemoryStore {
    async fn aggregate_completed_orders(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        outlet_id: Option<Uuid>,
    ) -> StoreResult<Vec<OrderAggregate>> {
        Ok(self
            .lock()
            .orders
            .iter()
            .filter(|o| o.key.business_date >= start && o.key.business_date <= end)
            .filter(|o| outlet_id.is_none() || o.key.outlet_id == outlet_id)
            .cloned()
            .collect())
    }

    async fn find_by_key(&self, key: &SalesKey) -> StoreResult<Option<SalesSummary>> {
        Ok(self.lock().summaries.iter().find(|s| &s.key == key).cloned())
    }

    async fn find_summary(&self, id: Uuid) -> StoreResult<Option<SalesSummary>> {
        Ok(self.lock().summaries.iter().find(|s| s.id == id).cloned())
    }

    async fn insert_summary(&self, summary: SalesSummary) -> StoreResult<SalesSummary> {
        let mut state = self.lock();
        if state.summaries.iter().any(|s| s.key == summary.key) {
            return Err(StoreError::Conflict("sales summary key".into()));
        }
        state.summaries.push(summary.clone());
        Ok(summary)
    }

    async fn update_draft_summary(&self, summary: &SalesSummary) -> StoreResult<bool> {
        let mut state = self.lock();
        match state
            .summaries
            .iter_mut()
            .find(|s| s.id == summary.id && s.status == EntryStatus::Draft)
        {
            Some(existing) => {
                *existing = summary.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_draft_summary(&self, id: Uuid) -> StoreResult<bool> {
        let mut state = self.lock();
        let before = state.summaries.len();
        state
            .summaries
            .retain(|s| !(s.id == id && s.status == EntryStatus::Draft));
        Ok(state.summaries.len() < before)
    }

    async fn list_summaries(
        &self,
        filter: &SalesFilter,
        page_request: &PageRequest,
    ) -> StoreResult<(Vec<SalesSummary>, u64)> {
        let rows = self
            .lock()
            .summaries
            .iter()
            .filter(|s| filter.status.is_none_or(|status| s.status == status))
            .filter(|s| filter.outlet_id.is_none() || s.key.outlet_id == filter.outlet_id)
            .cloned()
            .collect();
        Ok(page(rows, page_request))
    }

    async fn unposted_summaries(
        &self,
        selection: &SalesSelection,
    ) -> StoreResult<Vec<SalesSummary>> {
        Ok(self
            .lock()
            .summaries
            .iter()
            .filter(|s| s.status == EntryStatus::Draft)
            .filter(|s| s.key.business_date == selection.business_date)
            .filter(|s| selection.outlet_id.is_none() || s.key.outlet_id == selection.outlet_id)
            .cloned()
            .collect())
    }

    async fn mark_summaries_posted(
        &self,
        ids: &[Uuid],
        posted_at: DateTime<Utc>,
    ) -> StoreResult<u64> {
        let mut state = self.lock();
        let mut marked = 0;
        for summary in state
            .summaries
            .iter_mut()
            .filter(|s| ids.contains(&s.id) && s.status == EntryStatus::Draft)
        {
            summary.status = EntryStatus::Posted;
            summary.posted_at = Some(posted_at);
            marked += 1;
        }
        Ok(marked)
    }
}

#[async_trait]
impl PayrollStore for MemoryStore {
    async fn insert_entries(&self, entries: Vec<PayrollEntry>) -> StoreResult<Vec<PayrollEntry>> {
        self.lock().payroll.extend(entries.iter().cloned());
        Ok(entries)
    }

    async fn find_entry(&self, id: Uuid) -> StoreResult<Option<PayrollEntry>> {
        Ok(self.lock().payroll.iter().find(|e| e.id == id).cloned())
    }

    async fn list_entries(
        &self,
        filter: &PayrollFilter,
        page_request: &PageRequest,
    ) -> StoreResult<(Vec<PayrollEntry>, u64)> {
        let rows = self
            .lock()
            .payroll
            .iter()
            .filter(|e| filter.status.is_none_or(|s| e.status == s))
            .filter(|e| filter.period.as_ref().is_none_or(|p| &e.period == p))
            .filter(|e| in_range(e.payroll_date, filter.start_date, filter.end_date))
            .filter(|e| filter.account_id.is_none_or(|a| e.account_id == a))
            .filter(|e| matches_search(&e.employee_name, filter.search.as_ref()))
            .cloned()
            .collect();
        Ok(page(rows, page_request))
    }

    async fn update_draft_entry(&self, entry: &PayrollEntry) -> StoreResult<bool> {
        let mut state = self.lock();
        match state
            .payroll
            .iter_mut()
            .find(|e| e.id == entry.id && e.status == EntryStatus::Draft)
        {
            Some(existing) => {
                *existing = entry.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_draft_entry(&self, id: Uuid) -> StoreResult<bool> {
        let mut state = self.lock();
        let before = state.payroll.len();
        state
            .payroll
            .retain(|e| !(e.id == id && e.status == EntryStatus::Draft));
        Ok(state.payroll.len() < before)
    }

    async fn unposted_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<PayrollEntry>> {
        Ok(self
            .lock()
            .payroll
            .iter()
            .filter(|e| ids.contains(&e.id) && e.status == EntryStatus::Draft)
            .cloned()
            .collect())
    }

    async fn mark_entries_posted(
        &self,
        ids: &[Uuid],
        posted_at: DateTime<Utc>,
    ) -> StoreResult<u64> {
        let mut state = self.lock();
        let mut marked = 0;
        for entry in state
            .payroll
            .iter_mut()
            .filter(|e| ids.contains(&e.id) && e.status == EntryStatus::Draft)
        {
            entry.status = EntryStatus::Posted;
            entry.posted_at = Some(posted_at);
            marked += 1;
        }
        Ok(marked)
    }
}

#[async_trait]
impl LedgerStore for MemoryStore {
    async fn insert_transaction(
        &self,
        tx: NewLedgerTransaction,
    ) -> StoreResult<LedgerTransaction> {
        let mut state = self.lock();
        if state.fail_ledger_after.is_some_and(|n| state.ledger.len() >= n) {
            return Err(StoreError::Backend("injected ledger failure".into()));
        }
        if state.ledger.iter().any(|t| t.code == tx.code) {
            return Err(StoreError::Conflict(format!("transaction code {}", tx.code)));
        }
        let stored = LedgerTransaction {
            id: Uuid::now_v7(),
            code: tx.code,
            entry: tx.entry,
            created_at: Utc::now(),
        };
        state.ledger.push(stored.clone());
        Ok(stored)
    }

    async fn find_transaction(&self, id: Uuid) -> StoreResult<Option<LedgerTransaction>> {
        Ok(self.lock().ledger.iter().find(|t| t.id == id).cloned())
    }

    async fn list_transactions(
        &self,
        filter: &LedgerFilter,
        page_request: &PageRequest,
    ) -> StoreResult<(Vec<LedgerTransaction>, u64)> {
        let mut rows: Vec<LedgerTransaction> = self
            .lock()
            .ledger
            .iter()
            .filter(|t| filter.source_kind.is_none_or(|k| t.entry.source_kind == k))
            .filter(|t| filter.line_type.is_none_or(|l| t.entry.line_type == l))
            .filter(|t| filter.account_id.is_none_or(|a| t.entry.account_id == a))
            .filter(|t| in_range(t.entry.transaction_date, filter.start_date, filter.end_date))
            .filter(|t| matches_search(&t.entry.description, filter.search.as_ref()))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.code.cmp(&a.code));
        Ok(page(rows, page_request))
    }
}

#[async_trait]
impl CodeSource for LedgerCodes {
    async fn current_max(&self) -> StoreResult<Option<String>> {
        Ok(self.0.lock().ledger.iter().map(|t| t.code.clone()).max())
    }
}

#[async_trait]
impl CodeSource for BatchCodes {
    async fn current_max(&self) -> StoreResult<Option<String>> {
        Ok(self.0.lock().batch_codes.iter().max().cloned())
    }
}

/// Catalog item with comma-separated keywords.
pub fn item(code: &str, name: &str, keywords: &str) -> Item {
    Item {
        id: Uuid::new_v4(),
        code: code.to_string(),
        name: name.to_string(),
        keywords: crate::matcher::parse_keywords(keywords),
        unit: None,
        is_active: true,
    }
}
