//! Daily sales summaries aggregated from completed point-of-sale orders.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use tally_shared::types::{PageRequest, PageResponse, round_money};

use super::code::CodeAllocator;
use super::engine::{DraftLedgerSource, PostOutcome, PostingEngine};
use super::error::PostingError;
use super::ledger::{LedgerDraft, LedgerStore};
use super::types::{EntryStatus, LineType, SourceKind};
use crate::store::StoreResult;

/// Natural key of a sales summary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SalesKey {
    pub business_date: NaiveDate,
    pub outlet_id: Option<Uuid>,
    pub channel: String,
    pub payment_method: String,
}

/// Completed orders for one key, summed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderAggregate {
    pub key: SalesKey,
    pub order_count: i64,
    pub gross_sales: Decimal,
    pub discount_total: Decimal,
}

/// One day of sales for an outlet, channel and payment method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesSummary {
    pub id: Uuid,
    #[serde(flatten)]
    pub key: SalesKey,
    pub order_count: i64,
    pub gross_sales: Decimal,
    pub discount_total: Decimal,
    pub net_sales: Decimal,
    pub account_id: Uuid,
    pub cash_account_id: Option<Uuid>,
    pub status: EntryStatus,
    pub posted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for a manually entered summary.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewSalesSummary {
    #[serde(flatten)]
    pub key: SalesKey,
    pub order_count: i64,
    pub gross_sales: Decimal,
    #[serde(default)]
    pub discount_total: Decimal,
    pub account_id: Uuid,
    pub cash_account_id: Option<Uuid>,
}

/// Partial update of a Draft summary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SalesPatch {
    pub order_count: Option<i64>,
    pub gross_sales: Option<Decimal>,
    pub discount_total: Option<Decimal>,
    pub account_id: Option<Uuid>,
    pub cash_account_id: Option<Uuid>,
}

/// Filters for listing summaries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SalesFilter {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub outlet_id: Option<Uuid>,
    pub channel: Option<String>,
    pub payment_method: Option<String>,
    pub status: Option<EntryStatus>,
}

/// Which completed orders to aggregate and how to book them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SalesSyncRequest {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub outlet_id: Option<Uuid>,
    pub account_id: Uuid,
    pub cash_account_id: Option<Uuid>,
}

/// Result of a sync run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncOutcome {
    pub created: usize,
    pub updated: usize,
    pub skipped_posted: usize,
    pub summaries: Vec<SalesSummary>,
}

/// The summaries a sales post call covers: one date, one outlet or all.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SalesSelection {
    pub business_date: NaiveDate,
    pub outlet_id: Option<Uuid>,
}

/// Persistence contract for sales summaries.
#[async_trait]
pub trait SalesStore: Send + Sync {
    /// Completed orders in `[start, end]` grouped by summary key.
    async fn aggregate_completed_orders(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        outlet_id: Option<Uuid>,
    ) -> StoreResult<Vec<OrderAggregate>>;

    async fn find_by_key(&self, key: &SalesKey) -> StoreResult<Option<SalesSummary>>;

    async fn find_summary(&self, id: Uuid) -> StoreResult<Option<SalesSummary>>;

    async fn insert_summary(&self, summary: SalesSummary) -> StoreResult<SalesSummary>;

    /// Overwrites a summary that is still Draft.
    async fn update_draft_summary(&self, summary: &SalesSummary) -> StoreResult<bool>;

    async fn delete_draft_summary(&self, id: Uuid) -> StoreResult<bool>;

    async fn list_summaries(
        &self,
        filter: &SalesFilter,
        page: &PageRequest,
    ) -> StoreResult<(Vec<SalesSummary>, u64)>;

    /// Draft summaries matching the selection.
    async fn unposted_summaries(&self, selection: &SalesSelection)
    -> StoreResult<Vec<SalesSummary>>;

    async fn mark_summaries_posted(&self, ids: &[Uuid], posted_at: DateTime<Utc>)
    -> StoreResult<u64>;
}

/// Sales summary lifecycle.
pub struct SalesService<S> {
    store: S,
}

impl<S: SalesStore> SalesService<S> {
    /// Creates the service on top of `store`.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Aggregates completed orders into Draft summaries.
    ///
    /// Existing Draft summaries are overwritten with the fresh totals, so
    /// repeated syncs converge. Posted summaries are never touched.
    pub async fn sync(&self, request: &SalesSyncRequest) -> Result<SyncOutcome, PostingError> {
        if request.start_date > request.end_date {
            return Err(PostingError::validation(
                "end_date",
                "must not be before start_date",
            ));
        }
        require_account(request.account_id)?;

        let aggregates = self
            .store
            .aggregate_completed_orders(request.start_date, request.end_date, request.outlet_id)
            .await?;

        let mut outcome = SyncOutcome::default();
        for aggregate in aggregates {
            match self.store.find_by_key(&aggregate.key).await? {
                Some(existing) if existing.status == EntryStatus::Posted => {
                    debug!(summary_id = %existing.id, "Sales summary already posted, skipping");
                    outcome.skipped_posted += 1;
                }
                Some(mut existing) => {
                    existing.order_count = aggregate.order_count;
                    existing.gross_sales = aggregate.gross_sales;
                    existing.discount_total = aggregate.discount_total;
                    existing.net_sales = net_sales(aggregate.gross_sales, aggregate.discount_total);
                    existing.account_id = request.account_id;
                    existing.cash_account_id = request.cash_account_id;
                    existing.updated_at = Utc::now();
                    if self.store.update_draft_summary(&existing).await? {
                        outcome.updated += 1;
                        outcome.summaries.push(existing);
                    } else {
                        outcome.skipped_posted += 1;
                    }
                }
                None => {
                    let summary = build_summary(
                        aggregate.key,
                        aggregate.order_count,
                        aggregate.gross_sales,
                        aggregate.discount_total,
                        request.account_id,
                        request.cash_account_id,
                    );
                    outcome.summaries.push(self.store.insert_summary(summary).await?);
                    outcome.created += 1;
                }
            }
        }

        info!(
            start = %request.start_date,
            end = %request.end_date,
            created = outcome.created,
            updated = outcome.updated,
            skipped = outcome.skipped_posted,
            "Sales summaries synced"
        );
        Ok(outcome)
    }

    /// Creates a summary by hand.
    pub async fn create(&self, input: NewSalesSummary) -> Result<SalesSummary, PostingError> {
        let key = normalize_key(input.key)?;
        validate_totals(input.order_count, input.gross_sales, input.discount_total)?;
        require_account(input.account_id)?;

        if self.store.find_by_key(&key).await?.is_some() {
            return Err(PostingError::Conflict(format!(
                "Sales summary for {} {}/{} already exists",
                key.business_date, key.channel, key.payment_method
            )));
        }

        let summary = build_summary(
            key,
            input.order_count,
            input.gross_sales,
            input.discount_total,
            input.account_id,
            input.cash_account_id,
        );
        let summary = self.store.insert_summary(summary).await?;
        info!(summary_id = %summary.id, net_sales = %summary.net_sales, "Sales summary created");
        Ok(summary)
    }

    /// Loads one summary.
    pub async fn get(&self, id: Uuid) -> Result<SalesSummary, PostingError> {
        self.store
            .find_summary(id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    /// Lists summaries.
    pub async fn list(
        &self,
        filter: &SalesFilter,
        page: &PageRequest,
    ) -> Result<PageResponse<SalesSummary>, PostingError> {
        let (data, total) = self.store.list_summaries(filter, page).await?;
        Ok(PageResponse::new(data, page, total))
    }

    /// Edits a Draft summary.
    pub async fn update(&self, id: Uuid, patch: SalesPatch) -> Result<SalesSummary, PostingError> {
        let mut summary = self
            .store
            .find_summary(id)
            .await?
            .filter(|s| s.status.is_editable())
            .ok_or_else(|| not_found(id))?;

        if let Some(order_count) = patch.order_count {
            summary.order_count = order_count;
        }
        if let Some(gross_sales) = patch.gross_sales {
            summary.gross_sales = gross_sales;
        }
        if let Some(discount_total) = patch.discount_total {
            summary.discount_total = discount_total;
        }
        if let Some(account_id) = patch.account_id {
            summary.account_id = account_id;
        }
        if let Some(cash_account_id) = patch.cash_account_id {
            summary.cash_account_id = Some(cash_account_id);
        }
        validate_totals(summary.order_count, summary.gross_sales, summary.discount_total)?;
        require_account(summary.account_id)?;
        summary.net_sales = net_sales(summary.gross_sales, summary.discount_total);
        summary.updated_at = Utc::now();

        if !self.store.update_draft_summary(&summary).await? {
            return Err(not_found(id));
        }
        info!(summary_id = %id, "Sales summary updated");
        Ok(summary)
    }

    /// Deletes a Draft summary.
    pub async fn delete(&self, id: Uuid) -> Result<(), PostingError> {
        if !self.store.delete_draft_summary(id).await? {
            return Err(not_found(id));
        }
        info!(summary_id = %id, "Sales summary deleted");
        Ok(())
    }

    /// Posts every Draft summary for a date, optionally limited to one outlet.
    pub async fn post<L, C>(
        &self,
        engine: &PostingEngine<L, C>,
        selection: &SalesSelection,
    ) -> Result<PostOutcome, PostingError>
    where
        L: LedgerStore,
        C: CodeAllocator,
    {
        engine.post(self, selection).await
    }
}

#[async_trait]
impl<S: SalesStore> DraftLedgerSource for SalesService<S> {
    type Selection = SalesSelection;
    type Row = SalesSummary;

    const KIND: SourceKind = SourceKind::Sales;

    async fn select_unposted(&self, selection: &SalesSelection) -> StoreResult<Vec<SalesSummary>> {
        self.store.unposted_summaries(selection).await
    }

    fn to_ledger(&self, _selection: &SalesSelection, row: &SalesSummary) -> LedgerDraft {
        LedgerDraft {
            transaction_date: row.key.business_date,
            item_id: None,
            description: format!(
                "Sales {} / {} ({} orders)",
                row.key.channel, row.key.payment_method, row.order_count
            ),
            quantity: Decimal::ONE,
            unit_price: row.net_sales,
            amount: row.net_sales,
            line_type: LineType::Sales,
            account_id: row.account_id,
            cash_account_id: row.cash_account_id,
            outlet_id: row.key.outlet_id,
            batch_code: None,
            source_kind: SourceKind::Sales,
            source_id: row.id,
        }
    }

    async fn mark_posted(
        &self,
        _selection: &SalesSelection,
        rows: &[SalesSummary],
        posted_at: DateTime<Utc>,
    ) -> StoreResult<u64> {
        let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
        self.store.mark_summaries_posted(&ids, posted_at).await
    }
}

/// Gross minus discounts at money precision.
#[must_use]
pub fn net_sales(gross_sales: Decimal, discount_total: Decimal) -> Decimal {
    round_money(gross_sales - discount_total)
}

fn build_summary(
    key: SalesKey,
    order_count: i64,
    gross_sales: Decimal,
    discount_total: Decimal,
    account_id: Uuid,
    cash_account_id: Option<Uuid>,
) -> SalesSummary {
    let now = Utc::now();
    SalesSummary {
        id: Uuid::now_v7(),
        key,
        order_count,
        gross_sales,
        discount_total,
        net_sales: net_sales(gross_sales, discount_total),
        account_id,
        cash_account_id,
        status: EntryStatus::Draft,
        posted_at: None,
        created_at: now,
        updated_at: now,
    }
}

fn normalize_key(key: SalesKey) -> Result<SalesKey, PostingError> {
    let channel = key.channel.trim().to_lowercase();
    let payment_method = key.payment_method.trim().to_lowercase();
    if channel.is_empty() {
        return Err(PostingError::validation("channel", "must not be empty"));
    }
    if payment_method.is_empty() {
        return Err(PostingError::validation("payment_method", "must not be empty"));
    }
    Ok(SalesKey {
        channel,
        payment_method,
        ..key
    })
}

fn validate_totals(
    order_count: i64,
    gross_sales: Decimal,
    discount_total: Decimal,
) -> Result<(), PostingError> {
    if order_count < 0 {
        return Err(PostingError::validation("order_count", "must not be negative"));
    }
    if gross_sales < Decimal::ZERO {
        return Err(PostingError::validation("gross_sales", "must not be negative"));
    }
    if discount_total < Decimal::ZERO || discount_total > gross_sales {
        return Err(PostingError::validation(
            "discount_total",
            "must be between zero and gross_sales",
        ));
    }
    Ok(())
}

fn require_account(account_id: Uuid) -> Result<(), PostingError> {
    if account_id.is_nil() {
        return Err(PostingError::validation("account_id", "is required"));
    }
    Ok(())
}

fn not_found(id: Uuid) -> PostingError {
    PostingError::NotFound(format!("Draft sales summary {id}"))
}
