//! Reimbursement repository.
//!
//! Every mutation is guarded on the row's current status, so a Ready or
//! Posted entry is never changed by an update, delete or batch call.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveEnum, ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect,
};
use uuid::Uuid;

use tally_core::posting::{CodeSource, DraftEntry, DraftFilter, ReimbursementStore};
use tally_core::store::StoreResult;
use tally_shared::types::PageRequest;

use super::{search_condition, store_err};
use crate::entities::reimbursements;
use crate::entities::sea_orm_active_enums::{EntryStatus, LineType};

/// Reimbursement repository over any connection or open transaction.
#[derive(Debug)]
pub struct ReimbursementRepository<'a, C> {
    db: &'a C,
}

impl<C> Clone for ReimbursementRepository<'_, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for ReimbursementRepository<'_, C> {}

impl<'a, C: ConnectionTrait> ReimbursementRepository<'a, C> {
    /// Creates a new reimbursement repository.
    #[must_use]
    pub const fn new(db: &'a C) -> Self {
        Self { db }
    }
}

#[async_trait]
impl<C: ConnectionTrait> ReimbursementStore for ReimbursementRepository<'_, C> {
    async fn insert_entry(&self, entry: DraftEntry) -> StoreResult<DraftEntry> {
        let model = reimbursements::ActiveModel::from(&entry)
            .insert(self.db)
            .await
            .map_err(store_err)?;
        Ok(model.into())
    }

    async fn find_entry(&self, id: Uuid) -> StoreResult<Option<DraftEntry>> {
        let model = reimbursements::Entity::find_by_id(id)
            .one(self.db)
            .await
            .map_err(store_err)?;
        Ok(model.map(Into::into))
    }

    async fn list_entries(
        &self,
        filter: &DraftFilter,
        page: &PageRequest,
    ) -> StoreResult<(Vec<DraftEntry>, u64)> {
        let mut query = reimbursements::Entity::find();

        if let Some(status) = filter.status {
            query = query.filter(reimbursements::Column::Status.eq(EntryStatus::from(status)));
        }
        if let Some(batch_code) = &filter.batch_code {
            query = query.filter(reimbursements::Column::BatchCode.eq(batch_code.as_str()));
        }
        if let Some(requested_by) = &filter.requested_by {
            query = query.filter(reimbursements::Column::RequestedBy.eq(requested_by.as_str()));
        }
        if let Some(start) = filter.start_date {
            query = query.filter(reimbursements::Column::EntryDate.gte(start));
        }
        if let Some(end) = filter.end_date {
            query = query.filter(reimbursements::Column::EntryDate.lte(end));
        }
        if let Some(line_type) = filter.line_type {
            query = query.filter(reimbursements::Column::LineType.eq(LineType::from(line_type)));
        }
        if let Some(account_id) = filter.account_id {
            query = query.filter(reimbursements::Column::AccountId.eq(account_id));
        }
        if let Some(search) = &filter.search {
            query = query.filter(search_condition(reimbursements::Column::Description, search));
        }

        let total = query.clone().count(self.db).await.map_err(store_err)?;
        let rows = query
            .order_by_desc(reimbursements::Column::EntryDate)
            .order_by_desc(reimbursements::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(self.db)
            .await
            .map_err(store_err)?;

        Ok((rows.into_iter().map(Into::into).collect(), total))
    }

    async fn update_draft(&self, entry: &DraftEntry) -> StoreResult<bool> {
        let result = reimbursements::Entity::update_many()
            .set(reimbursements::ActiveModel::from(entry))
            .filter(reimbursements::Column::Id.eq(entry.id))
            .filter(reimbursements::Column::Status.eq(EntryStatus::Draft))
            .exec(self.db)
            .await
            .map_err(store_err)?;
        Ok(result.rows_affected > 0)
    }

    async fn delete_draft(&self, id: Uuid) -> StoreResult<bool> {
        let result = reimbursements::Entity::delete_many()
            .filter(reimbursements::Column::Id.eq(id))
            .filter(reimbursements::Column::Status.eq(EntryStatus::Draft))
            .exec(self.db)
            .await
            .map_err(store_err)?;
        Ok(result.rows_affected > 0)
    }

    async fn assign_batch(&self, ids: &[Uuid], batch_code: &str) -> StoreResult<u64> {
        let result = reimbursements::Entity::update_many()
            .col_expr(
                reimbursements::Column::Status,
                Expr::value(EntryStatus::Ready.into_value()),
            )
            .col_expr(
                reimbursements::Column::BatchCode,
                Expr::value(Some(batch_code.to_string())),
            )
            .col_expr(reimbursements::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(reimbursements::Column::Id.is_in(ids.to_vec()))
            .filter(reimbursements::Column::Status.eq(EntryStatus::Draft))
            .exec(self.db)
            .await
            .map_err(store_err)?;
        Ok(result.rows_affected)
    }

    async fn ready_in_batch(&self, batch_code: &str) -> StoreResult<Vec<DraftEntry>> {
        let rows = reimbursements::Entity::find()
            .filter(reimbursements::Column::BatchCode.eq(batch_code))
            .filter(reimbursements::Column::Status.eq(EntryStatus::Ready))
            .order_by_asc(reimbursements::Column::CreatedAt)
            .order_by_asc(reimbursements::Column::Id)
            .all(self.db)
            .await
            .map_err(store_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn mark_batch_posted(
        &self,
        batch_code: &str,
        posted_at: DateTime<Utc>,
    ) -> StoreResult<u64> {
        let result = reimbursements::Entity::update_many()
            .col_expr(
                reimbursements::Column::Status,
                Expr::value(EntryStatus::Posted.into_value()),
            )
            .col_expr(reimbursements::Column::PostedAt, Expr::value(posted_at))
            .col_expr(reimbursements::Column::UpdatedAt, Expr::value(posted_at))
            .filter(reimbursements::Column::BatchCode.eq(batch_code))
            .filter(reimbursements::Column::Status.eq(EntryStatus::Ready))
            .exec(self.db)
            .await
            .map_err(store_err)?;
        Ok(result.rows_affected)
    }
}

/// Highest batch code issued so far.
#[derive(Debug, Clone)]
pub struct BatchCodes<'a, C> {
    db: &'a C,
    prefix: String,
}

impl<'a, C: ConnectionTrait> BatchCodes<'a, C> {
    /// Creates a code source for batch codes starting with `prefix`.
    #[must_use]
    pub fn new(db: &'a C, prefix: impl Into<String>) -> Self {
        Self {
            db,
            prefix: prefix.into(),
        }
    }
}

#[async_trait]
impl<C: ConnectionTrait> CodeSource for BatchCodes<'_, C> {
    async fn current_max(&self) -> StoreResult<Option<String>> {
        let max: Option<Option<String>> = reimbursements::Entity::find()
            .select_only()
            .column_as(Expr::col(reimbursements::Column::BatchCode).max(), "max_code")
            .filter(reimbursements::Column::BatchCode.starts_with(&self.prefix))
            .into_tuple()
            .one(self.db)
            .await
            .map_err(store_err)?;
        Ok(max.flatten())
    }
}
