//! Payroll entry repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveEnum, ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect,
};
use uuid::Uuid;

use tally_core::posting::{PayrollEntry, PayrollFilter, PayrollStore};
use tally_core::store::StoreResult;
use tally_shared::types::PageRequest;

use super::{search_condition, store_err};
use crate::entities::{payroll_entries, sea_orm_active_enums::EntryStatus};

/// Payroll repository over any connection or open transaction.
#[derive(Debug, Clone, Copy)]
pub struct PayrollRepository<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> PayrollRepository<'a, C> {
    /// Creates a new payroll repository.
    #[must_use]
    pub const fn new(db: &'a C) -> Self {
        Self { db }
    }
}

#[async_trait]
impl<C: ConnectionTrait> PayrollStore for PayrollRepository<'_, C> {
    async fn insert_entries(&self, entries: Vec<PayrollEntry>) -> StoreResult<Vec<PayrollEntry>> {
        let mut inserted = Vec::with_capacity(entries.len());
        for entry in &entries {
            let model = payroll_entries::ActiveModel::from(entry)
                .insert(self.db)
                .await
                .map_err(store_err)?;
            inserted.push(model.into());
        }
        Ok(inserted)
    }

    async fn find_entry(&self, id: Uuid) -> StoreResult<Option<PayrollEntry>> {
        let model = payroll_entries::Entity::find_by_id(id)
            .one(self.db)
            .await
            .map_err(store_err)?;
        Ok(model.map(Into::into))
    }

    async fn list_entries(
        &self,
        filter: &PayrollFilter,
        page: &PageRequest,
    ) -> StoreResult<(Vec<PayrollEntry>, u64)> {
        let mut query = payroll_entries::Entity::find();

        if let Some(period) = &filter.period {
            query = query.filter(payroll_entries::Column::Period.eq(period.as_str()));
        }
        if let Some(status) = filter.status {
            query = query.filter(payroll_entries::Column::Status.eq(EntryStatus::from(status)));
        }
        if let Some(start) = filter.start_date {
            query = query.filter(payroll_entries::Column::PayrollDate.gte(start));
        }
        if let Some(end) = filter.end_date {
            query = query.filter(payroll_entries::Column::PayrollDate.lte(end));
        }
        if let Some(account_id) = filter.account_id {
            query = query.filter(payroll_entries::Column::AccountId.eq(account_id));
        }
        if let Some(search) = &filter.search {
            query = query.filter(search_condition(payroll_entries::Column::EmployeeName, search));
        }

        let total = query.clone().count(self.db).await.map_err(store_err)?;
        let rows = query
            .order_by_desc(payroll_entries::Column::PayrollDate)
            .order_by_asc(payroll_entries::Column::EmployeeName)
            .offset(page.offset())
            .limit(page.limit())
            .all(self.db)
            .await
            .map_err(store_err)?;

        Ok((rows.into_iter().map(Into::into).collect(), total))
    }

    async fn update_draft_entry(&self, entry: &PayrollEntry) -> StoreResult<bool> {
        let result = payroll_entries::Entity::update_many()
            .set(payroll_entries::ActiveModel::from(entry))
            .filter(payroll_entries::Column::Id.eq(entry.id))
            .filter(payroll_entries::Column::Status.eq(EntryStatus::Draft))
            .exec(self.db)
            .await
            .map_err(store_err)?;
        Ok(result.rows_affected > 0)
    }

    async fn delete_draft_entry(&self, id: Uuid) -> StoreResult<bool> {
        let result = payroll_entries::Entity::delete_many()
            .filter(payroll_entries::Column::Id.eq(id))
            .filter(payroll_entries::Column::Status.eq(EntryStatus::Draft))
            .exec(self.db)
            .await
            .map_err(store_err)?;
        Ok(result.rows_affected > 0)
    }

    async fn unposted_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<PayrollEntry>> {
        let rows = payroll_entries::Entity::find()
            .filter(payroll_entries::Column::Id.is_in(ids.to_vec()))
            .filter(payroll_entries::Column::Status.eq(EntryStatus::Draft))
            .order_by_asc(payroll_entries::Column::Id)
            .all(self.db)
            .await
            .map_err(store_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn mark_entries_posted(
        &self,
        ids: &[Uuid],
        posted_at: DateTime<Utc>,
    ) -> StoreResult<u64> {
        let result = payroll_entries::Entity::update_many()
            .col_expr(
                payroll_entries::Column::Status,
                Expr::value(EntryStatus::Posted.into_value()),
            )
            .col_expr(payroll_entries::Column::PostedAt, Expr::value(posted_at))
            .col_expr(payroll_entries::Column::UpdatedAt, Expr::value(posted_at))
            .filter(payroll_entries::Column::Id.is_in(ids.to_vec()))
            .filter(payroll_entries::Column::Status.eq(EntryStatus::Draft))
            .exec(self.db)
            .await
            .map_err(store_err)?;
        Ok(result.rows_affected)
    }
}
