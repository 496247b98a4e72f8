//! Ledger repository: append-only cash transactions and their codes.

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use uuid::Uuid;

use tally_core::posting::{
    CodeSource, LedgerFilter, LedgerStore, LedgerTransaction, NewLedgerTransaction,
};
use tally_core::store::StoreResult;
use tally_shared::types::PageRequest;

use super::{search_condition, store_err};
use crate::entities::{cash_transactions, sea_orm_active_enums::{LineType, SourceKind}};

/// Ledger repository over any connection or open transaction.
#[derive(Debug, Clone, Copy)]
pub struct LedgerRepository<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> LedgerRepository<'a, C> {
    /// Creates a new ledger repository.
    #[must_use]
    pub const fn new(db: &'a C) -> Self {
        Self { db }
    }
}

#[async_trait]
impl<C: ConnectionTrait> LedgerStore for LedgerRepository<'_, C> {
    async fn insert_transaction(&self, tx: NewLedgerTransaction) -> StoreResult<LedgerTransaction> {
        let model = cash_transactions::ActiveModel::from(tx)
            .insert(self.db)
            .await
            .map_err(store_err)?;
        Ok(model.into())
    }

    async fn find_transaction(&self, id: Uuid) -> StoreResult<Option<LedgerTransaction>> {
        let model = cash_transactions::Entity::find_by_id(id)
            .one(self.db)
            .await
            .map_err(store_err)?;
        Ok(model.map(Into::into))
    }

    async fn list_transactions(
        &self,
        filter: &LedgerFilter,
        page: &PageRequest,
    ) -> StoreResult<(Vec<LedgerTransaction>, u64)> {
        let mut query = cash_transactions::Entity::find();

        if let Some(start) = filter.start_date {
            query = query.filter(cash_transactions::Column::TransactionDate.gte(start));
        }
        if let Some(end) = filter.end_date {
            query = query.filter(cash_transactions::Column::TransactionDate.lte(end));
        }
        if let Some(line_type) = filter.line_type {
            query = query.filter(cash_transactions::Column::LineType.eq(LineType::from(line_type)));
        }
        if let Some(account_id) = filter.account_id {
            query = query.filter(cash_transactions::Column::AccountId.eq(account_id));
        }
        if let Some(source_kind) = filter.source_kind {
            query = query
                .filter(cash_transactions::Column::SourceKind.eq(SourceKind::from(source_kind)));
        }
        if let Some(batch_code) = &filter.batch_code {
            query = query.filter(cash_transactions::Column::BatchCode.eq(batch_code.as_str()));
        }
        if let Some(outlet_id) = filter.outlet_id {
            query = query.filter(cash_transactions::Column::OutletId.eq(outlet_id));
        }
        if let Some(search) = &filter.search {
            query = query.filter(search_condition(cash_transactions::Column::Description, search));
        }

        let total = query.clone().count(self.db).await.map_err(store_err)?;
        let rows = query
            .order_by_desc(cash_transactions::Column::Code)
            .offset(page.offset())
            .limit(page.limit())
            .all(self.db)
            .await
            .map_err(store_err)?;

        Ok((rows.into_iter().map(Into::into).collect(), total))
    }
}

/// Highest issued transaction code with a given prefix.
#[derive(Debug, Clone)]
pub struct TransactionCodes<'a, C> {
    db: &'a C,
    prefix: String,
}

impl<'a, C: ConnectionTrait> TransactionCodes<'a, C> {
    /// Creates a code source for transaction codes starting with `prefix`.
    #[must_use]
    pub fn new(db: &'a C, prefix: impl Into<String>) -> Self {
        Self {
            db,
            prefix: prefix.into(),
        }
    }
}

#[async_trait]
impl<C: ConnectionTrait> CodeSource for TransactionCodes<'_, C> {
    async fn current_max(&self) -> StoreResult<Option<String>> {
        let max: Option<Option<String>> = cash_transactions::Entity::find()
            .select_only()
            .column_as(Expr::col(cash_transactions::Column::Code).max(), "max_code")
            .filter(cash_transactions::Column::Code.starts_with(&self.prefix))
            .into_tuple()
            .one(self.db)
            .await
            .map_err(store_err)?;
        Ok(max.flatten())
    }
}
