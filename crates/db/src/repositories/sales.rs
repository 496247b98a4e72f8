//! Sales summary repository and the completed-order aggregate.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveEnum, ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, FromQueryResult,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Statement,
};
use uuid::Uuid;

use tally_core::posting::{
    OrderAggregate, SalesFilter, SalesKey, SalesSelection, SalesStore, SalesSummary,
};
use tally_core::store::StoreResult;
use tally_shared::types::PageRequest;

use super::store_err;
use crate::entities::{sales_summaries, sea_orm_active_enums::EntryStatus};

/// Completed orders grouped by summary key. Channel and method are compared
/// lowercase so they line up with stored summary keys.
const AGGREGATE_COMPLETED_ORDERS_SQL: &str = r"
SELECT
    business_date,
    outlet_id,
    lower(channel) AS channel,
    lower(payment_method) AS payment_method,
    COUNT(*) AS order_count,
    COALESCE(SUM(gross_amount), 0) AS gross_sales,
    COALESCE(SUM(discount_amount), 0) AS discount_total
FROM pos_orders
WHERE status = 'completed'
  AND business_date BETWEEN $1 AND $2
  AND ($3::uuid IS NULL OR outlet_id = $3)
GROUP BY business_date, outlet_id, lower(channel), lower(payment_method)
ORDER BY business_date, outlet_id, channel, payment_method
";

#[derive(Debug, FromQueryResult)]
struct AggregateRow {
    business_date: NaiveDate,
    outlet_id: Option<Uuid>,
    channel: String,
    payment_method: String,
    order_count: i64,
    gross_sales: Decimal,
    discount_total: Decimal,
}

impl From<AggregateRow> for OrderAggregate {
    fn from(row: AggregateRow) -> Self {
        Self {
            key: SalesKey {
                business_date: row.business_date,
                outlet_id: row.outlet_id,
                channel: row.channel,
                payment_method: row.payment_method,
            },
            order_count: row.order_count,
            gross_sales: row.gross_sales,
            discount_total: row.discount_total,
        }
    }
}

/// Sales summary repository over any connection or open transaction.
#[derive(Debug, Clone, Copy)]
pub struct SalesRepository<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> SalesRepository<'a, C> {
    /// Creates a new sales repository.
    #[must_use]
    pub const fn new(db: &'a C) -> Self {
        Self { db }
    }
}

#[async_trait]
impl<C: ConnectionTrait> SalesStore for SalesRepository<'_, C> {
    async fn aggregate_completed_orders(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        outlet_id: Option<Uuid>,
    ) -> StoreResult<Vec<OrderAggregate>> {
        let rows = AggregateRow::find_by_statement(Statement::from_sql_and_values(
            self.db.get_database_backend(),
            AGGREGATE_COMPLETED_ORDERS_SQL,
            [start.into(), end.into(), outlet_id.into()],
        ))
        .all(self.db)
        .await
        .map_err(store_err)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_by_key(&self, key: &SalesKey) -> StoreResult<Option<SalesSummary>> {
        let outlet = match key.outlet_id {
            Some(outlet_id) => sales_summaries::Column::OutletId.eq(outlet_id),
            None => sales_summaries::Column::OutletId.is_null(),
        };

        let model = sales_summaries::Entity::find()
            .filter(sales_summaries::Column::BusinessDate.eq(key.business_date))
            .filter(outlet)
            .filter(sales_summaries::Column::Channel.eq(key.channel.as_str()))
            .filter(sales_summaries::Column::PaymentMethod.eq(key.payment_method.as_str()))
            .one(self.db)
            .await
            .map_err(store_err)?;
        Ok(model.map(Into::into))
    }

    async fn find_summary(&self, id: Uuid) -> StoreResult<Option<SalesSummary>> {
        let model = sales_summaries::Entity::find_by_id(id)
            .one(self.db)
            .await
            .map_err(store_err)?;
        Ok(model.map(Into::into))
    }

    async fn insert_summary(&self, summary: SalesSummary) -> StoreResult<SalesSummary> {
        let model = sales_summaries::ActiveModel::from(&summary)
            .insert(self.db)
            .await
            .map_err(store_err)?;
        Ok(model.into())
    }

    async fn update_draft_summary(&self, summary: &SalesSummary) -> StoreResult<bool> {
        let result = sales_summaries::Entity::update_many()
            .set(sales_summaries::ActiveModel::from(summary))
            .filter(sales_summaries::Column::Id.eq(summary.id))
            .filter(sales_summaries::Column::Status.eq(EntryStatus::Draft))
            .exec(self.db)
            .await
            .map_err(store_err)?;
        Ok(result.rows_affected > 0)
    }

    async fn delete_draft_summary(&self, id: Uuid) -> StoreResult<bool> {
        let result = sales_summaries::Entity::delete_many()
            .filter(sales_summaries::Column::Id.eq(id))
            .filter(sales_summaries::Column::Status.eq(EntryStatus::Draft))
            .exec(self.db)
            .await
            .map_err(store_err)?;
        Ok(result.rows_affected > 0)
    }

    async fn list_summaries(
        &self,
        filter: &SalesFilter,
        page: &PageRequest,
    ) -> StoreResult<(Vec<SalesSummary>, u64)> {
        let mut query = sales_summaries::Entity::find();

        if let Some(start) = filter.start_date {
            query = query.filter(sales_summaries::Column::BusinessDate.gte(start));
        }
        if let Some(end) = filter.end_date {
            query = query.filter(sales_summaries::Column::BusinessDate.lte(end));
        }
        if let Some(outlet_id) = filter.outlet_id {
            query = query.filter(sales_summaries::Column::OutletId.eq(outlet_id));
        }
        if let Some(channel) = &filter.channel {
            query = query.filter(sales_summaries::Column::Channel.eq(channel.to_lowercase()));
        }
        if let Some(method) = &filter.payment_method {
            query = query.filter(sales_summaries::Column::PaymentMethod.eq(method.to_lowercase()));
        }
        if let Some(status) = filter.status {
            query = query.filter(sales_summaries::Column::Status.eq(EntryStatus::from(status)));
        }

        let total = query.clone().count(self.db).await.map_err(store_err)?;
        let rows = query
            .order_by_desc(sales_summaries::Column::BusinessDate)
            .order_by_asc(sales_summaries::Column::Channel)
            .order_by_asc(sales_summaries::Column::PaymentMethod)
            .offset(page.offset())
            .limit(page.limit())
            .all(self.db)
            .await
            .map_err(store_err)?;

        Ok((rows.into_iter().map(Into::into).collect(), total))
    }

    async fn unposted_summaries(
        &self,
        selection: &SalesSelection,
    ) -> StoreResult<Vec<SalesSummary>> {
        let mut query = sales_summaries::Entity::find()
            .filter(sales_summaries::Column::BusinessDate.eq(selection.business_date))
            .filter(sales_summaries::Column::Status.eq(EntryStatus::Draft));

        if let Some(outlet_id) = selection.outlet_id {
            query = query.filter(sales_summaries::Column::OutletId.eq(outlet_id));
        }

        let rows = query
            .order_by_asc(sales_summaries::Column::Channel)
            .order_by_asc(sales_summaries::Column::PaymentMethod)
            .order_by_asc(sales_summaries::Column::Id)
            .all(self.db)
            .await
            .map_err(store_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn mark_summaries_posted(
        &self,
        ids: &[Uuid],
        posted_at: DateTime<Utc>,
    ) -> StoreResult<u64> {
        let result = sales_summaries::Entity::update_many()
            .col_expr(
                sales_summaries::Column::Status,
                Expr::value(EntryStatus::Posted.into_value()),
            )
            .col_expr(sales_summaries::Column::PostedAt, Expr::value(posted_at))
            .col_expr(sales_summaries::Column::UpdatedAt, Expr::value(posted_at))
            .filter(sales_summaries::Column::Id.is_in(ids.to_vec()))
            .filter(sales_summaries::Column::Status.eq(EntryStatus::Draft))
            .exec(self.db)
            .await
            .map_err(store_err)?;
        Ok(result.rows_affected)
    }
}
