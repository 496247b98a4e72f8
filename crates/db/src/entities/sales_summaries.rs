//! `SeaORM` Entity for sales_summaries table.

use chrono::Utc;
use sea_orm::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::EntryStatus;
use tally_core::posting::{SalesKey, SalesSummary};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "sales_summaries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub business_date: Date,
    pub outlet_id: Option<Uuid>,
    pub channel: String,
    pub payment_method: String,
    pub order_count: i64,
    #[sea_orm(column_type = "Decimal(Some((18, 2)))")]
    pub gross_sales: Decimal,
    #[sea_orm(column_type = "Decimal(Some((18, 2)))")]
    pub discount_total: Decimal,
    #[sea_orm(column_type = "Decimal(Some((18, 2)))")]
    pub net_sales: Decimal,
    pub account_id: Uuid,
    pub cash_account_id: Option<Uuid>,
    pub status: EntryStatus,
    pub posted_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for SalesSummary {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            key: SalesKey {
                business_date: model.business_date,
                outlet_id: model.outlet_id,
                channel: model.channel,
                payment_method: model.payment_method,
            },
            order_count: model.order_count,
            gross_sales: model.gross_sales,
            discount_total: model.discount_total,
            net_sales: model.net_sales,
            account_id: model.account_id,
            cash_account_id: model.cash_account_id,
            status: model.status.into(),
            posted_at: model.posted_at.map(|t| t.with_timezone(&Utc)),
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

impl From<&SalesSummary> for ActiveModel {
    fn from(summary: &SalesSummary) -> Self {
        Self {
            id: Set(summary.id),
            business_date: Set(summary.key.business_date),
            outlet_id: Set(summary.key.outlet_id),
            channel: Set(summary.key.channel.clone()),
            payment_method: Set(summary.key.payment_method.clone()),
            order_count: Set(summary.order_count),
            gross_sales: Set(summary.gross_sales),
            discount_total: Set(summary.discount_total),
            net_sales: Set(summary.net_sales),
            account_id: Set(summary.account_id),
            cash_account_id: Set(summary.cash_account_id),
            status: Set(summary.status.into()),
            posted_at: Set(summary.posted_at.map(Into::into)),
            created_at: Set(summary.created_at.into()),
            updated_at: Set(summary.updated_at.into()),
        }
    }
}
