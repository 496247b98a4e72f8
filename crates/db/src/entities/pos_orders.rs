//! `SeaORM` Entity for pos_orders table.
//!
//! Orders are written by the point-of-sale system; this crate only reads them.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "pos_orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub order_number: String,
    pub outlet_id: Option<Uuid>,
    pub business_date: Date,
    pub channel: String,
    pub payment_method: String,
    /// `open`, `completed` or `cancelled`.
    pub status: String,
    #[sea_orm(column_type = "Decimal(Some((18, 2)))")]
    pub gross_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((18, 2)))")]
    pub discount_amount: Decimal,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
