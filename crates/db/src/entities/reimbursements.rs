//! `SeaORM` Entity for reimbursements table.

use chrono::Utc;
use sea_orm::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{EntryStatus, LineType};
use tally_core::posting::DraftEntry;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "reimbursements")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub entry_date: Date,
    pub item_id: Option<Uuid>,
    pub description: String,
    #[sea_orm(column_type = "Decimal(Some((18, 4)))")]
    pub quantity: Decimal,
    pub unit: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((28, 10)))")]
    pub unit_price: Decimal,
    #[sea_orm(column_type = "Decimal(Some((18, 2)))")]
    pub amount: Decimal,
    pub line_type: LineType,
    pub account_id: Uuid,
    pub cash_account_id: Option<Uuid>,
    pub outlet_id: Option<Uuid>,
    pub status: EntryStatus,
    pub batch_code: Option<String>,
    pub requested_by: String,
    pub receipt_ref: Option<String>,
    pub posted_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for DraftEntry {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            entry_date: model.entry_date,
            item_id: model.item_id,
            description: model.description,
            quantity: model.quantity,
            unit: model.unit,
            unit_price: model.unit_price,
            amount: model.amount,
            line_type: model.line_type.into(),
            account_id: model.account_id,
            cash_account_id: model.cash_account_id,
            outlet_id: model.outlet_id,
            status: model.status.into(),
            batch_code: model.batch_code,
            requested_by: model.requested_by,
            receipt_ref: model.receipt_ref,
            posted_at: model.posted_at.map(|t| t.with_timezone(&Utc)),
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

impl From<&DraftEntry> for ActiveModel {
    fn from(entry: &DraftEntry) -> Self {
        Self {
            id: Set(entry.id),
            entry_date: Set(entry.entry_date),
            item_id: Set(entry.item_id),
            description: Set(entry.description.clone()),
            quantity: Set(entry.quantity),
            unit: Set(entry.unit.clone()),
            unit_price: Set(entry.unit_price),
            amount: Set(entry.amount),
            line_type: Set(entry.line_type.into()),
            account_id: Set(entry.account_id),
            cash_account_id: Set(entry.cash_account_id),
            outlet_id: Set(entry.outlet_id),
            status: Set(entry.status.into()),
            batch_code: Set(entry.batch_code.clone()),
            requested_by: Set(entry.requested_by.clone()),
            receipt_ref: Set(entry.receipt_ref.clone()),
            posted_at: Set(entry.posted_at.map(Into::into)),
            created_at: Set(entry.created_at.into()),
            updated_at: Set(entry.updated_at.into()),
        }
    }
}
