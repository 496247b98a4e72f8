//! `SeaORM` Entity for cash_transactions table.
//!
//! Rows are append-only: nothing in this crate updates or deletes them.

use chrono::Utc;
use sea_orm::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{LineType, SourceKind};
use tally_core::posting::{LedgerDraft, LedgerTransaction, NewLedgerTransaction};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "cash_transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub code: String,
    pub transaction_date: Date,
    pub item_id: Option<Uuid>,
    pub description: String,
    #[sea_orm(column_type = "Decimal(Some((18, 4)))")]
    pub quantity: Decimal,
    #[sea_orm(column_type = "Decimal(Some((28, 10)))")]
    pub unit_price: Decimal,
    #[sea_orm(column_type = "Decimal(Some((18, 2)))")]
    pub amount: Decimal,
    pub line_type: LineType,
    pub account_id: Uuid,
    pub cash_account_id: Option<Uuid>,
    pub outlet_id: Option<Uuid>,
    pub batch_code: Option<String>,
    pub source_kind: SourceKind,
    pub source_id: Uuid,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for LedgerTransaction {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            code: model.code,
            entry: LedgerDraft {
                transaction_date: model.transaction_date,
                item_id: model.item_id,
                description: model.description,
                quantity: model.quantity,
                unit_price: model.unit_price,
                amount: model.amount,
                line_type: model.line_type.into(),
                account_id: model.account_id,
                cash_account_id: model.cash_account_id,
                outlet_id: model.outlet_id,
                batch_code: model.batch_code,
                source_kind: model.source_kind.into(),
                source_id: model.source_id,
            },
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<NewLedgerTransaction> for ActiveModel {
    fn from(tx: NewLedgerTransaction) -> Self {
        let entry = tx.entry;
        Self {
            id: Set(Uuid::now_v7()),
            code: Set(tx.code),
            transaction_date: Set(entry.transaction_date),
            item_id: Set(entry.item_id),
            description: Set(entry.description),
            quantity: Set(entry.quantity),
            unit_price: Set(entry.unit_price),
            amount: Set(entry.amount),
            line_type: Set(entry.line_type.into()),
            account_id: Set(entry.account_id),
            cash_account_id: Set(entry.cash_account_id),
            outlet_id: Set(entry.outlet_id),
            batch_code: Set(entry.batch_code),
            source_kind: Set(entry.source_kind.into()),
            source_id: Set(entry.source_id),
            created_at: Set(Utc::now().into()),
        }
    }
}
