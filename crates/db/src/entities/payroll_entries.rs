//! `SeaORM` Entity for payroll_entries table.

use chrono::Utc;
use sea_orm::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::EntryStatus;
use tally_core::posting::PayrollEntry;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "payroll_entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub payroll_date: Date,
    pub period: String,
    pub employee_name: String,
    #[sea_orm(column_type = "Decimal(Some((18, 2)))")]
    pub gross_pay: Decimal,
    pub payment_method: String,
    pub account_id: Uuid,
    pub cash_account_id: Option<Uuid>,
    pub outlet_id: Option<Uuid>,
    pub status: EntryStatus,
    pub created_by: String,
    pub posted_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for PayrollEntry {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            payroll_date: model.payroll_date,
            period: model.period,
            employee_name: model.employee_name,
            gross_pay: model.gross_pay,
            payment_method: model.payment_method,
            account_id: model.account_id,
            cash_account_id: model.cash_account_id,
            outlet_id: model.outlet_id,
            status: model.status.into(),
            created_by: model.created_by,
            posted_at: model.posted_at.map(|t| t.with_timezone(&Utc)),
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

impl From<&PayrollEntry> for ActiveModel {
    fn from(entry: &PayrollEntry) -> Self {
        Self {
            id: Set(entry.id),
            payroll_date: Set(entry.payroll_date),
            period: Set(entry.period.clone()),
            employee_name: Set(entry.employee_name.clone()),
            gross_pay: Set(entry.gross_pay),
            payment_method: Set(entry.payment_method.clone()),
            account_id: Set(entry.account_id),
            cash_account_id: Set(entry.cash_account_id),
            outlet_id: Set(entry.outlet_id),
            status: Set(entry.status.into()),
            created_by: Set(entry.created_by.clone()),
            posted_at: Set(entry.posted_at.map(Into::into)),
            created_at: Set(entry.created_at.into()),
            updated_at: Set(entry.updated_at.into()),
        }
    }
}
