//! String-backed enum columns and their conversions to core types.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use tally_core::posting;

/// `line_type` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum LineType {
    #[sea_orm(string_value = "INVENTORY")]
    Inventory,
    #[sea_orm(string_value = "EXPENSE")]
    Expense,
    #[sea_orm(string_value = "SALES")]
    Sales,
    #[sea_orm(string_value = "COGS")]
    Cogs,
    #[sea_orm(string_value = "ASSET")]
    Asset,
    #[sea_orm(string_value = "LIABILITY")]
    Liability,
    #[sea_orm(string_value = "CAPITAL")]
    Capital,
    #[sea_orm(string_value = "DRAWING")]
    Drawing,
}

/// `status` column of every draft table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum EntryStatus {
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "ready")]
    Ready,
    #[sea_orm(string_value = "posted")]
    Posted,
}

/// `source_kind` column of ledger transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum SourceKind {
    #[sea_orm(string_value = "reimbursement")]
    Reimbursement,
    #[sea_orm(string_value = "sales")]
    Sales,
    #[sea_orm(string_value = "payroll")]
    Payroll,
}

impl From<posting::LineType> for LineType {
    fn from(value: posting::LineType) -> Self {
        match value {
            posting::LineType::Inventory => Self::Inventory,
            posting::LineType::Expense => Self::Expense,
            posting::LineType::Sales => Self::Sales,
            posting::LineType::Cogs => Self::Cogs,
            posting::LineType::Asset => Self::Asset,
            posting::LineType::Liability => Self::Liability,
            posting::LineType::Capital => Self::Capital,
            posting::LineType::Drawing => Self::Drawing,
        }
    }
}

impl From<LineType> for posting::LineType {
    fn from(value: LineType) -> Self {
        match value {
            LineType::Inventory => Self::Inventory,
            LineType::Expense => Self::Expense,
            LineType::Sales => Self::Sales,
            LineType::Cogs => Self::Cogs,
            LineType::Asset => Self::Asset,
            LineType::Liability => Self::Liability,
            LineType::Capital => Self::Capital,
            LineType::Drawing => Self::Drawing,
        }
    }
}

impl From<posting::EntryStatus> for EntryStatus {
    fn from(value: posting::EntryStatus) -> Self {
        match value {
            posting::EntryStatus::Draft => Self::Draft,
            posting::EntryStatus::Ready => Self::Ready,
            posting::EntryStatus::Posted => Self::Posted,
        }
    }
}

impl From<EntryStatus> for posting::EntryStatus {
    fn from(value: EntryStatus) -> Self {
        match value {
            EntryStatus::Draft => Self::Draft,
            EntryStatus::Ready => Self::Ready,
            EntryStatus::Posted => Self::Posted,
        }
    }
}

impl From<posting::SourceKind> for SourceKind {
    fn from(value: posting::SourceKind) -> Self {
        match value {
            posting::SourceKind::Reimbursement => Self::Reimbursement,
            posting::SourceKind::Sales => Self::Sales,
            posting::SourceKind::Payroll => Self::Payroll,
        }
    }
}

impl From<SourceKind> for posting::SourceKind {
    fn from(value: SourceKind) -> Self {
        match value {
            SourceKind::Reimbursement => Self::Reimbursement,
            SourceKind::Sales => Self::Sales,
            SourceKind::Payroll => Self::Payroll,
        }
    }
}
