//! `SeaORM` entity definitions.

pub mod accounts;
pub mod cash_transactions;
pub mod items;
pub mod payroll_entries;
pub mod pos_orders;
pub mod reimbursements;
pub mod sales_summaries;
pub mod sea_orm_active_enums;
