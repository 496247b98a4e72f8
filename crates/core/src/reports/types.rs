//! Report data types.
//!
//! Amounts leave the reports rounded to two decimal places and serialize as
//! strings, e.g. `"1250000.00"`.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::posting::LineType;
use crate::store::StoreResult;

/// Date range and outlet scope shared by every report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ReportFilter {
    /// First day included.
    pub start_date: Option<NaiveDate>,
    /// Last day included.
    pub end_date: Option<NaiveDate>,
    /// Restrict to one outlet.
    pub outlet_id: Option<Uuid>,
}

/// Ledger amounts summed per month, line type and account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfitLossRow {
    /// Calendar month, `YYYY-MM`.
    pub period: String,
    /// Line type of the summed transactions.
    pub line_type: LineType,
    /// Booked account.
    pub account_id: Uuid,
    /// Account display name, when the account is known.
    pub account_name: Option<String>,
    /// Sum of amounts.
    pub amount: Decimal,
}

/// Ledger amounts summed per month, line type and cash account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CashFlowRow {
    /// Calendar month, `YYYY-MM`.
    pub period: String,
    /// Line type of the summed transactions.
    pub line_type: LineType,
    /// Cash account the money moved through, if recorded.
    pub cash_account_id: Option<Uuid>,
    /// Cash account display name.
    pub cash_account_name: Option<String>,
    /// Sum of amounts.
    pub amount: Decimal,
}

/// Grouped ledger reads backing the reports.
#[async_trait]
pub trait LedgerQuery: Send + Sync {
    /// Rows ordered by period.
    async fn profit_and_loss_rows(&self, filter: &ReportFilter) -> StoreResult<Vec<ProfitLossRow>>;

    /// Rows ordered by period.
    async fn cash_flow_rows(&self, filter: &ReportFilter) -> StoreResult<Vec<CashFlowRow>>;
}

/// One expense account within a period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpenseLine {
    /// Account ID.
    pub account_id: Uuid,
    /// Account name.
    pub account_name: Option<String>,
    /// Total expense.
    pub amount: Decimal,
}

/// Profit and loss for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfitAndLossPeriod {
    /// Calendar month, `YYYY-MM`.
    pub period: String,
    /// SALES total.
    pub net_sales: Decimal,
    /// COGS total.
    pub cost_of_goods_sold: Decimal,
    /// Net sales minus COGS.
    pub gross_profit: Decimal,
    /// Expense accounts in first-seen order.
    pub expenses: Vec<ExpenseLine>,
    /// Sum of `expenses`.
    pub total_expenses: Decimal,
    /// Gross profit minus expenses.
    pub net_profit: Decimal,
    /// Gross profit as a percentage of net sales.
    pub gross_margin: Decimal,
    /// Net profit as a percentage of net sales.
    pub net_margin: Decimal,
}

/// Cash movement through one cash account within a period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CashAccountFlow {
    /// Cash account, absent for movements with none recorded.
    pub cash_account_id: Option<Uuid>,
    /// Cash account name.
    pub cash_account_name: Option<String>,
    /// Money received.
    pub cash_in: Decimal,
    /// Money paid out.
    pub cash_out: Decimal,
    /// `cash_in - cash_out`.
    pub net: Decimal,
}

/// Cash flow for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CashFlowPeriod {
    /// Calendar month, `YYYY-MM`.
    pub period: String,
    /// Per cash account, in first-seen order.
    pub accounts: Vec<CashAccountFlow>,
    /// Total received.
    pub cash_in: Decimal,
    /// Total paid out.
    pub cash_out: Decimal,
    /// `cash_in - cash_out`.
    pub net: Decimal,
}
