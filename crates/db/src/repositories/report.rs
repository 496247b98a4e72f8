//! Grouped ledger reads for the profit and loss and cash flow reports.
//!
//! Both queries sum `cash_transactions` by calendar month. Optional filters
//! are bound as nullable parameters so one statement covers every
//! combination.

use async_trait::async_trait;
use rust_decimal::Decimal;
use sea_orm::{ConnectionTrait, FromQueryResult, Statement};
use uuid::Uuid;

use tally_core::posting::LineType;
use tally_core::reports::{CashFlowRow, LedgerQuery, ProfitLossRow, ReportFilter};
use tally_core::store::{StoreError, StoreResult};

use super::store_err;

const PROFIT_AND_LOSS_SQL: &str = r"
SELECT
    to_char(t.transaction_date, 'YYYY-MM') AS period,
    t.line_type,
    t.account_id,
    a.name AS account_name,
    SUM(t.amount) AS amount
FROM cash_transactions t
LEFT JOIN accounts a ON a.id = t.account_id
WHERE t.line_type IN ('SALES', 'COGS', 'EXPENSE')
  AND ($1::date IS NULL OR t.transaction_date >= $1)
  AND ($2::date IS NULL OR t.transaction_date <= $2)
  AND ($3::uuid IS NULL OR t.outlet_id = $3)
GROUP BY period, t.line_type, t.account_id, a.name
ORDER BY period, t.line_type, a.name NULLS LAST, t.account_id
";

const CASH_FLOW_SQL: &str = r"
SELECT
    to_char(t.transaction_date, 'YYYY-MM') AS period,
    t.line_type,
    t.cash_account_id,
    a.name AS cash_account_name,
    SUM(t.amount) AS amount
FROM cash_transactions t
LEFT JOIN accounts a ON a.id = t.cash_account_id
WHERE t.line_type <> 'COGS'
  AND ($1::date IS NULL OR t.transaction_date >= $1)
  AND ($2::date IS NULL OR t.transaction_date <= $2)
  AND ($3::uuid IS NULL OR t.outlet_id = $3)
GROUP BY period, t.line_type, t.cash_account_id, a.name
ORDER BY period, a.name NULLS LAST, t.cash_account_id, t.line_type
";

#[derive(Debug, FromQueryResult)]
struct ProfitLossQueryRow {
    period: String,
    line_type: String,
    account_id: Uuid,
    account_name: Option<String>,
    amount: Decimal,
}

#[derive(Debug, FromQueryResult)]
struct CashFlowQueryRow {
    period: String,
    line_type: String,
    cash_account_id: Option<Uuid>,
    cash_account_name: Option<String>,
    amount: Decimal,
}

fn line_type(raw: &str) -> StoreResult<LineType> {
    LineType::parse(raw).ok_or_else(|| StoreError::Backend(format!("unknown line type {raw}")))
}

/// Report repository over any connection.
#[derive(Debug, Clone, Copy)]
pub struct ReportRepository<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> ReportRepository<'a, C> {
    /// Creates a new report repository.
    #[must_use]
    pub const fn new(db: &'a C) -> Self {
        Self { db }
    }

    fn statement(&self, sql: &str, filter: &ReportFilter) -> Statement {
        Statement::from_sql_and_values(
            self.db.get_database_backend(),
            sql,
            [
                filter.start_date.into(),
                filter.end_date.into(),
                filter.outlet_id.into(),
            ],
        )
    }
}

#[async_trait]
impl<C: ConnectionTrait> LedgerQuery for ReportRepository<'_, C> {
    async fn profit_and_loss_rows(&self, filter: &ReportFilter) -> StoreResult<Vec<ProfitLossRow>> {
        let rows =
            ProfitLossQueryRow::find_by_statement(self.statement(PROFIT_AND_LOSS_SQL, filter))
                .all(self.db)
                .await
                .map_err(store_err)?;

        rows.into_iter()
            .map(|row| {
                Ok(ProfitLossRow {
                    period: row.period,
                    line_type: line_type(&row.line_type)?,
                    account_id: row.account_id,
                    account_name: row.account_name,
                    amount: row.amount,
                })
            })
            .collect()
    }

    async fn cash_flow_rows(&self, filter: &ReportFilter) -> StoreResult<Vec<CashFlowRow>> {
        let rows = CashFlowQueryRow::find_by_statement(self.statement(CASH_FLOW_SQL, filter))
            .all(self.db)
            .await
            .map_err(store_err)?;

        rows.into_iter()
            .map(|row| {
                Ok(CashFlowRow {
                    period: row.period,
                    line_type: line_type(&row.line_type)?,
                    cash_account_id: row.cash_account_id,
                    cash_account_name: row.cash_account_name,
                    amount: row.amount,
                })
            })
            .collect()
    }
}
