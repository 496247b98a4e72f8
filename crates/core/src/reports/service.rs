//! Report generation service.
//!
//! The store groups ledger rows by month; this module folds them into
//! per-period statements. Periods and accounts keep the order in which they
//! first appear in the input.

use indexmap::IndexMap;
use rust_decimal::Decimal;
use uuid::Uuid;

use tally_shared::types::{percent_of, round_money};

use super::error::ReportError;
use super::types::{
    CashAccountFlow, CashFlowPeriod, CashFlowRow, ExpenseLine, LedgerQuery, ProfitAndLossPeriod,
    ProfitLossRow, ReportFilter,
};
use crate::posting::{CashDirection, LineType};

/// Service for generating financial reports.
pub struct ReportService;

#[derive(Default)]
struct ProfitAndLossTotals {
    net_sales: Decimal,
    cogs: Decimal,
    expenses: IndexMap<Uuid, (Option<String>, Decimal)>,
}

#[derive(Default)]
struct CashTotals {
    accounts: IndexMap<Option<Uuid>, (Option<String>, Decimal, Decimal)>,
}

impl ReportService {
    /// Loads and folds the profit and loss statement.
    pub async fn profit_and_loss<Q>(
        query: &Q,
        filter: &ReportFilter,
    ) -> Result<Vec<ProfitAndLossPeriod>, ReportError>
    where
        Q: LedgerQuery + ?Sized,
    {
        Self::validate(filter)?;
        let rows = query.profit_and_loss_rows(filter).await?;
        Ok(Self::fold_profit_and_loss(&rows))
    }

    /// Loads and folds the cash flow statement.
    pub async fn cash_flow<Q>(
        query: &Q,
        filter: &ReportFilter,
    ) -> Result<Vec<CashFlowPeriod>, ReportError>
    where
        Q: LedgerQuery + ?Sized,
    {
        Self::validate(filter)?;
        let rows = query.cash_flow_rows(filter).await?;
        Ok(Self::fold_cash_flow(&rows))
    }

    /// Folds grouped rows into one statement per month.
    ///
    /// SALES rows feed net sales, COGS rows cost of goods, EXPENSE rows the
    /// itemized expenses. Other line types do not touch profit and loss.
    #[must_use]
    pub fn fold_profit_and_loss(rows: &[ProfitLossRow]) -> Vec<ProfitAndLossPeriod> {
        let mut periods: IndexMap<&str, ProfitAndLossTotals> = IndexMap::new();

        for row in rows {
            let totals = periods.entry(row.period.as_str()).or_default();
            match row.line_type {
                LineType::Sales => totals.net_sales += row.amount,
                LineType::Cogs => totals.cogs += row.amount,
                LineType::Expense => {
                    let line = totals
                        .expenses
                        .entry(row.account_id)
                        .or_insert_with(|| (row.account_name.clone(), Decimal::ZERO));
                    line.1 += row.amount;
                }
                _ => {}
            }
        }

        periods
            .into_iter()
            .map(|(period, totals)| {
                let net_sales = round_money(totals.net_sales);
                let cost_of_goods_sold = round_money(totals.cogs);
                let expenses: Vec<ExpenseLine> = totals
                    .expenses
                    .into_iter()
                    .map(|(account_id, (account_name, amount))| ExpenseLine {
                        account_id,
                        account_name,
                        amount: round_money(amount),
                    })
                    .collect();
                let total_expenses: Decimal = expenses.iter().map(|e| e.amount).sum();
                let gross_profit = net_sales - cost_of_goods_sold;
                let net_profit = gross_profit - total_expenses;

                ProfitAndLossPeriod {
                    period: period.to_string(),
                    net_sales,
                    cost_of_goods_sold,
                    gross_profit,
                    expenses,
                    total_expenses: round_money(total_expenses),
                    net_profit,
                    gross_margin: percent_of(gross_profit, net_sales),
                    net_margin: percent_of(net_profit, net_sales),
                }
            })
            .collect()
    }

    /// Folds grouped rows into one cash flow statement per month.
    #[must_use]
    pub fn fold_cash_flow(rows: &[CashFlowRow]) -> Vec<CashFlowPeriod> {
        let mut periods: IndexMap<&str, CashTotals> = IndexMap::new();

        for row in rows {
            let Some(direction) = row.line_type.cash_direction() else {
                continue;
            };
            let totals = periods.entry(row.period.as_str()).or_default();
            let flow = totals
                .accounts
                .entry(row.cash_account_id)
                .or_insert_with(|| (row.cash_account_name.clone(), Decimal::ZERO, Decimal::ZERO));
            match direction {
                CashDirection::In => flow.1 += row.amount,
                CashDirection::Out => flow.2 += row.amount,
            }
        }

        periods
            .into_iter()
            .map(|(period, totals)| {
                let accounts: Vec<CashAccountFlow> = totals
                    .accounts
                    .into_iter()
                    .map(|(cash_account_id, (cash_account_name, cash_in, cash_out))| {
                        let cash_in = round_money(cash_in);
                        let cash_out = round_money(cash_out);
                        CashAccountFlow {
                            cash_account_id,
                            cash_account_name,
                            cash_in,
                            cash_out,
                            net: cash_in - cash_out,
                        }
                    })
                    .collect();
                let cash_in: Decimal = accounts.iter().map(|a| a.cash_in).sum();
                let cash_out: Decimal = accounts.iter().map(|a| a.cash_out).sum();

                CashFlowPeriod {
                    period: period.to_string(),
                    accounts,
                    cash_in: round_money(cash_in),
                    cash_out: round_money(cash_out),
                    net: round_money(cash_in - cash_out),
                }
            })
            .collect()
    }

    fn validate(filter: &ReportFilter) -> Result<(), ReportError> {
        if let (Some(start), Some(end)) = (filter.start_date, filter.end_date)
            && start > end
        {
            return Err(ReportError::InvalidDateRange { start, end });
        }
        Ok(())
    }
}
