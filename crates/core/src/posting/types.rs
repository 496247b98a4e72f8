//! Posting domain types shared by every draft source.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of a ledger movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LineType {
    /// Stock purchased for resale or production.
    Inventory,
    /// Operating expense.
    Expense,
    /// Sales revenue.
    Sales,
    /// Cost of goods sold.
    Cogs,
    /// Fixed or other asset purchase.
    Asset,
    /// Borrowing or other liability movement.
    Liability,
    /// Owner capital injection.
    Capital,
    /// Owner drawing.
    Drawing,
}

/// Direction of a cash movement for cash-flow reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CashDirection {
    /// Money received.
    In,
    /// Money paid out.
    Out,
}

impl LineType {
    /// Every line type, in display order.
    pub const ALL: [Self; 8] = [
        Self::Inventory,
        Self::Expense,
        Self::Sales,
        Self::Cogs,
        Self::Asset,
        Self::Liability,
        Self::Capital,
        Self::Drawing,
    ];

    /// Returns the string representation of the line type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inventory => "INVENTORY",
            Self::Expense => "EXPENSE",
            Self::Sales => "SALES",
            Self::Cogs => "COGS",
            Self::Asset => "ASSET",
            Self::Liability => "LIABILITY",
            Self::Capital => "CAPITAL",
            Self::Drawing => "DRAWING",
        }
    }

    /// Parses a line type, ignoring case.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|line_type| line_type.as_str().eq_ignore_ascii_case(s.trim()))
    }

    /// Which way cash moves for this line type. COGS moves no cash.
    #[must_use]
    pub fn cash_direction(&self) -> Option<CashDirection> {
        match self {
            Self::Sales | Self::Liability | Self::Capital => Some(CashDirection::In),
            Self::Inventory | Self::Expense | Self::Asset | Self::Drawing => {
                Some(CashDirection::Out)
            }
            Self::Cogs => None,
        }
    }
}

impl fmt::Display for LineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle of a draft row.
///
/// Reimbursements move Draft → Ready → Posted. Sales summaries and payroll
/// entries skip Ready and go straight from Draft to Posted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    /// Created, mutable and deletable.
    Draft,
    /// Assigned to a batch; frozen.
    Ready,
    /// A ledger transaction exists for it; terminal.
    Posted,
}

impl EntryStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Ready => "ready",
            Self::Posted => "posted",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "draft" => Some(Self::Draft),
            "ready" => Some(Self::Ready),
            "posted" => Some(Self::Posted),
            _ => None,
        }
    }

    /// Only drafts may be updated or deleted.
    #[must_use]
    pub fn is_editable(&self) -> bool {
        matches!(self, Self::Draft)
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which pipeline produced a ledger transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Expense reimbursement batch.
    Reimbursement,
    /// Daily point-of-sale summary.
    Sales,
    /// Payroll run.
    Payroll,
}

impl SourceKind {
    /// Returns the string representation of the source kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reimbursement => "reimbursement",
            Self::Sales => "sales",
            Self::Payroll => "payroll",
        }
    }

    /// Parses a source kind from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "reimbursement" => Some(Self::Reimbursement),
            "sales" => Some(Self::Sales),
            "payroll" => Some(Self::Payroll),
            _ => None,
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_type_parse_roundtrip() {
        for line_type in LineType::ALL {
            assert_eq!(LineType::parse(line_type.as_str()), Some(line_type));
        }
        assert_eq!(LineType::parse(" expense "), Some(LineType::Expense));
        assert_eq!(LineType::parse("REVENUE"), None);
    }

    #[test]
    fn test_line_type_serde_uses_upper_case() {
        let json = serde_json::to_string(&LineType::Cogs).unwrap();
        assert_eq!(json, "\"COGS\"");
    }

    #[test]
    fn test_cash_direction() {
        assert_eq!(LineType::Sales.cash_direction(), Some(CashDirection::In));
        assert_eq!(LineType::Capital.cash_direction(), Some(CashDirection::In));
        assert_eq!(LineType::Expense.cash_direction(), Some(CashDirection::Out));
        assert_eq!(LineType::Drawing.cash_direction(), Some(CashDirection::Out));
        assert_eq!(LineType::Cogs.cash_direction(), None);
    }

    #[test]
    fn test_only_draft_is_editable() {
        assert!(EntryStatus::Draft.is_editable());
        assert!(!EntryStatus::Ready.is_editable());
        assert!(!EntryStatus::Posted.is_editable());
    }

    #[test]
    fn test_status_and_source_parse() {
        assert_eq!(EntryStatus::parse("READY"), Some(EntryStatus::Ready));
        assert_eq!(EntryStatus::parse("voided"), None);
        assert_eq!(SourceKind::parse("payroll"), Some(SourceKind::Payroll));
        assert_eq!(SourceKind::Sales.to_string(), "sales");
    }
}
