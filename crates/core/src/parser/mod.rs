//! Free-text expense report parsing.
//!
//! A report is a chat message whose first non-empty line is a date and whose
//! remaining non-empty lines each describe one purchased item:
//!
//! ```text
//! 20 jan
//! cabe merah tanjung 5kg 500k
//! minyak goreng 2 botol 1.5jt
//! ```
//!
//! Parsing is pure and deterministic: the only input besides the text is the
//! reference date used to complete dates written without a year.

mod amount;
mod date;
pub mod error;


use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use tally_shared::types::{MAX_AMOUNT, MAX_QUANTITY, MONEY_SCALE, QUANTITY_SCALE, derive_unit_price};

pub use error::ParseError;

use amount::{is_unit, parse_price, parse_quantity};
use date::resolve_date;

static BULLET: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[-*•]|\d+[.)])\s+").expect("hardcoded regex should be valid")
});

/// A parsed expense report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedMessage {
    /// Business date of every item in the report.
    pub expense_date: NaiveDate,
    /// Items in message order.
    pub items: Vec<ParsedItem>,
}

/// One item line of an expense report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedItem {
    /// 1-indexed line number in the original message.
    pub line: usize,
    /// Free-text item name as written.
    pub description: String,
    /// Purchased quantity, never negative.
    pub quantity: Decimal,
    /// Unit of measure as written, e.g. `kg`.
    pub unit: Option<String>,
    /// Price paid for the whole line with shorthand expanded.
    pub total_price: Decimal,
}

impl ParsedItem {
    /// Returns true when the line can become a draft entry.
    #[must_use]
    pub fn is_postable(&self) -> bool {
        self.quantity > Decimal::ZERO
    }

    /// Derives the price of one unit, or `None` for a zero quantity.
    ///
    /// The result multiplied by the quantity rounds back to `total_price`.
    #[must_use]
    pub fn unit_price(&self) -> Option<Decimal> {
        derive_unit_price(self.total_price, self.quantity)
    }
}

/// Parser for free-text expense reports.
#[derive(Debug, Clone, Copy)]
pub struct MessageParser {
    reference_date: NaiveDate,
}

impl MessageParser {
    /// Creates a parser completing year-less dates against `reference_date`.
    #[must_use]
    pub const fn new(reference_date: NaiveDate) -> Self {
        Self { reference_date }
    }

    /// Parses a full message.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` when the message is empty, the first non-empty
    /// line is not a date, an item line cannot be decomposed, or no item
    /// lines follow the date.
    pub fn parse(&self, text: &str) -> Result<ParsedMessage, ParseError> {
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(index, line)| (index + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty());

        let (date_line, first) = lines.next().ok_or(ParseError::EmptyMessage)?;
        let expense_date =
            resolve_date(first, self.reference_date).ok_or_else(|| ParseError::InvalidDate {
                line: date_line,
                content: first.to_string(),
            })?;

        let items = lines
            .map(|(line, content)| parse_item_line(line, content))
            .collect::<Result<Vec<_>, _>>()?;

        if items.is_empty() {
            return Err(ParseError::NoItems);
        }

        Ok(ParsedMessage {
            expense_date,
            items,
        })
    }
}

/// Splits `<name> <quantity><unit> <price>` from the right.
fn parse_item_line(line: usize, content: &str) -> Result<ParsedItem, ParseError> {
    let invalid = || ParseError::InvalidItemLine {
        line,
        content: content.to_string(),
    };

    let stripped = BULLET.replace(content, "");
    let tokens: Vec<&str> = stripped.split_whitespace().collect();
    let Some((price_token, rest)) = tokens.split_last() else {
        return Err(invalid());
    };
    let total_price = parse_price(price_token).ok_or_else(invalid)?;

    let (quantity, unit, name_tokens) = match rest {
        [name @ .., amount, unit] if !name.is_empty() && is_unit(unit) => {
            match parse_quantity(amount) {
                Some((quantity, None)) => (quantity, Some((*unit).to_string()), name),
                _ => return Err(invalid()),
            }
        }
        [name @ .., quantity_token] if !name.is_empty() => {
            let (quantity, unit) = parse_quantity(quantity_token).ok_or_else(invalid)?;
            (quantity, unit, name)
        }
        _ => return Err(invalid()),
    };

    if !within_bounds(quantity, QUANTITY_SCALE, MAX_QUANTITY)
        || !within_bounds(total_price, MONEY_SCALE, MAX_AMOUNT)
    {
        return Err(ParseError::OutOfRange {
            line,
            content: content.to_string(),
        });
    }

    Ok(ParsedItem {
        line,
        description: name_tokens.join(" "),
        quantity,
        unit,
        total_price,
    })
}

/// True when `value` is below `max` and carries at most `scale` decimals.
fn within_bounds(value: Decimal, scale: u32, max: Decimal) -> bool {
    value < max && value.normalize().scale() <= scale
}
