//! Quantity and price tokens of an item line.

use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;

static QUANTITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+(?:[.,]\d+)?)([A-Za-z]+)?$").expect("hardcoded regex should be valid")
});

static PRICE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:rp\.?)?(\d+(?:[.,]\d+)*)(k|rb|ribu|jt|juta)?$")
        .expect("hardcoded regex should be valid")
});

static GROUPED_THOUSANDS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{1,3}(?:([.,])\d{3})+$").expect("hardcoded regex should be valid"));

static UNIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z]+$").expect("hardcoded regex should be valid"));

/// Parses `5kg`, `2`, `1.5L` or `1,5kg` into a magnitude and optional unit.
pub(crate) fn parse_quantity(token: &str) -> Option<(Decimal, Option<String>)> {
    let caps = QUANTITY.captures(token)?;
    let quantity = parse_decimal(&caps[1])?;
    let unit = caps.get(2).map(|m| m.as_str().to_string());
    Some((quantity, unit))
}

/// Returns true for a bare unit token such as `kg` in `beras 5 kg 70k`.
pub(crate) fn is_unit(token: &str) -> bool {
    UNIT.is_match(token)
}

/// Parses a price with optional `Rp` prefix and shorthand suffix.
///
/// `k`, `rb` and `ribu` multiply by 1,000; `jt` and `juta` by 1,000,000.
/// Without a suffix, `25.000` and `1,500,000` are read as grouped thousands.
/// Returns `None` when the expanded price does not fit a `Decimal`.
pub(crate) fn parse_price(token: &str) -> Option<Decimal> {
    let lowered = token.to_lowercase();
    let caps = PRICE.captures(&lowered)?;
    let digits = &caps[1];

    let price = match caps.get(2).map(|m| m.as_str()) {
        Some(suffix) => parse_decimal(digits)?.checked_mul(multiplier(suffix))?,
        None if GROUPED_THOUSANDS.is_match(digits) => {
            Decimal::from_str(&digits.replace(['.', ','], "")).ok()?
        }
        None => parse_decimal(digits)?,
    };
    Some(price.normalize())
}

fn multiplier(suffix: &str) -> Decimal {
    match suffix {
        "jt" | "juta" => Decimal::from(1_000_000),
        _ => Decimal::from(1_000),
    }
}

/// Reads a number with at most one `.` or `,` decimal separator.
fn parse_decimal(digits: &str) -> Option<Decimal> {
    if digits.matches(['.', ',']).count() > 1 {
        return None;
    }
    Decimal::from_str(&digits.replace(',', ".")).ok()
}
