//! Decimal helpers for monetary amounts.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Every amount shown to a caller goes through [`format_amount`].

use rust_decimal::Decimal;

/// Decimal places stored for a line quantity.
pub const QUANTITY_SCALE: u32 = 4;

/// Decimal places stored for a money amount.
pub const MONEY_SCALE: u32 = 2;

/// Smallest scale tried when deriving a unit price.
pub const MIN_UNIT_PRICE_SCALE: u32 = 6;

/// Largest scale stored for a unit price.
pub const MAX_UNIT_PRICE_SCALE: u32 = 10;

/// Exclusive upper bound of a line quantity.
pub const MAX_QUANTITY: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// Exclusive upper bound of a line amount or price.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(3_567_587_328, 232, 0, false, 0);

/// Rounds an amount to two decimal places using Banker's Rounding.
#[must_use]
pub fn round_money(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp(2);
    rounded.rescale(2);
    rounded
}

/// Derives the price of one unit from a line total.
///
/// Starts at [`MIN_UNIT_PRICE_SCALE`] and widens the scale until
/// `unit × quantity` rounds back to `total`. Returns `None` for a zero
/// quantity or when the division overflows.
#[must_use]
pub fn derive_unit_price(total: Decimal, quantity: Decimal) -> Option<Decimal> {
    if quantity.is_zero() {
        return None;
    }
    let exact = total.checked_div(quantity)?;
    let target = round_money(total);
    let unit = (MIN_UNIT_PRICE_SCALE..=MAX_UNIT_PRICE_SCALE)
        .map(|scale| exact.round_dp(scale))
        .find(|unit| unit.checked_mul(quantity).map(round_money) == Some(target))
        .unwrap_or_else(|| exact.round_dp(MAX_UNIT_PRICE_SCALE));
    Some(unit.normalize())
}

/// Formats an amount as a fixed two-decimal string, e.g. `1500000.00`.
#[must_use]
pub fn format_amount(amount: Decimal) -> String {
    round_money(amount).to_string()
}

/// Returns `part / whole × 100` rounded to two decimal places.
///
/// A zero `whole` yields `0.00`.
#[must_use]
pub fn percent_of(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        return round_money(Decimal::ZERO);
    }
    round_money(part * Decimal::ONE_HUNDRED / whole)
}
