//! Common types used across the application.

pub mod money;
pub mod pagination;

pub use money::{
    MAX_AMOUNT, MAX_QUANTITY, MAX_UNIT_PRICE_SCALE, MONEY_SCALE, QUANTITY_SCALE, derive_unit_price,
    format_amount, percent_of, round_money,
};
pub use pagination::{PageMeta, PageRequest, PageResponse};
