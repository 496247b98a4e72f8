//! Financial report generation.
//!
//! - Profit and loss per calendar month
//! - Cash flow per calendar month and cash account

pub mod error;
pub mod service;
pub mod types;


pub use error::ReportError;
pub use service::ReportService;
pub use types::*;
