//! Core business logic for Tally.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Persistence is reached through the async store traits each module declares.
//!
//! # Modules
//!
//! - `parser` - Free-text expense report parsing
//! - `matcher` - Item catalog matching
//! - `posting` - Draft → Ready → Posted pipeline and sequential codes
//! - `ingest` - Chat message ingestion
//! - `reports` - Profit and loss, cash flow

pub mod ingest;
pub mod matcher;
pub mod parser;
pub mod posting;
pub mod reports;
pub mod store;

#[cfg(test)]
mod testing;
