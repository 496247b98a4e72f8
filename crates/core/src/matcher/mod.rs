//! Resolution of free-text item descriptions against the inventory catalog.
//!
//! The matcher is built once from a catalog snapshot and classifies every
//! description as exactly one of:
//! - `Matched` - a single item has the strictly highest keyword score
//! - `Ambiguous` - two or more items tie for the highest score
//! - `Unmatched` - no item scores above zero
//!
//! Only matched lines are booked as inventory; the other two outcomes become
//! expense lines for a reviewer to reclassify.

pub mod catalog;
pub mod service;

pub use catalog::{CatalogStore, Item, parse_keywords};
pub use service::{ItemMatcher, MatchResult, MatchStatus};
