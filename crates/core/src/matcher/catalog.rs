//! Catalog items as seen by the matcher.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::StoreResult;

/// A known inventory item. Owned by the catalog, read-only here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Item ID.
    pub id: Uuid,
    /// Catalog code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Free-text keywords used for matching.
    pub keywords: Vec<String>,
    /// Unit of measure.
    pub unit: Option<String>,
    /// Inactive items never match.
    pub is_active: bool,
}

/// Read access to the item catalog.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Loads every active item, in catalog order.
    async fn active_items(&self) -> StoreResult<Vec<Item>>;
}

/// Splits a stored keyword list such as `"cabe, merah,tanjung"`.
#[must_use]
pub fn parse_keywords(raw: &str) -> Vec<String> {
    raw.split([',', ';', '\n'])
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(ToString::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keywords() {
        assert_eq!(
            parse_keywords("cabe, merah,tanjung"),
            vec!["cabe", "merah", "tanjung"]
        );
        assert_eq!(parse_keywords("bawang;putih\n"), vec!["bawang", "putih"]);
        assert!(parse_keywords(" , ,").is_empty());
    }
}
