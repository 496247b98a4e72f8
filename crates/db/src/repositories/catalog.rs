//! Item catalog repository.

use async_trait::async_trait;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};

use tally_core::matcher::{CatalogStore, Item};
use tally_core::store::StoreResult;

use super::store_err;
use crate::entities::items;

/// Reads the active item catalog.
#[derive(Debug, Clone, Copy)]
pub struct CatalogRepository<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> CatalogRepository<'a, C> {
    /// Creates a new catalog repository.
    #[must_use]
    pub const fn new(db: &'a C) -> Self {
        Self { db }
    }
}

#[async_trait]
impl<C: ConnectionTrait> CatalogStore for CatalogRepository<'_, C> {
    async fn active_items(&self) -> StoreResult<Vec<Item>> {
        let rows = items::Entity::find()
            .filter(items::Column::IsActive.eq(true))
            .order_by_asc(items::Column::Code)
            .all(self.db)
            .await
            .map_err(store_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}
