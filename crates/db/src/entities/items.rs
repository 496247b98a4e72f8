//! `SeaORM` Entity for items table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use tally_core::matcher::{self, parse_keywords};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub code: String,
    pub name: String,
    /// Comma-separated match keywords.
    pub keywords: String,
    pub unit: Option<String>,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for matcher::Item {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            keywords: parse_keywords(&model.keywords),
            code: model.code,
            name: model.name,
            unit: model.unit,
            is_active: model.is_active,
        }
    }
}
