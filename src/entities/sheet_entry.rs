//! Sheet entry entity - The budgeted amount for one category within one sheet.
//!
//! Entries are synthesized by the lifecycle hooks and deleted along with their
//! sheet or category. Once `locked`, `sheet_id`, `category_id` and `value` are frozen.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Sheet entry database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sheet_entries")]
pub struct Model {
    /// Unique identifier for the entry
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Sheet this entry budgets for
    pub sheet_id: i64,
    /// Category being budgeted
    pub category_id: i64,
    /// Budgeted amount
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub value: Decimal,
    /// Whether the entry is frozen
    pub locked: bool,
}

/// Defines relationships between `SheetEntry` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each entry belongs to one sheet
    #[sea_orm(
        belongs_to = "super::sheet::Entity",
        from = "Column::SheetId",
        to = "super::sheet::Column::Id",
        on_delete = "Cascade"
    )]
    Sheet,
    /// Each entry belongs to one category
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id",
        on_delete = "Cascade"
    )]
    Category,
}

impl Related<super::sheet::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sheet.def()
    }
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
