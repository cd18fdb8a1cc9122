//! Category entity - A bucket that money goes into when budgeting.
//!
//! Transactions are classified by category, and every sheet carries one
//! budget entry per category.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Category database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    /// Unique identifier for the category
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Human-readable name (e.g., "Groceries", "Rent"), at most 200 characters
    #[sea_orm(column_type = "String(StringLen::N(200))")]
    pub name: String,
}

/// Defines relationships between Category and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One category classifies many transactions
    #[sea_orm(has_many = "super::transaction::Entity")]
    Transactions,
    /// One category has one budget entry per sheet
    #[sea_orm(has_many = "super::sheet_entry::Entity")]
    SheetEntries,
}

impl Related<super::transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl Related<super::sheet_entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SheetEntries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
