//! Sheet entity - One calendar month's round of budgeting.
//!
//! `(month, year)` is unique. A sheet is open while `carryover` is `None` and
//! closed once the final `available` figure has been stored in it.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Sheet database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sheets")]
pub struct Model {
    /// Unique identifier for the sheet
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Calendar month, 1 through 12
    pub month: i32,
    /// Calendar year, never negative
    pub year: i32,
    /// Frozen `available` figure of a closed sheet, `None` while open
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub carryover: Option<Decimal>,
}

impl Model {
    /// Whether the sheet is still being budgeted.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.carryover.is_none()
    }
}

/// Defines relationships between Sheet and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One sheet has one budget entry per category
    #[sea_orm(has_many = "super::sheet_entry::Entity")]
    SheetEntries,
}

impl Related<super::sheet_entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SheetEntries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
