//! Transaction entity - One cash-flow event between an account and a partner.
//!
//! A positive `value` is an inflow to `account_id`, a negative one an outflow.
//! Once `locked` is committed, `partner`, `date`, `value`, `category_id` and
//! `account_id` are frozen (see `core::lock`). Category and account references
//! restrict deletion of their targets.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Transaction database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    /// Unique identifier for the transaction
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Counterparty of the cash flow, at most 200 characters
    #[sea_orm(column_type = "String(StringLen::N(200))")]
    pub partner: String,
    /// Booking date
    pub date: Date,
    /// Amount (positive for inflow, negative for outflow)
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub value: Decimal,
    /// Category classifying this transaction
    pub category_id: i64,
    /// Account the money moves in or out of
    pub account_id: i64,
    /// Whether the transaction is reconciled and its fields frozen
    pub locked: bool,
}

/// Defines relationships between Transaction and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each transaction belongs to one category
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id",
        on_delete = "Restrict"
    )]
    Category,
    /// Each transaction belongs to one account
    #[sea_orm(
        belongs_to = "super::account::Entity",
        from = "Column::AccountId",
        to = "super::account::Column::Id",
        on_delete = "Restrict"
    )]
    Account,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
