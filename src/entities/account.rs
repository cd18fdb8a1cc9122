//! Account entity - A place where money is kept, eg. a checking account or a wallet.
//!
//! `balance` is the opening value of the account. The live total is derived from
//! it plus every unlocked transaction, see `core::account::account_total`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Account database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    /// Unique identifier for the account
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Human-readable name, at most 200 characters
    #[sea_orm(column_type = "String(StringLen::N(200))")]
    pub name: String,
    /// Opening balance; already reflects every locked transaction
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub balance: Decimal,
}

/// Defines relationships between Account and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One account has many transactions
    #[sea_orm(has_many = "super::transaction::Entity")]
    Transactions,
}

impl Related<super::transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
