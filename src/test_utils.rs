//! Shared test utilities for the ledger.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::{account, category, sheet, transaction},
    entities::{self, SheetEntry, sheet_entry},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a test category through the regular creation path (hooks fire).
pub async fn create_test_category(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::category::Model> {
    category::create_category(db, name.to_string()).await
}

/// Creates a test account with the given opening balance.
pub async fn create_test_account(
    db: &DatabaseConnection,
    name: &str,
    balance: Decimal,
) -> Result<entities::account::Model> {
    account::create_account(db, name.to_string(), balance).await
}

/// Creates a test sheet through the regular creation path (hooks fire).
pub async fn create_test_sheet(
    db: &DatabaseConnection,
    month: i32,
    year: i32,
) -> Result<entities::sheet::Model> {
    sheet::create_sheet(db, month, year).await
}

/// Creates an unlocked test transaction.
///
/// # Defaults
/// * `partner`: `"Test partner"`
pub async fn create_test_transaction(
    db: &DatabaseConnection,
    account_id: i64,
    category_id: i64,
    date: NaiveDate,
    value: Decimal,
) -> Result<entities::transaction::Model> {
    transaction::create_transaction(
        db,
        "Test partner".to_string(),
        date,
        value,
        category_id,
        account_id,
    )
    .await
}

/// Marks a transaction locked directly in the store, without touching the account.
pub async fn set_test_locked(
    db: &DatabaseConnection,
    transaction: entities::transaction::Model,
) -> Result<entities::transaction::Model> {
    let mut active_model: entities::transaction::ActiveModel = transaction.into();
    active_model.locked = Set(true);
    active_model.update(db).await.map_err(Into::into)
}

/// Stores a carryover on a sheet directly, closing it without locking its entries.
pub async fn set_test_carryover(
    db: &DatabaseConnection,
    sheet: entities::sheet::Model,
    carryover: Decimal,
) -> Result<entities::sheet::Model> {
    let mut active_model: entities::sheet::ActiveModel = sheet.into();
    active_model.carryover = Set(Some(carryover));
    active_model.update(db).await.map_err(Into::into)
}

/// Sets the budgeted value of the entry for `(sheet_id, category_id)` directly in the store.
pub async fn set_test_entry_value(
    db: &DatabaseConnection,
    sheet_id: i64,
    category_id: i64,
    value: Decimal,
) -> Result<entities::sheet_entry::Model> {
    let entry = SheetEntry::find()
        .filter(sheet_entry::Column::SheetId.eq(sheet_id))
        .filter(sheet_entry::Column::CategoryId.eq(category_id))
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "sheet entry",
            id: sheet_id,
        })?;

    let mut active_model: entities::sheet_entry::ActiveModel = entry.into();
    active_model.value = Set(value);
    active_model.update(db).await.map_err(Into::into)
}

/// Sets up a complete test environment with an account and a category.
/// Returns (db, account, category); the account opens with a balance of 100.00.
pub async fn setup_with_account_and_category() -> Result<(
    DatabaseConnection,
    entities::account::Model,
    entities::category::Model,
)> {
    let db = setup_test_db().await?;
    let account = create_test_account(&db, "Checking", Decimal::new(10_000, 2)).await?;
    let category = create_test_category(&db, "Groceries").await?;
    Ok((db, account, category))
}
