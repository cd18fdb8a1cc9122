//! Database configuration module for the budgeting ledger.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with `Schema::create_table_from_entity`,
//! so foreign keys carry the restrict/cascade policy declared on the relations. The
//! composite uniqueness constraints that the entity macros cannot express are added
//! here as explicit indexes.

use crate::entities::{Account, Category, Sheet, SheetEntry, Transaction, sheet, sheet_entry};
use crate::errors::Result;
use sea_orm::sea_query::Index;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema};
use tracing::{debug, info};

const DEFAULT_DATABASE_URL: &str = "sqlite://data/budgeteer.sqlite?mode=rwc";

/// Gets the database URL from environment variable or returns default `SQLite` path.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the `SQLite` database using the `DATABASE_URL` environment variable.
///
/// Falls back to a default local `SQLite` file if no environment variable is set.
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url();
    debug!("Connecting to database at {}", database_url);
    Database::connect(&database_url).await.map_err(Into::into)
}

/// Creates all ledger tables and indexes if they do not exist yet.
///
/// Tables are created referenced-first so that foreign keys resolve: categories,
/// accounts and sheets before transactions and sheet entries.
pub async fn create_tables<C>(db: &C) -> Result<()>
where
    C: ConnectionTrait,
{
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    create_table(db, &schema, Category).await?;
    create_table(db, &schema, Account).await?;
    create_table(db, &schema, Sheet).await?;
    create_table(db, &schema, Transaction).await?;
    create_table(db, &schema, SheetEntry).await?;

    let sheet_month_year = Index::create()
        .name("idx_sheets_month_year")
        .table(Sheet)
        .col(sheet::Column::Month)
        .col(sheet::Column::Year)
        .unique()
        .if_not_exists()
        .to_owned();
    db.execute(builder.build(&sheet_month_year)).await?;

    let entry_sheet_category = Index::create()
        .name("idx_sheet_entries_sheet_category")
        .table(SheetEntry)
        .col(sheet_entry::Column::SheetId)
        .col(sheet_entry::Column::CategoryId)
        .unique()
        .if_not_exists()
        .to_owned();
    db.execute(builder.build(&entry_sheet_category)).await?;

    info!("Ledger tables ensured");
    Ok(())
}

async fn create_table<C, E>(db: &C, schema: &Schema, entity: E) -> Result<()>
where
    C: ConnectionTrait,
    E: EntityTrait,
{
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();
    db.execute(db.get_database_backend().build(&statement))
        .await?;
    Ok(())
}
