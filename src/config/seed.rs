//! Ledger seed configuration loading from config.toml
//!
//! The seed file lists the categories and accounts a fresh ledger starts with.
//! Seeding is a bulk fixture load: rows are inserted directly, lifecycle hooks do
//! not fire, and records whose name already exists are skipped.

use crate::{
    core::validation,
    entities::{Account, Category, account, category},
    errors::{Error, Result},
};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, TransactionTrait};
use serde::Deserialize;
use std::path::Path;
use tracing::{info, instrument, warn};

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Default, Deserialize)]
pub struct LedgerConfig {
    /// Categories to seed
    #[serde(default)]
    pub categories: Vec<CategoryConfig>,
    /// Accounts to seed
    #[serde(default)]
    pub accounts: Vec<AccountConfig>,
}

/// Configuration for a single category
#[derive(Debug, Deserialize, Clone)]
pub struct CategoryConfig {
    /// Name of the category
    pub name: String,
}

/// Configuration for a single account
#[derive(Debug, Deserialize, Clone)]
pub struct AccountConfig {
    /// Name of the account
    pub name: String,
    /// Opening balance
    #[serde(default)]
    pub balance: Decimal,
}

/// Counts of records inserted by [`seed_ledger`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    /// Categories inserted
    pub categories: usize,
    /// Accounts inserted
    pub accounts: usize,
}

/// Loads ledger configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<LedgerConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    parse_config(&contents)
}

/// Parses ledger configuration from TOML text.
pub fn parse_config(contents: &str) -> Result<LedgerConfig> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Inserts every configured category and account that does not exist yet.
///
/// All inserts happen in one store transaction. Each entry passes the same
/// structural validation as a regular creation.
#[instrument(skip(db, config))]
pub async fn seed_ledger(db: &DatabaseConnection, config: &LedgerConfig) -> Result<SeedSummary> {
    let txn = db.begin().await?;
    let mut summary = SeedSummary::default();

    for cfg in &config.categories {
        validation::validate_name("name", &cfg.name)?;
        let existing = Category::find()
            .filter(category::Column::Name.eq(cfg.name.as_str()))
            .one(&txn)
            .await?;
        if existing.is_some() {
            warn!("Category '{}' already exists. Skipping.", cfg.name);
            continue;
        }

        category::ActiveModel {
            name: Set(cfg.name.clone()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        summary.categories += 1;
    }

    for cfg in &config.accounts {
        validation::validate_name("name", &cfg.name)?;
        validation::validate_amount("balance", cfg.balance)?;
        let existing = Account::find()
            .filter(account::Column::Name.eq(cfg.name.as_str()))
            .one(&txn)
            .await?;
        if existing.is_some() {
            warn!("Account '{}' already exists. Skipping.", cfg.name);
            continue;
        }

        account::ActiveModel {
            name: Set(cfg.name.clone()),
            balance: Set(cfg.balance),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        summary.accounts += 1;
    }

    txn.commit().await?;
    info!(
        "Seeded {} categories and {} accounts",
        summary.categories, summary.accounts
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::entities::SheetEntry;
    use crate::test_utils::*;
    use sea_orm::PaginatorTrait;

    const SEED_TOML: &str = r#"
        [[categories]]
        name = "Groceries"

        [[categories]]
        name = "Rent"

        [[accounts]]
        name = "Checking"
        balance = "1250.50"

        [[accounts]]
        name = "Wallet"
    "#;

    #[test]
    fn test_parse_ledger_config() {
        let config = parse_config(SEED_TOML).unwrap();
        assert_eq!(config.categories.len(), 2);
        assert_eq!(config.categories[0].name, "Groceries");
        assert_eq!(config.accounts.len(), 2);
        assert_eq!(config.accounts[0].balance, Decimal::new(125_050, 2));
        assert_eq!(config.accounts[1].balance, Decimal::ZERO);
    }

    #[test]
    fn test_parse_invalid_toml() {
        let result = parse_config("[[categories]\nname = ");
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[tokio::test]
    async fn test_seed_ledger_skips_existing() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_category(&db, "Rent").await?;
        let config = parse_config(SEED_TOML)?;

        let summary = seed_ledger(&db, &config).await?;
        assert_eq!(
            summary,
            SeedSummary {
                categories: 1,
                accounts: 2
            }
        );

        let again = seed_ledger(&db, &config).await?;
        assert_eq!(again, SeedSummary::default());
        assert_eq!(Category::find().count(&db).await?, 2);

        Ok(())
    }

    #[tokio::test]
    async fn test_seed_ledger_does_not_fire_hooks() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_sheet(&db, 1, 2024).await?;

        seed_ledger(&db, &parse_config(SEED_TOML)?).await?;

        assert_eq!(SheetEntry::find().count(&db).await?, 0);
        Ok(())
    }
}
