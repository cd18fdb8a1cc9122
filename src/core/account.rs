//! Account business logic - account records and the live account total.
//!
//! The total of an account is its opening `balance` plus every transaction on it
//! that is still unlocked. Locked transactions are considered settled into
//! `balance` already; [`crate::core::transaction::lock_transaction`] performs that
//! settlement when used, otherwise keeping `balance` in step is up to the caller.

use crate::{
    core::validation,
    entities::{Account, Transaction, account, transaction},
    errors::{Error, Result},
};
use rust_decimal::Decimal;
use sea_orm::{QueryOrder, QuerySelect, Set, prelude::*};
use tracing::{info, instrument};

/// An account together with its derived total and transaction history.
#[derive(Debug, Clone)]
pub struct AccountOverview {
    /// The account being shown
    pub account: account::Model,
    /// Opening balance plus unlocked transactions
    pub total: Decimal,
    /// Every transaction on the account, newest first
    pub transactions: Vec<transaction::Model>,
}

/// Creates an account with the given opening balance.
#[instrument(skip(db))]
pub async fn create_account(
    db: &DatabaseConnection,
    name: String,
    balance: Decimal,
) -> Result<account::Model> {
    validation::validate_name("name", &name)?;
    validation::validate_amount("balance", balance)?;

    let account = account::ActiveModel {
        name: Set(name),
        balance: Set(balance),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!("Created account {} '{}'", account.id, account.name);
    Ok(account)
}

/// Finds an account by its unique ID.
pub async fn get_account_by_id(
    db: &DatabaseConnection,
    account_id: i64,
) -> Result<Option<account::Model>> {
    Account::find_by_id(account_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves all accounts, ordered alphabetically by name.
pub async fn get_all_accounts(db: &DatabaseConnection) -> Result<Vec<account::Model>> {
    Account::find()
        .order_by_asc(account::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Replaces the name and opening balance of an account.
pub async fn update_account(
    db: &DatabaseConnection,
    account_id: i64,
    name: String,
    balance: Decimal,
) -> Result<account::Model> {
    validation::validate_name("name", &name)?;
    validation::validate_amount("balance", balance)?;

    let existing = Account::find_by_id(account_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "account",
            id: account_id,
        })?;

    let mut active_model: account::ActiveModel = existing.into();
    active_model.name = Set(name);
    active_model.balance = Set(balance);
    active_model.update(db).await.map_err(Into::into)
}

/// Deletes an account.
///
/// # Errors
/// [`Error::Integrity`] while any transaction still references it.
#[instrument(skip(db))]
pub async fn delete_account(db: &DatabaseConnection, account_id: i64) -> Result<()> {
    let result = Account::delete_by_id(account_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::NotFound {
            entity: "account",
            id: account_id,
        });
    }
    info!("Deleted account {}", account_id);
    Ok(())
}

/// Sum of the values of all unlocked transactions on an account.
pub(crate) async fn unlocked_transaction_sum<C>(conn: &C, account_id: i64) -> Result<Decimal>
where
    C: ConnectionTrait,
{
    let values: Vec<Decimal> = Transaction::find()
        .select_only()
        .column(transaction::Column::Value)
        .filter(transaction::Column::AccountId.eq(account_id))
        .filter(transaction::Column::Locked.eq(false))
        .into_tuple()
        .all(conn)
        .await?;

    Ok(values.into_iter().sum())
}

/// Computes the live total of an account: opening balance plus unlocked transactions.
///
/// Transactions on other accounts and locked transactions do not count.
pub async fn account_total<C>(conn: &C, account: &account::Model) -> Result<Decimal>
where
    C: ConnectionTrait,
{
    Ok(account.balance + unlocked_transaction_sum(conn, account.id).await?)
}

/// Builds the overview of one account: the account, its total and its transactions.
pub async fn get_account_overview(
    db: &DatabaseConnection,
    account_id: i64,
) -> Result<AccountOverview> {
    let account = get_account_by_id(db, account_id)
        .await?
        .ok_or(Error::NotFound {
            entity: "account",
            id: account_id,
        })?;

    let total = account_total(db, &account).await?;
    let transactions =
        crate::core::transaction::get_transactions_for_account(db, account_id).await?;

    Ok(AccountOverview {
        account,
        total,
        transactions,
    })
}
