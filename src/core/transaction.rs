//! Transaction business logic - Handles all transaction-related operations.
//!
//! Every update passes the lock gate ([`crate::core::lock`]) before it reaches the
//! store. The gate's read of the committed state and the write happen in one store
//! transaction, and the write only lands if the committed `locked` flag is still
//! the one the gate saw; otherwise the update fails with
//! [`Error::ConcurrentModification`]. Deletion is always permitted, locked or not.

use crate::{
    core::{lock, validation},
    entities::{Account, Category, Transaction, account, transaction},
    errors::{Error, Result},
};
use rust_decimal::Decimal;
use sea_orm::{QueryOrder, Set, TransactionTrait, Unchanged, prelude::*};
use tracing::{debug, info, instrument};

const ENTITY: &str = "transaction";

fn validate_fields(partner: &str, value: Decimal) -> Result<()> {
    validation::validate_name("partner", partner)?;
    validation::validate_amount("value", value)
}

/// Checks that the referenced category and account exist.
async fn validate_references<C>(conn: &C, category_id: i64, account_id: i64) -> Result<()>
where
    C: ConnectionTrait,
{
    if Category::find_by_id(category_id).one(conn).await?.is_none() {
        return Err(Error::Validation {
            field: "category",
            message: format!("category {category_id} does not exist"),
        });
    }
    if Account::find_by_id(account_id).one(conn).await?.is_none() {
        return Err(Error::Validation {
            field: "account",
            message: format!("account {account_id} does not exist"),
        });
    }
    Ok(())
}

/// Records a new, unlocked transaction.
///
/// # Arguments
/// * `partner` - Counterparty of the cash flow
/// * `date` - Booking date
/// * `value` - Amount (positive for inflow, negative for outflow)
/// * `category_id` - Category classifying the transaction
/// * `account_id` - Account the money moves in or out of
#[instrument(skip(db, partner))]
pub async fn create_transaction(
    db: &DatabaseConnection,
    partner: String,
    date: Date,
    value: Decimal,
    category_id: i64,
    account_id: i64,
) -> Result<transaction::Model> {
    validate_fields(&partner, value)?;

    let txn = db.begin().await?;
    validate_references(&txn, category_id, account_id).await?;

    let transaction = transaction::ActiveModel {
        partner: Set(partner),
        date: Set(date),
        value: Set(value),
        category_id: Set(category_id),
        account_id: Set(account_id),
        locked: Set(false),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;
    debug!("Created transaction {}", transaction.id);
    Ok(transaction)
}

/// Retrieves a specific transaction by its unique ID.
pub async fn get_transaction_by_id(
    db: &DatabaseConnection,
    transaction_id: i64,
) -> Result<Option<transaction::Model>> {
    Transaction::find_by_id(transaction_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves all transactions of an account, newest first.
pub async fn get_transactions_for_account(
    db: &DatabaseConnection,
    account_id: i64,
) -> Result<Vec<transaction::Model>> {
    Transaction::find()
        .filter(transaction::Column::AccountId.eq(account_id))
        .order_by_desc(transaction::Column::Date)
        .order_by_desc(transaction::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Commits a proposed transaction state after the lock gate accepts it.
///
/// The proposed model replaces every column of the stored record with the same id.
///
/// # Errors
/// * [`Error::Validation`] for structural violations or unknown references
/// * [`Error::NotFound`] if no transaction with that id exists
/// * [`Error::LockedFieldMutation`] if the stored record is locked and a lockable field differs
/// * [`Error::ConcurrentModification`] if the stored lock state changed during the update
#[instrument(skip(db, proposed), fields(transaction_id = proposed.id))]
pub async fn update_transaction(
    db: &DatabaseConnection,
    proposed: transaction::Model,
) -> Result<transaction::Model> {
    validate_fields(&proposed.partner, proposed.value)?;

    let txn = db.begin().await?;

    let committed = Transaction::find_by_id(proposed.id)
        .one(&txn)
        .await?
        .ok_or(Error::NotFound {
            entity: ENTITY,
            id: proposed.id,
        })?;

    lock::check_locked_fields(Some(&committed), &proposed)?;
    validate_references(&txn, proposed.category_id, proposed.account_id).await?;

    let id = proposed.id;
    let updated = write_if_lock_unchanged(&txn, committed.locked, proposed).await?;

    txn.commit().await?;
    debug!("Updated transaction {}", id);
    Ok(updated)
}

async fn write_if_lock_unchanged<C>(
    conn: &C,
    committed_locked: bool,
    proposed: transaction::Model,
) -> Result<transaction::Model>
where
    C: ConnectionTrait,
{
    let id = proposed.id;
    let active_model = transaction::ActiveModel {
        id: Unchanged(id),
        partner: Set(proposed.partner),
        date: Set(proposed.date),
        value: Set(proposed.value),
        category_id: Set(proposed.category_id),
        account_id: Set(proposed.account_id),
        locked: Set(proposed.locked),
    };

    Transaction::update(active_model)
        .filter(transaction::Column::Locked.eq(committed_locked))
        .exec(conn)
        .await
        .map_err(|e| match e {
            DbErr::RecordNotUpdated => Error::ConcurrentModification { entity: ENTITY, id },
            other => other.into(),
        })
}

/// Deletes a transaction. Locking never prevents deletion.
#[instrument(skip(db))]
pub async fn delete_transaction(db: &DatabaseConnection, transaction_id: i64) -> Result<()> {
    let result = Transaction::delete_by_id(transaction_id)
        .exec(db)
        .await?;
    if result.rows_affected == 0 {
        return Err(Error::NotFound {
            entity: ENTITY,
            id: transaction_id,
        });
    }
    info!("Deleted transaction {}", transaction_id);
    Ok(())
}

/// Locks a transaction and settles its value into the account's opening balance.
///
/// Both writes happen in one store transaction, so the account total is the same
/// before and after. Locking an already locked transaction changes nothing.
#[instrument(skip(db))]
pub async fn lock_transaction(
    db: &DatabaseConnection,
    transaction_id: i64,
) -> Result<transaction::Model> {
    let txn = db.begin().await?;

    let committed = Transaction::find_by_id(transaction_id)
        .one(&txn)
        .await?
        .ok_or(Error::NotFound {
            entity: ENTITY,
            id: transaction_id,
        })?;

    if committed.locked {
        return Ok(committed);
    }

    let account = Account::find_by_id(committed.account_id)
        .one(&txn)
        .await?
        .ok_or(Error::NotFound {
            entity: "account",
            id: committed.account_id,
        })?;

    let new_balance = account.balance + committed.value;
    validation::validate_amount("balance", new_balance)?;

    let mut account_model: account::ActiveModel = account.into();
    account_model.balance = Set(new_balance);
    account_model.update(&txn).await?;

    let mut proposed = committed.clone();
    proposed.locked = true;
    let locked = write_if_lock_unchanged(&txn, false, proposed).await?;

    txn.commit().await?;
    info!(
        "Locked transaction {} and settled {} into account {}",
        locked.id, locked.value, locked.account_id
    );
    Ok(locked)
}
