//! Sheet business logic - monthly budgeting rounds and the money left to budget.
//!
//! The amount available on an open sheet is its month's inflow minus everything
//! budgeted on it, plus whatever was still available on the previous month's
//! sheet. The chain runs back through consecutive open sheets until it meets a
//! closed sheet (whose stored carryover ends the walk) or a month with no sheet.
//! Nothing is cached across calls; every read recomputes from the store inside
//! one read transaction, so a single walk never mixes two store states.

use crate::{
    core::{hooks, validation},
    entities::{Sheet, SheetEntry, Transaction, sheet, sheet_entry, transaction},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{QueryOrder, QuerySelect, Set, TransactionTrait, prelude::*, sea_query::Expr};
use tracing::{debug, info, instrument};

const ENTITY: &str = "sheet";

/// Creates a sheet for a month and gives it one zero entry per existing category.
///
/// # Errors
/// * [`Error::Validation`] for a month outside 1..=12 or a year outside 0..=32767
/// * [`Error::Integrity`] if a sheet for that month already exists
#[instrument(skip(db))]
pub async fn create_sheet(db: &DatabaseConnection, month: i32, year: i32) -> Result<sheet::Model> {
    validation::validate_month(month)?;
    validation::validate_year(year)?;

    let txn = db.begin().await?;

    let sheet = sheet::ActiveModel {
        month: Set(month),
        year: Set(year),
        carryover: Set(None),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    hooks::on_sheet_created(&txn, &sheet).await?;

    txn.commit().await?;
    info!("Created sheet {} for {}-{:02}", sheet.id, year, month);
    Ok(sheet)
}

/// Finds a sheet by its unique ID.
pub async fn get_sheet_by_id(db: &DatabaseConnection, sheet_id: i64) -> Result<Option<sheet::Model>> {
    Sheet::find_by_id(sheet_id).one(db).await.map_err(Into::into)
}

/// Finds the sheet of a given month, if one exists.
pub async fn get_sheet_by_month<C>(conn: &C, month: i32, year: i32) -> Result<Option<sheet::Model>>
where
    C: ConnectionTrait,
{
    Sheet::find()
        .filter(sheet::Column::Month.eq(month))
        .filter(sheet::Column::Year.eq(year))
        .one(conn)
        .await
        .map_err(Into::into)
}

/// Retrieves all sheets in calendar order.
pub async fn get_all_sheets(db: &DatabaseConnection) -> Result<Vec<sheet::Model>> {
    Sheet::find()
        .order_by_asc(sheet::Column::Year)
        .order_by_asc(sheet::Column::Month)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Month and year immediately before the given one.
#[must_use]
pub const fn previous_month(month: i32, year: i32) -> (i32, i32) {
    if month == 1 { (12, year - 1) } else { (month - 1, year) }
}

/// Looks up the sheet of the month before `sheet`. Never creates one.
pub async fn previous_sheet<C>(conn: &C, sheet: &sheet::Model) -> Result<Option<sheet::Model>>
where
    C: ConnectionTrait,
{
    let (month, year) = previous_month(sheet.month, sheet.year);
    get_sheet_by_month(conn, month, year).await
}

/// First and last day of a month, inclusive, accounting for leap years.
pub fn month_bounds(month: i32, year: i32) -> Result<(NaiveDate, NaiveDate)> {
    let invalid = || Error::Validation {
        field: "month",
        message: format!("{year}-{month:02} is not a valid calendar month"),
    };

    let month = u32::try_from(month).map_err(|_| invalid())?;
    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    let (next_month, next_year) = if month == 12 { (1, year + 1) } else { (month + 1, year) };
    let last = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .ok_or_else(invalid)?;

    Ok((first, last))
}

/// All transactions dated within the sheet's month, on any account.
pub async fn sheet_transactions<C>(conn: &C, sheet: &sheet::Model) -> Result<Vec<transaction::Model>>
where
    C: ConnectionTrait,
{
    let (first, last) = month_bounds(sheet.month, sheet.year)?;
    Transaction::find()
        .filter(transaction::Column::Date.between(first, last))
        .order_by_asc(transaction::Column::Date)
        .order_by_asc(transaction::Column::Id)
        .all(conn)
        .await
        .map_err(Into::into)
}

/// Sum of the positive transaction values within the sheet's month.
pub async fn sheet_inflow<C>(conn: &C, sheet: &sheet::Model) -> Result<Decimal>
where
    C: ConnectionTrait,
{
    let (first, last) = month_bounds(sheet.month, sheet.year)?;
    let values: Vec<Decimal> = Transaction::find()
        .select_only()
        .column(transaction::Column::Value)
        .filter(transaction::Column::Date.between(first, last))
        .into_tuple()
        .all(conn)
        .await?;

    Ok(values.into_iter().filter(|v| *v > Decimal::ZERO).sum())
}

/// Sum of the sheet's entry values.
pub async fn sheet_budgeted<C>(conn: &C, sheet: &sheet::Model) -> Result<Decimal>
where
    C: ConnectionTrait,
{
    let values: Vec<Decimal> = SheetEntry::find()
        .select_only()
        .column(sheet_entry::Column::Value)
        .filter(sheet_entry::Column::SheetId.eq(sheet.id))
        .into_tuple()
        .all(conn)
        .await?;

    Ok(values.into_iter().sum())
}

/// Walks back from `sheet` and computes its available amount on one connection.
///
/// The chain is collected first, oldest sheet last, then folded forward so that
/// each sheet in it is evaluated exactly once.
async fn available_in<C>(conn: &C, sheet: &sheet::Model) -> Result<Decimal>
where
    C: ConnectionTrait,
{
    let mut chain = Vec::new();
    let mut base = Decimal::ZERO;
    let mut current = Some(sheet.clone());

    while let Some(s) = current {
        if let Some(carryover) = s.carryover {
            base = carryover;
            break;
        }
        current = previous_sheet(conn, &s).await?;
        chain.push(s);
    }

    let mut available = base;
    for s in chain.iter().rev() {
        available += sheet_inflow(conn, s).await? - sheet_budgeted(conn, s).await?;
    }

    debug!(
        "Sheet {} available {} over a chain of {} open sheets",
        sheet.id,
        available,
        chain.len()
    );
    Ok(available)
}

/// Money left to budget on a sheet.
///
/// A closed sheet returns its stored carryover unchanged. An open sheet returns
/// its inflow minus its budgeted amount, plus the available amount of the
/// previous sheet when one exists.
pub async fn sheet_available(db: &DatabaseConnection, sheet: &sheet::Model) -> Result<Decimal> {
    if let Some(carryover) = sheet.carryover {
        return Ok(carryover);
    }

    let txn = db.begin().await?;
    let available = available_in(&txn, sheet).await?;
    txn.commit().await?;
    Ok(available)
}

/// Closes a sheet: freezes its current available amount as carryover and locks its entries.
///
/// # Errors
/// * [`Error::NotFound`] if the sheet does not exist
/// * [`Error::SheetClosed`] if it is already closed
#[instrument(skip(db))]
pub async fn close_sheet(db: &DatabaseConnection, sheet_id: i64) -> Result<sheet::Model> {
    let txn = db.begin().await?;

    let sheet = Sheet::find_by_id(sheet_id)
        .one(&txn)
        .await?
        .ok_or(Error::NotFound {
            entity: ENTITY,
            id: sheet_id,
        })?;

    if !sheet.is_open() {
        return Err(Error::SheetClosed { id: sheet_id });
    }

    let available = available_in(&txn, &sheet).await?;
    validation::validate_amount("carryover", available)?;

    SheetEntry::update_many()
        .col_expr(sheet_entry::Column::Locked, Expr::value(true))
        .filter(sheet_entry::Column::SheetId.eq(sheet_id))
        .exec(&txn)
        .await?;

    let mut active_model: sheet::ActiveModel = sheet.into();
    active_model.carryover = Set(Some(available));
    let closed = active_model.update(&txn).await?;

    txn.commit().await?;
    info!("Closed sheet {} with carryover {}", sheet_id, available);
    Ok(closed)
}

/// Deletes a sheet together with its entries.
#[instrument(skip(db))]
pub async fn delete_sheet(db: &DatabaseConnection, sheet_id: i64) -> Result<()> {
    let result = Sheet::delete_by_id(sheet_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::NotFound {
            entity: ENTITY,
            id: sheet_id,
        });
    }
    info!("Deleted sheet {}", sheet_id);
    Ok(())
}
