//! Sheet entry business logic - budgeting amounts per category and sheet.
//!
//! Entries are never created or deleted here: the lifecycle hooks synthesize
//! them and deleting a sheet or category removes them. Users only edit values,
//! and every edit goes through the lock gate.

use crate::{
    core::{lock, validation},
    entities::{SheetEntry, sheet_entry},
    errors::{Error, Result},
};
use rust_decimal::Decimal;
use sea_orm::{QueryOrder, Set, TransactionTrait, Unchanged, prelude::*};
use tracing::{debug, instrument};

const ENTITY: &str = "sheet entry";

/// Retrieves the entries of a sheet in category order.
pub async fn get_entries_for_sheet(
    db: &DatabaseConnection,
    sheet_id: i64,
) -> Result<Vec<sheet_entry::Model>> {
    SheetEntry::find()
        .filter(sheet_entry::Column::SheetId.eq(sheet_id))
        .order_by_asc(sheet_entry::Column::CategoryId)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds an entry by its unique ID.
pub async fn get_entry_by_id(
    db: &DatabaseConnection,
    entry_id: i64,
) -> Result<Option<sheet_entry::Model>> {
    SheetEntry::find_by_id(entry_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Commits a proposed entry state after the lock gate accepts it.
///
/// # Errors
/// * [`Error::Validation`] if the value does not fit `decimal(12, 2)`
/// * [`Error::NotFound`] if no entry with that id exists
/// * [`Error::LockedFieldMutation`] if the stored entry is locked and `sheet`, `category` or `value` differs
/// * [`Error::ConcurrentModification`] if the stored lock state changed during the update
/// * [`Error::Integrity`] if the new sheet or category does not exist or already has an entry
#[instrument(skip(db, proposed), fields(entry_id = proposed.id))]
pub async fn update_sheet_entry(
    db: &DatabaseConnection,
    proposed: sheet_entry::Model,
) -> Result<sheet_entry::Model> {
    validation::validate_amount("value", proposed.value)?;

    let txn = db.begin().await?;

    let committed = SheetEntry::find_by_id(proposed.id)
        .one(&txn)
        .await?
        .ok_or(Error::NotFound {
            entity: ENTITY,
            id: proposed.id,
        })?;

    lock::check_locked_fields(Some(&committed), &proposed)?;

    let id = proposed.id;
    let active_model = sheet_entry::ActiveModel {
        id: Unchanged(id),
        sheet_id: Set(proposed.sheet_id),
        category_id: Set(proposed.category_id),
        value: Set(proposed.value),
        locked: Set(proposed.locked),
    };

    let updated = SheetEntry::update(active_model)
        .filter(sheet_entry::Column::Locked.eq(committed.locked))
        .exec(&txn)
        .await
        .map_err(|e| match e {
            DbErr::RecordNotUpdated => Error::ConcurrentModification { entity: ENTITY, id },
            other => other.into(),
        })?;

    txn.commit().await?;
    debug!("Updated sheet entry {}", id);
    Ok(updated)
}

/// Budgets `value` on an entry, replacing the previous amount.
pub async fn set_entry_value(
    db: &DatabaseConnection,
    entry_id: i64,
    value: Decimal,
) -> Result<sheet_entry::Model> {
    let entry = get_entry_by_id(db, entry_id).await?.ok_or(Error::NotFound {
        entity: ENTITY,
        id: entry_id,
    })?;

    update_sheet_entry(db, sheet_entry::Model { value, ..entry }).await
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::sheet::{close_sheet, sheet_available};
    use crate::test_utils::*;

    async fn setup_entry() -> Result<(DatabaseConnection, sheet_entry::Model)> {
        let db = setup_test_db().await?;
        create_test_category(&db, "Rent").await?;
        let sheet = create_test_sheet(&db, 1, 2024).await?;
        let entry = get_entries_for_sheet(&db, sheet.id).await?.remove(0);
        Ok((db, entry))
    }

    #[tokio::test]
    async fn test_value_save() -> Result<()> {
        let (db, entry) = setup_entry().await?;

        let updated = set_entry_value(&db, entry.id, Decimal::new(12_345, 2)).await?;
        assert_eq!(updated.value, Decimal::new(12_345, 2));

        let from_db = get_entry_by_id(&db, entry.id).await?.unwrap();
        assert_eq!(from_db.value, Decimal::new(12_345, 2));
        assert!(!from_db.locked);
        Ok(())
    }

    #[tokio::test]
    async fn test_value_decimal_places() -> Result<()> {
        let (db, entry) = setup_entry().await?;
        assert!(matches!(
            set_entry_value(&db, entry.id, Decimal::new(1, 3)).await,
            Err(Error::Validation { field: "value", .. })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_locked_no_change_to_value() -> Result<()> {
        let (db, entry) = setup_entry().await?;
        let locked = update_sheet_entry(
            &db,
            sheet_entry::Model {
                locked: true,
                ..entry
            },
        )
        .await?;

        assert!(matches!(
            set_entry_value(&db, locked.id, Decimal::ONE).await,
            Err(Error::LockedFieldMutation {
                entity: "sheet entry",
                field: "value",
                ..
            })
        ));
        assert_eq!(get_entry_by_id(&db, locked.id).await?, Some(locked));
        Ok(())
    }

    #[tokio::test]
    async fn test_locked_no_change_to_sheet_or_category() -> Result<()> {
        let (db, entry) = setup_entry().await?;
        let other_category = create_test_category(&db, "Food").await?;
        let other_sheet = create_test_sheet(&db, 2, 2024).await?;
        let locked = update_sheet_entry(
            &db,
            sheet_entry::Model {
                locked: true,
                ..entry
            },
        )
        .await?;

        let moved_sheet = sheet_entry::Model {
            sheet_id: other_sheet.id,
            ..locked.clone()
        };
        assert!(matches!(
            update_sheet_entry(&db, moved_sheet).await,
            Err(Error::LockedFieldMutation { field: "sheet", .. })
        ));

        let moved_category = sheet_entry::Model {
            category_id: other_category.id,
            ..locked.clone()
        };
        assert!(matches!(
            update_sheet_entry(&db, moved_category).await,
            Err(Error::LockedFieldMutation {
                field: "category",
                ..
            })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_closed_sheet_entries_frozen() -> Result<()> {
        let (db, entry) = setup_entry().await?;
        set_entry_value(&db, entry.id, Decimal::new(5_000, 2)).await?;

        let closed = close_sheet(&db, entry.sheet_id).await?;
        assert!(matches!(
            set_entry_value(&db, entry.id, Decimal::ZERO).await,
            Err(Error::LockedFieldMutation { .. })
        ));
        assert_eq!(sheet_available(&db, &closed).await?, Decimal::new(-5_000, 2));
        Ok(())
    }

    #[tokio::test]
    async fn test_set_value_unknown_entry() -> Result<()> {
        let db = setup_test_db().await?;
        assert!(matches!(
            set_entry_value(&db, 7, Decimal::ONE).await,
            Err(Error::NotFound {
                entity: "sheet entry",
                id: 7
            })
        ));
        Ok(())
    }
}
