//! Category business logic - creation, renaming, lookup and deletion.
//!
//! Creating a category fires [`hooks::on_category_created`] inside the same
//! store transaction. Deleting one is refused by the store while any
//! transaction references it, while its sheet entries are removed along with it.

use crate::{
    core::{hooks, validation},
    entities::{Category, category},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::{info, instrument};

/// Creates a category and gives every open sheet a zero entry for it.
#[instrument(skip(db))]
pub async fn create_category(db: &DatabaseConnection, name: String) -> Result<category::Model> {
    validation::validate_name("name", &name)?;

    let txn = db.begin().await?;

    let category = category::ActiveModel {
        name: Set(name),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    hooks::on_category_created(&txn, &category).await?;

    txn.commit().await?;
    info!("Created category {} '{}'", category.id, category.name);
    Ok(category)
}

/// Finds a category by its unique ID.
pub async fn get_category_by_id(
    db: &DatabaseConnection,
    category_id: i64,
) -> Result<Option<category::Model>> {
    Category::find_by_id(category_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves all categories in creation order.
pub async fn get_all_categories(db: &DatabaseConnection) -> Result<Vec<category::Model>> {
    Category::find()
        .order_by_asc(category::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Renames an existing category.
pub async fn rename_category(
    db: &DatabaseConnection,
    category_id: i64,
    name: String,
) -> Result<category::Model> {
    validation::validate_name("name", &name)?;

    let existing = Category::find_by_id(category_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "category",
            id: category_id,
        })?;

    let mut active_model: category::ActiveModel = existing.into();
    active_model.name = Set(name);
    active_model.update(db).await.map_err(Into::into)
}

/// Deletes a category together with its sheet entries.
///
/// # Errors
/// [`Error::Integrity`] while any transaction is still classified under it.
#[instrument(skip(db))]
pub async fn delete_category(db: &DatabaseConnection, category_id: i64) -> Result<()> {
    let result = Category::delete_by_id(category_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::NotFound {
            entity: "category",
            id: category_id,
        });
    }
    info!("Deleted category {}", category_id);
    Ok(())
}
