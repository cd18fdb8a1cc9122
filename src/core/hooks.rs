//! Lifecycle hooks run right after a sheet or category is created.
//!
//! Both hooks synthesize zero-valued sheet entries. They take the caller's
//! connection so that they run inside the same store transaction as the
//! triggering insert; if synthesis fails, the caller drops the transaction and
//! the creation is rolled back with it.

use crate::{
    entities::{Category, Sheet, category, sheet, sheet_entry},
    errors::Result,
};
use rust_decimal::Decimal;
use sea_orm::{ConnectionTrait, QueryOrder, Set, prelude::*};
use tracing::{debug, instrument};

/// Gives a freshly created sheet one zero entry per existing category.
#[instrument(skip(conn, sheet), fields(sheet_id = sheet.id))]
pub async fn on_sheet_created<C>(conn: &C, sheet: &sheet::Model) -> Result<Vec<sheet_entry::Model>>
where
    C: ConnectionTrait,
{
    let categories = Category::find()
        .order_by_asc(category::Column::Id)
        .all(conn)
        .await?;

    let mut entries = Vec::with_capacity(categories.len());
    for category in categories {
        entries.push(insert_zero_entry(conn, sheet.id, category.id).await?);
    }

    debug!("Synthesized {} entries for new sheet", entries.len());
    Ok(entries)
}

/// Gives every open sheet a zero entry for a freshly created category.
///
/// Closed sheets are skipped: a new category never gains an entry on a historical sheet.
#[instrument(skip(conn, category), fields(category_id = category.id))]
pub async fn on_category_created<C>(
    conn: &C,
    category: &category::Model,
) -> Result<Vec<sheet_entry::Model>>
where
    C: ConnectionTrait,
{
    let open_sheets = Sheet::find()
        .filter(sheet::Column::Carryover.is_null())
        .order_by_asc(sheet::Column::Year)
        .order_by_asc(sheet::Column::Month)
        .all(conn)
        .await?;

    let mut entries = Vec::with_capacity(open_sheets.len());
    for sheet in open_sheets {
        entries.push(insert_zero_entry(conn, sheet.id, category.id).await?);
    }

    debug!("Synthesized {} entries for new category", entries.len());
    Ok(entries)
}

async fn insert_zero_entry<C>(conn: &C, sheet_id: i64, category_id: i64) -> Result<sheet_entry::Model>
where
    C: ConnectionTrait,
{
    sheet_entry::ActiveModel {
        sheet_id: Set(sheet_id),
        category_id: Set(category_id),
        value: Set(Decimal::ZERO),
        locked: Set(false),
        ..Default::default()
    }
    .insert(conn)
    .await
    .map_err(Into::into)
}
