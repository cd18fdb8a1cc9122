//! Lock gate - decides whether an update may be committed.
//!
//! A record whose committed state is locked keeps its lockable fields frozen.
//! The gate compares against the committed lock flag, not the proposed one: an
//! update that sets `locked` and edits other lockable fields in the same step is
//! accepted, because the stored record was not locked yet.

use crate::{
    entities::{sheet_entry, transaction},
    errors::{Error, Result},
};

/// A record with a `locked` flag and a fixed set of fields that freeze with it.
pub trait Lockable {
    /// Kind of record, used in error messages.
    const ENTITY: &'static str;
    /// Names of the fields frozen once the record is locked.
    const LOCKABLE_FIELDS: &'static [&'static str];

    /// Identity of the record.
    fn id(&self) -> i64;

    /// Whether the record is locked.
    fn is_locked(&self) -> bool;

    /// Whether the named lockable field differs between `self` and `other`.
    fn field_differs(&self, other: &Self, field: &str) -> bool;

    /// First lockable field, in [`Self::LOCKABLE_FIELDS`] order, whose value
    /// differs between `self` and `other`.
    fn changed_lockable_field(&self, other: &Self) -> Option<&'static str> {
        Self::LOCKABLE_FIELDS
            .iter()
            .copied()
            .find(|field| self.field_differs(other, field))
    }
}

impl Lockable for transaction::Model {
    const ENTITY: &'static str = "transaction";
    const LOCKABLE_FIELDS: &'static [&'static str] =
        &["partner", "date", "value", "category", "account"];

    fn id(&self) -> i64 {
        self.id
    }

    fn is_locked(&self) -> bool {
        self.locked
    }

    fn field_differs(&self, other: &Self, field: &str) -> bool {
        match field {
            "partner" => self.partner != other.partner,
            "date" => self.date != other.date,
            "value" => self.value != other.value,
            "category" => self.category_id != other.category_id,
            "account" => self.account_id != other.account_id,
            _ => false,
        }
    }
}

impl Lockable for sheet_entry::Model {
    const ENTITY: &'static str = "sheet entry";
    const LOCKABLE_FIELDS: &'static [&'static str] = &["sheet", "category", "value"];

    fn id(&self) -> i64 {
        self.id
    }

    fn is_locked(&self) -> bool {
        self.locked
    }

    fn field_differs(&self, other: &Self, field: &str) -> bool {
        match field {
            "sheet" => self.sheet_id != other.sheet_id,
            "category" => self.category_id != other.category_id,
            "value" => self.value != other.value,
            _ => false,
        }
    }
}

/// Accepts or rejects a proposed state against the committed one.
///
/// `committed` is `None` for a record that does not exist yet, in which case
/// there is nothing to protect.
///
/// # Errors
/// [`Error::LockedFieldMutation`] naming the first changed lockable field when the
/// committed record is locked.
pub fn check_locked_fields<M: Lockable>(committed: Option<&M>, proposed: &M) -> Result<()> {
    let Some(committed) = committed else {
        return Ok(());
    };

    if !committed.is_locked() {
        return Ok(());
    }

    match committed.changed_lockable_field(proposed) {
        Some(field) => Err(Error::LockedFieldMutation {
            entity: M::ENTITY,
            id: committed.id(),
            field,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::panic)]
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn locked_transaction() -> transaction::Model {
        transaction::Model {
            id: 1,
            partner: "Grocer".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, 14).unwrap_or_default(),
            value: Decimal::new(-4_250, 2),
            category_id: 1,
            account_id: 1,
            locked: true,
        }
    }

    fn locked_entry() -> sheet_entry::Model {
        sheet_entry::Model {
            id: 5,
            sheet_id: 1,
            category_id: 2,
            value: Decimal::new(100, 0),
            locked: true,
        }
    }

    #[test]
    fn test_new_record_skips_lock_check() {
        let proposed = locked_transaction();
        assert!(check_locked_fields(None, &proposed).is_ok());
    }

    #[test]
    fn test_locked_transaction_rejects_each_lockable_field() {
        let committed = locked_transaction();
        let edits: [(&str, fn(&mut transaction::Model)); 5] = [
            ("partner", |t| t.partner = "Someone else".to_string()),
            ("date", |t| {
                t.date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap_or_default();
            }),
            ("value", |t| t.value = Decimal::new(-4_251, 2)),
            ("category", |t| t.category_id = 2),
            ("account", |t| t.account_id = 2),
        ];

        for (expected, edit) in edits {
            let mut proposed = committed.clone();
            edit(&mut proposed);
            match check_locked_fields(Some(&committed), &proposed) {
                Err(Error::LockedFieldMutation { entity, id, field }) => {
                    assert_eq!(entity, "transaction");
                    assert_eq!(id, 1);
                    assert_eq!(field, expected);
                }
                other => panic!("expected rejection of {expected}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_locked_transaction_accepts_unchanged_fields() {
        let committed = locked_transaction();
        assert!(check_locked_fields(Some(&committed), &committed.clone()).is_ok());
    }

    #[test]
    fn test_locked_transaction_may_unlock() {
        let committed = locked_transaction();
        let mut proposed = committed.clone();
        proposed.locked = false;
        assert!(check_locked_fields(Some(&committed), &proposed).is_ok());
    }

    #[test]
    fn test_locking_and_editing_in_one_step_is_accepted() {
        let mut committed = locked_transaction();
        committed.locked = false;
        let mut proposed = committed.clone();
        proposed.locked = true;
        proposed.value = Decimal::new(-1, 0);
        assert!(check_locked_fields(Some(&committed), &proposed).is_ok());
    }

    #[test]
    fn test_locked_entry_rejects_each_lockable_field() {
        let committed = locked_entry();
        let edits: [(&str, fn(&mut sheet_entry::Model)); 3] = [
            ("sheet", |e| e.sheet_id = 9),
            ("category", |e| e.category_id = 9),
            ("value", |e| e.value = Decimal::new(101, 0)),
        ];

        for (expected, edit) in edits {
            let mut proposed = committed.clone();
            edit(&mut proposed);
            assert!(matches!(
                check_locked_fields(Some(&committed), &proposed),
                Err(Error::LockedFieldMutation { entity: "sheet entry", field, .. }) if field == expected
            ));
        }
    }

    #[test]
    fn test_first_changed_field_follows_declared_order() {
        let committed = locked_transaction();
        let mut proposed = committed.clone();
        proposed.account_id = 2;
        proposed.partner = "Someone else".to_string();
        assert_eq!(committed.changed_lockable_field(&proposed), Some("partner"));
        assert_eq!(committed.changed_lockable_field(&committed), None);
    }

    #[test]
    fn test_lockable_field_sets() {
        assert_eq!(transaction::Model::LOCKABLE_FIELDS.len(), 5);
        assert_eq!(
            sheet_entry::Model::LOCKABLE_FIELDS,
            &["sheet", "category", "value"]
        );
    }
}
