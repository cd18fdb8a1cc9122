//! Unified error type for the ledger core.
//!
//! Every operation surfaces its failure synchronously to the immediate caller.
//! Nothing is retried: a rejected edit fails identically on a second attempt.

use sea_orm::{DbErr, SqlErr};

// SQLite reports a RESTRICT violation with its trigger code (1811), which
// `DbErr::sql_err` does not classify; the message is shared with code 787.
const FOREIGN_KEY_FAILURE: &str = "FOREIGN KEY constraint failed";
use thiserror::Error;

/// All errors produced by the ledger core.
#[derive(Debug, Error)]
pub enum Error {
    /// Field length, numeric range or required-reference violation.
    /// Raised before any write reaches the store.
    #[error("Invalid {field}: {message}")]
    Validation {
        /// Name of the offending field
        field: &'static str,
        /// Human-readable reason
        message: String,
    },

    /// A lockable field was changed on a record whose committed state is locked.
    #[error("Field {field} was changed on locked {entity} {id}")]
    LockedFieldMutation {
        /// Kind of record (`"transaction"`, `"sheet entry"`)
        entity: &'static str,
        /// Identity of the locked record
        id: i64,
        /// First lockable field found to differ
        field: &'static str,
    },

    /// Uniqueness or restrict-delete violation reported by the store.
    #[error("Integrity error: {message}")]
    Integrity {
        /// Message reported by the store
        message: String,
    },

    /// Direct lookup by identity found nothing.
    #[error("{entity} {id} not found")]
    NotFound {
        /// Kind of record
        entity: &'static str,
        /// Requested identity
        id: i64,
    },

    /// The committed lock state changed between the gate's read and the write.
    #[error("{entity} {id} was modified concurrently")]
    ConcurrentModification {
        /// Kind of record
        entity: &'static str,
        /// Identity of the contested record
        id: i64,
    },

    /// A sheet operation that requires an open sheet was attempted on a closed one.
    #[error("Sheet {id} is already closed")]
    SheetClosed {
        /// Identity of the closed sheet
        id: i64,
    },

    /// Seed file or environment could not be read.
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable reason
        message: String,
    },

    /// Any other store failure.
    #[error("Database error: {0}")]
    Database(DbErr),
}

impl From<DbErr> for Error {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(message))
            | Some(SqlErr::ForeignKeyConstraintViolation(message)) => Self::Integrity { message },
            _ if err.to_string().contains(FOREIGN_KEY_FAILURE) => Self::Integrity {
                message: err.to_string(),
            },
            _ => Self::Database(err),
        }
    }
}

// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::RuntimeErr;

    #[test]
    fn test_locked_field_message_names_field() {
        let err = Error::LockedFieldMutation {
            entity: "transaction",
            id: 7,
            field: "value",
        };
        assert_eq!(
            err.to_string(),
            "Field value was changed on locked transaction 7"
        );
    }

    #[test]
    fn test_plain_db_error_is_not_integrity() {
        let err: Error = DbErr::Custom("boom".to_string()).into();
        assert!(matches!(err, Error::Database(_)));
    }

    #[test]
    fn test_restrict_violation_is_integrity() {
        let err: Error = DbErr::Exec(RuntimeErr::Internal(
            "error returned from database: (code: 1811) FOREIGN KEY constraint failed".to_string(),
        ))
        .into();
        assert!(matches!(
            err,
            Error::Integrity { message } if message.contains(FOREIGN_KEY_FAILURE)
        ));
    }
}
