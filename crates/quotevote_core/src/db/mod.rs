//! SQLite storage bootstrap and schema migration entry points.
//!
//! # Responsibility
//! - Open and configure SQLite connections for the quote store.
//! - Apply schema migrations in deterministic order.
//! - Hand out one connection per request through [`Store`].
//!
//! # Invariants
//! - Migration version is tracked via `PRAGMA user_version`.
//! - Core code must not read/write application data before migrations succeed.
//! - No connection outlives the request that acquired it.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;
mod seed;
mod store;

pub use open::{open_db, open_db_in_memory, open_db_with, DbOptions};
pub use seed::seed_sample_data;
pub use store::Store;

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl DbError {
    /// Returns whether this error is lock contention rather than a broken store.
    ///
    /// Covers `SQLITE_BUSY`, `SQLITE_LOCKED` and unique-key races on insert.
    pub fn is_contention(&self) -> bool {
        match self {
            Self::Sqlite(rusqlite::Error::SqliteFailure(err, _)) => matches!(
                err.code,
                rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked
            ) || err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
            _ => false,
        }
    }
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

#[cfg(test)]
mod tests {
    use super::DbError;
    use rusqlite::ffi;

    fn failure(code: i32) -> DbError {
        DbError::Sqlite(rusqlite::Error::SqliteFailure(ffi::Error::new(code), None))
    }

    #[test]
    fn busy_locked_and_unique_are_contention() {
        assert!(failure(ffi::SQLITE_BUSY).is_contention());
        assert!(failure(ffi::SQLITE_LOCKED).is_contention());
        assert!(failure(ffi::SQLITE_CONSTRAINT_UNIQUE).is_contention());
    }

    #[test]
    fn check_violation_and_io_errors_are_not_contention() {
        assert!(!failure(ffi::SQLITE_CONSTRAINT_CHECK).is_contention());
        assert!(!failure(ffi::SQLITE_IOERR).is_contention());
        assert!(!DbError::UnsupportedSchemaVersion {
            db_version: 9,
            latest_supported: 1,
        }
        .is_contention());
    }
}
