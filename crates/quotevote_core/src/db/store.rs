//! Explicit store handle shared by request handlers.
//!
//! # Responsibility
//! - Remember where the database lives and how connections are tuned.
//! - Migrate once at process start, then open one connection per request.
//!
//! # Invariants
//! - The handle holds no open connection; callers own and drop theirs.
//! - Counters are never cached here; every read goes to the database.

use super::open::{open_db_with, DbOptions};
use super::DbResult;
use log::info;
use rusqlite::Connection;
use std::path::{Path, PathBuf};

/// Cloneable handle to one SQLite database file.
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
    options: DbOptions,
}

impl Store {
    /// Opens the database once to apply migrations and returns the handle.
    ///
    /// # Errors
    /// - Returns an error when the file cannot be opened or migrated.
    pub fn open(path: impl Into<PathBuf>, options: DbOptions) -> DbResult<Self> {
        let store = Self {
            path: path.into(),
            options,
        };
        drop(store.connect()?);
        info!(
            "event=store_open module=db status=ok path={} busy_timeout_ms={}",
            store.path.display(),
            store.options.busy_timeout.as_millis()
        );
        Ok(store)
    }

    /// Acquires a fresh connection for one unit of work.
    ///
    /// The connection is closed when the returned value is dropped.
    pub fn connect(&self) -> DbResult<Connection> {
        open_db_with(&self.path, &self.options)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn options(&self) -> &DbOptions {
        &self.options
    }
}
