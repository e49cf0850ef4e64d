//! Caller-facing error taxonomy shared by core services.
//!
//! # Invariants
//! - Every failure carries one stable [`ErrorKind`].
//! - A returned error implies no partial effect was committed.

use crate::db::DbError;
use crate::repo::quote_repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Stable classification of a service failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Caller error; retrying the same input will fail again.
    InvalidArgument,
    /// Referenced quote/author does not exist.
    NotFound,
    /// Lock or uniqueness contention; safe to retry with backoff.
    Conflict,
    /// Connection/transaction infrastructure failure.
    StoreUnavailable,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidArgument => "invalid_argument",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::StoreUnavailable => "store_unavailable",
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Service error surfaced to HTTP/CLI callers.
#[derive(Debug)]
pub enum ServiceError {
    InvalidArgument(String),
    NotFound { entity: &'static str, id: i64 },
    Conflict(DbError),
    StoreUnavailable(RepoError),
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::StoreUnavailable(_) => ErrorKind::StoreUnavailable,
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidArgument(message) => write!(f, "invalid argument: {message}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::Conflict(err) => write!(f, "concurrent update conflict: {err}"),
            Self::StoreUnavailable(err) => write!(f, "store unavailable: {err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Conflict(err) => Some(err),
            Self::StoreUnavailable(err) => Some(err),
            Self::InvalidArgument(_) | Self::NotFound { .. } => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::InvalidArgument(err.to_string()),
            RepoError::QuoteNotFound(id) => Self::NotFound { entity: "quote", id },
            RepoError::AuthorNotFound(id) => Self::NotFound {
                entity: "author",
                id,
            },
            RepoError::Db(err) if err.is_contention() => Self::Conflict(err),
            other => Self::StoreUnavailable(other),
        }
    }
}

impl From<DbError> for ServiceError {
    fn from(value: DbError) -> Self {
        RepoError::Db(value).into()
    }
}

impl From<rusqlite::Error> for ServiceError {
    fn from(value: rusqlite::Error) -> Self {
        DbError::Sqlite(value).into()
    }
}
