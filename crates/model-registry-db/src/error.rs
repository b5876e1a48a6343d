//! Database-specific error types and conversions
//!
//! Storage failures keep the original `sqlx::Error` as their source and
//! carry a description of the operation that failed, so callers can tell a
//! missing entity apart from a broken store.

use model_registry_core::RegistryError;
use thiserror::Error;

/// Result type alias for database operations
pub type DbResult<T> = Result<T, DbError>;

/// Database-specific errors
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity or Type not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Domain-level misuse such as a Type mismatch or malformed list options
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A stored row violates a store invariant
    #[error("Invalid stored data: {0}")]
    InvalidData(String),

    /// Underlying storage failure, cause preserved
    #[error("Storage error while {operation}: {source}")]
    Storage {
        operation: String,
        #[source]
        source: sqlx::Error,
    },

    /// Database migration error
    #[error("Migration error: {0}")]
    Migration(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl DbError {
    /// Check if this error is a not-found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, DbError::NotFound(_))
    }

    /// Check if this error is a unique constraint violation reported by the store
    pub fn is_unique_violation(&self) -> bool {
        match self {
            DbError::Storage {
                source: sqlx::Error::Database(db_err),
                ..
            } => db_err.is_unique_violation(),
            _ => false,
        }
    }

    /// Check if this is a transient error that could be retried
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            DbError::Storage {
                source: sqlx::Error::PoolTimedOut | sqlx::Error::Io(_),
                ..
            }
        )
    }
}

/// Build a mapper that wraps a `sqlx::Error` with the failing operation
pub(crate) fn storage(operation: impl Into<String>) -> impl FnOnce(sqlx::Error) -> DbError {
    let operation = operation.into();
    move |source| DbError::Storage { operation, source }
}

/// Convert SQLx migration errors
impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::Migration(format!("{}", err))
    }
}

impl From<RegistryError> for DbError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::NotFound(msg) => DbError::NotFound(msg),
            RegistryError::InvalidArgument(msg) => DbError::InvalidArgument(msg),
            other => DbError::InvalidData(other.to_string()),
        }
    }
}

impl From<DbError> for RegistryError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound(msg) => RegistryError::NotFound(msg),
            DbError::InvalidArgument(msg) => RegistryError::InvalidArgument(msg),
            other => RegistryError::Storage(other.to_string()),
        }
    }
}
