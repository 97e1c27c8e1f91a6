//! Error taxonomy for storage access and hive services.
//!
//! Lookups never fail with "not found"; they return `None`. Only storage
//! failures surface as errors.

use thiserror::Error;

/// PostgreSQL SQLSTATE for unique_violation.
const UNIQUE_VIOLATION: &str = "23505";

/// Errors raised by a [`crate::services::HiveStore`] implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The connection handle is no longer usable (e.g. inherited across a fork).
    #[error("Stale database connection: {0}")]
    StaleConnection(#[source] sqlx::Error),

    /// A uniqueness constraint rejected the write.
    #[error("Unique constraint violated: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl StoreError {
    /// Returns true if the failure is recoverable by reopening the connection.
    pub fn is_stale_connection(&self) -> bool {
        matches!(self, StoreError::StaleConnection(_))
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::Protocol(_)
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => StoreError::StaleConnection(err),
            sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) => {
                StoreError::Conflict(db_err.message().to_string())
            }
            _ => StoreError::Database(err),
        }
    }
}

/// Errors returned by the hive services.
#[derive(Debug, Error)]
pub enum HiveError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Conflict: {0}")]
    Conflict(String),
}

impl HiveError {
    pub fn is_stale_connection(&self) -> bool {
        matches!(self, HiveError::Store(err) if err.is_stale_connection())
    }
}
