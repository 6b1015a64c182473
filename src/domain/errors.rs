//! Error types raised by the persistent store.

use std::time::Duration;

/// Failures of a [`crate::domain::repositories::UrlRepository`] call.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The short code is already taken. Raised by inserts only.
    #[error("short code already exists")]
    DuplicateCode,

    /// No record exists for the short code.
    #[error("record not found")]
    NotFound,

    #[error("store operation timed out after {0:?}")]
    Timeout(Duration),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    /// Returns true for failures worth retrying (timeouts, connection problems).
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout(_) => true,
            Self::Database(e) => matches!(e, sqlx::Error::PoolTimedOut | sqlx::Error::Io(_)),
            Self::DuplicateCode | Self::NotFound => false,
        }
    }
}
