//! Repository trait for URL record storage.

use crate::domain::entities::{NewUrlRecord, UrlRecord};
use crate::domain::errors::StoreError;
use async_trait::async_trait;

/// Durable mapping from short code to [`UrlRecord`].
///
/// The store is the single source of truth for short code uniqueness: a
/// colliding insert is rejected with [`StoreError::DuplicateCode`], which
/// callers can tell apart from every other failure.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUrlRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_url.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlRepository: Send + Sync {
    /// Inserts a new record with a zero access count.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateCode`] if the short code is taken.
    async fn insert(&self, new_record: NewUrlRecord) -> Result<UrlRecord, StoreError>;

    /// Finds a record by its short code.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(UrlRecord))` if found
    /// - `Ok(None)` if not found
    async fn find_by_code(&self, code: &str) -> Result<Option<UrlRecord>, StoreError>;

    /// Replaces the target URL and bumps `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no record matches `code`.
    async fn update_url(&self, code: &str, original_url: &str) -> Result<UrlRecord, StoreError>;

    /// Permanently removes a record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no record matches `code`.
    async fn delete(&self, code: &str) -> Result<(), StoreError>;

    /// Atomically adds one to the access counter. `updated_at` is unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no record matches `code`.
    async fn increment_access(&self, code: &str) -> Result<(), StoreError>;

    /// Returns every record, newest first.
    async fn list_all(&self) -> Result<Vec<UrlRecord>, StoreError>;

    /// Counts stored records.
    async fn count(&self) -> Result<i64, StoreError>;
}
