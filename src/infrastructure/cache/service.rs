//! Cache service trait and error types.

use async_trait::async_trait;

use crate::domain::entities::UrlRecord;

/// Errors that can occur while setting up a cache backend.
///
/// Per-operation failures never surface as errors; see [`CacheService`].
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    ConnectionError(String),

    #[error("Cache operation error: {0}")]
    OperationError(String),
}

/// Result type for cache setup.
pub type CacheResult<T> = Result<T, CacheError>;

/// Best-effort cache of URL records keyed by short code.
///
/// The cache is never authoritative. Implementations absorb every backend
/// failure (connection, timeout, bad payload): reads degrade to a miss and
/// writes to a no-op, with the failure logged. Callers therefore treat an
/// absent cache and a broken one the same way.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed cache with TTL support
/// - [`crate::infrastructure::cache::NullCache`] - No-op implementation for disabled caching
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Returns the cached record for a short code, or `None` on miss or error.
    async fn get(&self, short_code: &str) -> Option<UrlRecord>;

    /// Stores the full record under its short code with the configured TTL.
    async fn set(&self, record: &UrlRecord);

    /// Removes the cached record for a short code.
    async fn invalidate(&self, short_code: &str);

    /// Checks if the cache backend is reachable.
    async fn health_check(&self) -> bool;
}
