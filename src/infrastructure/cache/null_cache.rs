//! No-op cache implementation for testing or disabled caching.

use super::service::CacheService;
use crate::domain::entities::UrlRecord;
use async_trait::async_trait;
use tracing::debug;

/// A cache implementation that does nothing.
///
/// Used when Redis is not configured or the connection fails at startup.
/// Every lookup is a miss and every write is dropped, so all reads go to
/// the store.
pub struct NullCache;

impl NullCache {
    /// Creates a new NullCache instance.
    pub fn new() -> Self {
        debug!("Using NullCache (caching disabled)");
        Self
    }
}

impl Default for NullCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheService for NullCache {
    async fn get(&self, _short_code: &str) -> Option<UrlRecord> {
        None
    }

    async fn set(&self, _record: &UrlRecord) {}

    async fn invalidate(&self, _short_code: &str) {}

    async fn health_check(&self) -> bool {
        true
    }
}
