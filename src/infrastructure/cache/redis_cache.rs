//! Redis-backed cache implementation.

use super::service::{CacheError, CacheResult, CacheService};
use crate::domain::entities::UrlRecord;
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Redis cache of full URL records.
///
/// Records are stored as JSON under `url:<short_code>` with a TTL. Every
/// command is bounded by `op_timeout` so a slow or hung Redis only costs the
/// request that budget before it falls back to the store.
pub struct RedisCache {
    client: ConnectionManager,
    ttl_seconds: u64,
    op_timeout: Duration,
    key_prefix: String,
}

impl RedisCache {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Arguments
    ///
    /// - `redis_url` - Redis connection string (e.g., `"redis://:secret@localhost:6379/0"`)
    /// - `ttl_seconds` - TTL applied to every cached record
    /// - `op_timeout` - Budget for each cache command
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::ConnectionError`] if the URL is invalid, the connection cannot
    /// be established, or the PING health check fails or times out.
    pub async fn connect(
        redis_url: &str,
        ttl_seconds: u64,
        op_timeout: Duration,
    ) -> CacheResult<Self> {
        info!("Connecting to Redis");

        let client = Client::open(redis_url).map_err(|e| {
            CacheError::ConnectionError(format!("Failed to create Redis client: {}", e))
        })?;

        let manager = tokio::time::timeout(op_timeout * 10, ConnectionManager::new(client))
            .await
            .map_err(|_| CacheError::ConnectionError("Timed out connecting to Redis".to_string()))?
            .map_err(|e| {
                CacheError::ConnectionError(format!("Failed to connect to Redis: {}", e))
            })?;

        let mut test_conn = manager.clone();
        tokio::time::timeout(op_timeout * 10, test_conn.ping::<()>())
            .await
            .map_err(|_| CacheError::ConnectionError("Redis PING timed out".to_string()))?
            .map_err(|e| CacheError::ConnectionError(format!("Redis PING failed: {}", e)))?;

        info!("Connected to Redis");

        Ok(Self {
            client: manager,
            ttl_seconds,
            op_timeout,
            key_prefix: "url:".to_string(),
        })
    }

    /// Constructs the full Redis key with namespace prefix.
    fn build_key(&self, short_code: &str) -> String {
        format!("{}{}", self.key_prefix, short_code)
    }

    /// Runs a Redis command within the operation budget.
    async fn bounded<T, F>(&self, command: &str, fut: F) -> CacheResult<T>
    where
        F: Future<Output = redis::RedisResult<T>>,
    {
        match tokio::time::timeout(self.op_timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(CacheError::OperationError(format!("{command}: {e}"))),
            Err(_) => Err(CacheError::OperationError(format!(
                "{command}: timed out after {:?}",
                self.op_timeout
            ))),
        }
    }
}

#[async_trait]
impl CacheService for RedisCache {
    async fn get(&self, short_code: &str) -> Option<UrlRecord> {
        let key = self.build_key(short_code);
        let mut conn = self.client.clone();

        match self
            .bounded("GET", conn.get::<_, Option<String>>(&key))
            .await
        {
            Ok(Some(payload)) => match serde_json::from_str::<UrlRecord>(&payload) {
                Ok(record) => {
                    debug!(short_code, "Cache HIT");
                    Some(record)
                }
                Err(e) => {
                    warn!(short_code, error = %e, "Discarding undecodable cache entry");
                    None
                }
            },
            Ok(None) => {
                debug!(short_code, "Cache MISS");
                None
            }
            Err(e) => {
                warn!(short_code, error = %e, "Redis read failed, treating as miss");
                None
            }
        }
    }

    async fn set(&self, record: &UrlRecord) {
        let payload = match serde_json::to_string(record) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(short_code = %record.short_code, error = %e, "Failed to serialize record for cache");
                return;
            }
        };

        let key = self.build_key(&record.short_code);
        let mut conn = self.client.clone();

        match self
            .bounded("SETEX", conn.set_ex::<_, _, ()>(&key, payload, self.ttl_seconds))
            .await
        {
            Ok(()) => debug!(
                short_code = %record.short_code,
                ttl_seconds = self.ttl_seconds,
                "Cache SET"
            ),
            Err(e) => warn!(short_code = %record.short_code, error = %e, "Redis write failed"),
        }
    }

    async fn invalidate(&self, short_code: &str) {
        let key = self.build_key(short_code);
        let mut conn = self.client.clone();

        match self.bounded("DEL", conn.del::<_, i32>(&key)).await {
            Ok(deleted) if deleted > 0 => debug!(short_code, "Cache INVALIDATE"),
            Ok(_) => {}
            Err(e) => warn!(short_code, error = %e, "Redis delete failed"),
        }
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        self.bounded("PING", conn.ping::<()>()).await.is_ok()
    }
}
