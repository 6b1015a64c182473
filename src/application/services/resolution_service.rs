//! Short code resolution service: creation, lookup and mutation of URL records.

use std::sync::Arc;
use tracing::{debug, error, warn};

use crate::domain::entities::{NewUrlRecord, UrlRecord};
use crate::domain::errors::StoreError;
use crate::domain::repositories::UrlRepository;
use crate::infrastructure::cache::CacheService;
use crate::utils::code_generator::generate_code;
use crate::utils::url_normalizer::{UrlValidationError, normalize_and_validate};

/// Number of codes tried by [`ResolutionService::create`] before giving up.
pub const MAX_CREATE_ATTEMPTS: usize = 10;

/// Failures of resolution service operations.
#[derive(Debug, thiserror::Error)]
pub enum ResolutionError {
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] UrlValidationError),

    #[error("short code '{0}' not found")]
    NotFound(String),

    #[error("failed to generate a unique short code after {attempts} attempts")]
    CodeGenerationExhausted { attempts: usize },

    #[error(transparent)]
    Store(StoreError),
}

impl ResolutionError {
    /// Returns true if retrying the operation may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Store(e) if e.is_transient())
    }

    fn from_store(code: &str, e: StoreError) -> Self {
        match e {
            StoreError::NotFound => Self::NotFound(code.to_string()),
            other => Self::Store(other),
        }
    }
}

/// Orchestrates code generation, the store and the cache.
///
/// The store is authoritative; the cache is consulted first on reads and
/// kept coherent on every write made through this service. Cache failures
/// are absorbed by the [`CacheService`] implementation, so a broken cache and
/// a [`crate::infrastructure::cache::NullCache`] take the same path here.
pub struct ResolutionService<R: UrlRepository> {
    repository: Arc<R>,
    cache: Arc<dyn CacheService>,
}

impl<R: UrlRepository> ResolutionService<R> {
    /// Creates a new resolution service.
    pub fn new(repository: Arc<R>, cache: Arc<dyn CacheService>) -> Self {
        Self { repository, cache }
    }

    /// Creates a record with a freshly generated short code.
    ///
    /// # Code Generation
    ///
    /// Tries up to [`MAX_CREATE_ATTEMPTS`] codes. Every failed attempt, be it a
    /// code already taken in the store, a store error or a failure of the
    /// random source, is logged and the next code is tried. No backoff is
    /// applied between attempts.
    ///
    /// # Errors
    ///
    /// - [`ResolutionError::InvalidUrl`] if the URL fails validation
    /// - [`ResolutionError::CodeGenerationExhausted`] if every attempt failed
    pub async fn create(&self, raw_url: &str) -> Result<UrlRecord, ResolutionError> {
        let original_url = normalize_and_validate(raw_url)?;

        for attempt in 1..=MAX_CREATE_ATTEMPTS {
            let short_code = match generate_code() {
                Ok(code) => code,
                Err(e) => {
                    warn!(attempt, error = %e, "Short code generation failed");
                    continue;
                }
            };

            let candidate = NewUrlRecord {
                original_url: original_url.clone(),
                short_code,
            };

            match self.repository.insert(candidate).await {
                Ok(record) => {
                    self.cache.set(&record).await;
                    debug!(short_code = %record.short_code, attempt, "Created short code");
                    return Ok(record);
                }
                Err(StoreError::DuplicateCode) => {
                    debug!(attempt, "Short code collision, retrying");
                }
                Err(e) => {
                    warn!(attempt, error = %e, "Failed to insert URL record, retrying");
                }
            }
        }

        error!(
            attempts = MAX_CREATE_ATTEMPTS,
            "Giving up on short code generation"
        );
        Err(ResolutionError::CodeGenerationExhausted {
            attempts: MAX_CREATE_ATTEMPTS,
        })
    }

    /// Looks up a record, serving it from the cache when present.
    ///
    /// A cache hit is returned as-is. On a miss the store is read and the
    /// cache populated.
    ///
    /// The populate is not ordered against concurrent writers: if an
    /// `update` or `increment_access` invalidates the entry between the store
    /// read and the `set`, the older record is cached and served until the
    /// TTL expires.
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionError::NotFound`] if the code does not exist.
    pub async fn get(&self, short_code: &str) -> Result<UrlRecord, ResolutionError> {
        if let Some(record) = self.cache.get(short_code).await {
            return Ok(record);
        }

        let record = self
            .repository
            .find_by_code(short_code)
            .await
            .map_err(ResolutionError::Store)?
            .ok_or_else(|| ResolutionError::NotFound(short_code.to_string()))?;

        self.cache.set(&record).await;

        Ok(record)
    }

    /// Points an existing short code at a new URL.
    ///
    /// The cache entry is overwritten with the updated record rather than
    /// dropped, so the next read is still a hit.
    ///
    /// # Errors
    ///
    /// - [`ResolutionError::InvalidUrl`] if the URL fails validation
    /// - [`ResolutionError::NotFound`] if the code does not exist
    pub async fn update(
        &self,
        short_code: &str,
        raw_url: &str,
    ) -> Result<UrlRecord, ResolutionError> {
        let original_url = normalize_and_validate(raw_url)?;

        let record = self
            .repository
            .update_url(short_code, &original_url)
            .await
            .map_err(|e| ResolutionError::from_store(short_code, e))?;

        self.cache.set(&record).await;

        Ok(record)
    }

    /// Permanently deletes a record and its cache entry.
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionError::NotFound`] if the code does not exist.
    pub async fn delete(&self, short_code: &str) -> Result<(), ResolutionError> {
        self.repository
            .delete(short_code)
            .await
            .map_err(|e| ResolutionError::from_store(short_code, e))?;

        self.cache.invalidate(short_code).await;

        Ok(())
    }

    /// Adds one to the access counter of a record.
    ///
    /// The cache entry is invalidated, not refreshed, so the next read picks
    /// up the new count from the store.
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionError::NotFound`] if the record no longer exists.
    pub async fn increment_access(&self, short_code: &str) -> Result<(), ResolutionError> {
        self.repository
            .increment_access(short_code)
            .await
            .map_err(|e| ResolutionError::from_store(short_code, e))?;

        self.cache.invalidate(short_code).await;

        Ok(())
    }

    /// Returns every record with its access count, read straight from the store.
    pub async fn list_all_with_stats(&self) -> Result<Vec<UrlRecord>, ResolutionError> {
        self.repository
            .list_all()
            .await
            .map_err(ResolutionError::Store)
    }

    /// Counts stored records.
    pub async fn count(&self) -> Result<i64, ResolutionError> {
        self.repository.count().await.map_err(ResolutionError::Store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockUrlRepository;
    use crate::infrastructure::cache::{MockCacheService, NullCache};
    use crate::utils::code_generator::is_well_formed;
    use chrono::Utc;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn test_record(code: &str, url: &str, access_count: i64) -> UrlRecord {
        let now = Utc::now();
        UrlRecord::new(1, url.to_string(), code.to_string(), access_count, now, now)
    }

    fn record_from(new_record: NewUrlRecord) -> UrlRecord {
        test_record(&new_record.short_code, &new_record.original_url, 0)
    }

    /// In-process cache used to observe coherence without Redis.
    #[derive(Default)]
    struct MapCache {
        entries: Mutex<HashMap<String, UrlRecord>>,
    }

    impl MapCache {
        fn contains(&self, code: &str) -> bool {
            self.entries.lock().unwrap().contains_key(code)
        }
    }

    #[async_trait::async_trait]
    impl CacheService for MapCache {
        async fn get(&self, short_code: &str) -> Option<UrlRecord> {
            self.entries.lock().unwrap().get(short_code).cloned()
        }

        async fn set(&self, record: &UrlRecord) {
            self.entries
                .lock()
                .unwrap()
                .insert(record.short_code.clone(), record.clone());
        }

        async fn invalidate(&self, short_code: &str) {
            self.entries.lock().unwrap().remove(short_code);
        }

        async fn health_check(&self) -> bool {
            true
        }
    }

    #[tokio::test]
    async fn test_create_success_populates_cache() {
        let mut repo = MockUrlRepository::new();
        repo.expect_insert()
            .withf(|new_record| {
                new_record.original_url == "https://example.com/page"
                    && is_well_formed(&new_record.short_code)
            })
            .times(1)
            .returning(|new_record| Ok(record_from(new_record)));

        let mut cache = MockCacheService::new();
        cache
            .expect_set()
            .withf(|record| record.original_url == "https://example.com/page")
            .times(1)
            .returning(|_| ());

        let service = ResolutionService::new(Arc::new(repo), Arc::new(cache));

        let record = service.create("example.com/page").await.unwrap();

        assert_eq!(record.original_url, "https://example.com/page");
        assert!(is_well_formed(&record.short_code));
        assert_eq!(record.access_count, 0);
    }

    #[tokio::test]
    async fn test_create_retries_on_collision() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::new(Mutex::new(Vec::new()));

        let mut repo = MockUrlRepository::new();
        let calls_clone = calls.clone();
        let seen_clone = seen.clone();
        repo.expect_insert().times(3).returning(move |new_record| {
            seen_clone.lock().unwrap().push(new_record.short_code.clone());
            if calls_clone.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(StoreError::DuplicateCode)
            } else {
                Ok(record_from(new_record))
            }
        });

        let service = ResolutionService::new(Arc::new(repo), Arc::new(NullCache::new()));

        let record = service.create("https://example.com").await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 3);
        assert_eq!(seen.last().unwrap(), &record.short_code);
    }

    #[tokio::test]
    async fn test_create_exhausts_retry_budget() {
        let mut repo = MockUrlRepository::new();
        repo.expect_insert()
            .times(MAX_CREATE_ATTEMPTS)
            .returning(|_| Err(StoreError::DuplicateCode));

        let mut cache = MockCacheService::new();
        cache.expect_set().times(0);

        let service = ResolutionService::new(Arc::new(repo), Arc::new(cache));

        let result = service.create("https://example.com").await;

        assert!(matches!(
            result,
            Err(ResolutionError::CodeGenerationExhausted { attempts }) if attempts == MAX_CREATE_ATTEMPTS
        ));
    }

    #[tokio::test]
    async fn test_create_retries_after_store_failure() {
        let calls = Arc::new(AtomicUsize::new(0));

        let mut repo = MockUrlRepository::new();
        let calls_clone = calls.clone();
        repo.expect_insert().times(2).returning(move |new_record| {
            if calls_clone.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(StoreError::Timeout(std::time::Duration::from_secs(5)))
            } else {
                Ok(record_from(new_record))
            }
        });

        let service = ResolutionService::new(Arc::new(repo), Arc::new(NullCache::new()));

        let record = service.create("https://example.com").await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(record.original_url, "https://example.com");
    }

    #[tokio::test]
    async fn test_create_persistent_store_failure_exhausts_budget() {
        let mut repo = MockUrlRepository::new();
        repo.expect_insert()
            .times(MAX_CREATE_ATTEMPTS)
            .returning(|_| Err(StoreError::Timeout(std::time::Duration::from_secs(5))));

        let service = ResolutionService::new(Arc::new(repo), Arc::new(NullCache::new()));

        let result = service.create("https://example.com").await;

        assert!(matches!(
            result,
            Err(ResolutionError::CodeGenerationExhausted { attempts }) if attempts == MAX_CREATE_ATTEMPTS
        ));
    }

    #[tokio::test]
    async fn test_create_invalid_url_never_touches_store() {
        let mut repo = MockUrlRepository::new();
        repo.expect_insert().times(0);

        let service = ResolutionService::new(Arc::new(repo), Arc::new(NullCache::new()));

        for input in ["", "ftp://x.com", "https://", "mailto://a@b.c"] {
            let result = service.create(input).await;
            assert!(
                matches!(result, Err(ResolutionError::InvalidUrl(_))),
                "expected InvalidUrl for {input:?}"
            );
        }
    }

    #[tokio::test]
    async fn test_get_cache_hit_skips_store() {
        let mut repo = MockUrlRepository::new();
        repo.expect_find_by_code().times(0);

        let mut cache = MockCacheService::new();
        cache
            .expect_get()
            .withf(|code| code == "abc123")
            .times(1)
            .returning(|code| Some(test_record(code, "https://cached.example", 4)));
        cache.expect_set().times(0);

        let service = ResolutionService::new(Arc::new(repo), Arc::new(cache));

        let record = service.get("abc123").await.unwrap();
        assert_eq!(record.original_url, "https://cached.example");
        assert_eq!(record.access_count, 4);
    }

    #[tokio::test]
    async fn test_get_cache_miss_reads_store_and_populates() {
        let mut repo = MockUrlRepository::new();
        repo.expect_find_by_code()
            .times(1)
            .returning(|code| Ok(Some(test_record(code, "https://example.com", 0))));

        let mut cache = MockCacheService::new();
        cache.expect_get().times(1).returning(|_| None);
        cache
            .expect_set()
            .withf(|record| record.short_code == "abc123")
            .times(1)
            .returning(|_| ());

        let service = ResolutionService::new(Arc::new(repo), Arc::new(cache));

        let record = service.get("abc123").await.unwrap();
        assert_eq!(record.original_url, "https://example.com");
    }

    #[tokio::test]
    async fn test_get_not_found() {
        let mut repo = MockUrlRepository::new();
        repo.expect_find_by_code().times(1).returning(|_| Ok(None));

        let mut cache = MockCacheService::new();
        cache.expect_get().returning(|_| None);
        cache.expect_set().times(0);

        let service = ResolutionService::new(Arc::new(repo), Arc::new(cache));

        let result = service.get("nope12").await;
        assert!(matches!(result, Err(ResolutionError::NotFound(code)) if code == "nope12"));
    }

    #[tokio::test]
    async fn test_update_overwrites_cache_entry() {
        let mut repo = MockUrlRepository::new();
        repo.expect_update_url()
            .withf(|code, url| code == "abc123" && url == "https://new.example/path")
            .times(1)
            .returning(|code, url| Ok(test_record(code, url, 2)));

        let mut cache = MockCacheService::new();
        cache
            .expect_set()
            .withf(|record| record.original_url == "https://new.example/path")
            .times(1)
            .returning(|_| ());
        cache.expect_invalidate().times(0);

        let service = ResolutionService::new(Arc::new(repo), Arc::new(cache));

        let record = service.update("abc123", "new.example/path").await.unwrap();
        assert_eq!(record.original_url, "https://new.example/path");
    }

    #[tokio::test]
    async fn test_update_not_found() {
        let mut repo = MockUrlRepository::new();
        repo.expect_update_url()
            .times(1)
            .returning(|_, _| Err(StoreError::NotFound));

        let service = ResolutionService::new(Arc::new(repo), Arc::new(NullCache::new()));

        let result = service.update("abc123", "https://example.com").await;
        assert!(matches!(result, Err(ResolutionError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_invalid_url() {
        let mut repo = MockUrlRepository::new();
        repo.expect_update_url().times(0);

        let service = ResolutionService::new(Arc::new(repo), Arc::new(NullCache::new()));

        let result = service.update("abc123", "ftp://x.com").await;
        assert!(matches!(result, Err(ResolutionError::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn test_update_then_get_returns_new_url_with_cache() {
        let mut repo = MockUrlRepository::new();
        repo.expect_update_url()
            .returning(|code, url| Ok(test_record(code, url, 0)));
        repo.expect_find_by_code().times(0);

        let cache = Arc::new(MapCache::default());
        cache
            .set(&test_record("abc123", "https://old.example", 0))
            .await;

        let service = ResolutionService::new(Arc::new(repo), cache.clone());

        service.update("abc123", "https://new.example").await.unwrap();
        let record = service.get("abc123").await.unwrap();

        assert_eq!(record.original_url, "https://new.example");
    }

    #[tokio::test]
    async fn test_delete_invalidates_cache() {
        let mut repo = MockUrlRepository::new();
        repo.expect_delete()
            .withf(|code| code == "abc123")
            .times(1)
            .returning(|_| Ok(()));

        let cache = Arc::new(MapCache::default());
        cache
            .set(&test_record("abc123", "https://example.com", 0))
            .await;

        let service = ResolutionService::new(Arc::new(repo), cache.clone());

        service.delete("abc123").await.unwrap();
        assert!(!cache.contains("abc123"));
    }

    #[tokio::test]
    async fn test_delete_not_found_keeps_cache_untouched() {
        let mut repo = MockUrlRepository::new();
        repo.expect_delete()
            .times(1)
            .returning(|_| Err(StoreError::NotFound));

        let mut cache = MockCacheService::new();
        cache.expect_invalidate().times(0);

        let service = ResolutionService::new(Arc::new(repo), Arc::new(cache));

        let result = service.delete("abc123").await;
        assert!(matches!(result, Err(ResolutionError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_increment_invalidates_instead_of_refreshing() {
        let mut repo = MockUrlRepository::new();
        repo.expect_increment_access()
            .times(1)
            .returning(|_| Ok(()));

        let mut cache = MockCacheService::new();
        cache
            .expect_invalidate()
            .withf(|code| code == "abc123")
            .times(1)
            .returning(|_| ());
        cache.expect_set().times(0);

        let service = ResolutionService::new(Arc::new(repo), Arc::new(cache));

        service.increment_access("abc123").await.unwrap();
    }

    #[tokio::test]
    async fn test_increment_not_found() {
        let mut repo = MockUrlRepository::new();
        repo.expect_increment_access()
            .returning(|_| Err(StoreError::NotFound));

        let service = ResolutionService::new(Arc::new(repo), Arc::new(NullCache::new()));

        let result = service.increment_access("gone12").await;
        assert!(matches!(result, Err(ResolutionError::NotFound(_))));
        assert!(!result.unwrap_err().is_transient());
    }

    #[tokio::test]
    async fn test_list_bypasses_cache() {
        let mut repo = MockUrlRepository::new();
        repo.expect_list_all().times(1).returning(|| {
            Ok(vec![
                test_record("abc123", "https://a.example", 5),
                test_record("def456", "https://b.example", 0),
            ])
        });

        let mut cache = MockCacheService::new();
        cache.expect_get().times(0);
        cache.expect_set().times(0);

        let service = ResolutionService::new(Arc::new(repo), Arc::new(cache));

        let records = service.list_all_with_stats().await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].access_count, 5);
    }

    #[tokio::test]
    async fn test_store_failure_is_transient_when_timed_out() {
        let mut repo = MockUrlRepository::new();
        repo.expect_increment_access()
            .returning(|_| Err(StoreError::Timeout(std::time::Duration::from_secs(5))));

        let service = ResolutionService::new(Arc::new(repo), Arc::new(NullCache::new()));

        let err = service.increment_access("abc123").await.unwrap_err();
        assert!(err.is_transient());
    }
}
