#![allow(dead_code)]

use async_trait::async_trait;
use axum::ServiceExt;
use axum::extract::Request;
use axum_test::TestServer;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

use shortlink::application::services::ResolutionService;
use shortlink::domain::access_event::AccessEvent;
use shortlink::domain::entities::UrlRecord;
use shortlink::infrastructure::cache::{CacheService, NullCache};
use shortlink::infrastructure::persistence::PgUrlRepository;
use shortlink::routes::app_router;
use shortlink::state::AppState;

pub const TEST_BASE_URL: &str = "http://localhost:8080/";

/// In-process cache used to observe what the service writes to the cache.
#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, UrlRecord>>,
}

impl MemoryCache {
    pub fn contains(&self, short_code: &str) -> bool {
        self.entries.lock().unwrap().contains_key(short_code)
    }

    pub fn peek(&self, short_code: &str) -> Option<UrlRecord> {
        self.entries.lock().unwrap().get(short_code).cloned()
    }

    /// Plants an entry directly, bypassing the service.
    pub fn put(&self, record: UrlRecord) {
        self.entries
            .lock()
            .unwrap()
            .insert(record.short_code.clone(), record);
    }
}

#[async_trait]
impl CacheService for MemoryCache {
    async fn get(&self, short_code: &str) -> Option<UrlRecord> {
        self.peek(short_code)
    }

    async fn set(&self, record: &UrlRecord) {
        self.put(record.clone());
    }

    async fn invalidate(&self, short_code: &str) {
        self.entries.lock().unwrap().remove(short_code);
    }

    async fn health_check(&self) -> bool {
        true
    }
}

/// Cache whose backend is unreachable: every read misses, every write is lost.
pub struct UnreachableCache;

#[async_trait]
impl CacheService for UnreachableCache {
    async fn get(&self, _short_code: &str) -> Option<UrlRecord> {
        None
    }

    async fn set(&self, _record: &UrlRecord) {}

    async fn invalidate(&self, _short_code: &str) {}

    async fn health_check(&self) -> bool {
        false
    }
}

pub fn create_service(
    pool: PgPool,
    cache: Arc<dyn CacheService>,
) -> Arc<ResolutionService<PgUrlRepository>> {
    let repository = Arc::new(PgUrlRepository::new(Arc::new(pool)));
    Arc::new(ResolutionService::new(repository, cache))
}

pub fn create_test_state_with_cache(
    pool: PgPool,
    cache: Arc<dyn CacheService>,
) -> (AppState, mpsc::Receiver<AccessEvent>) {
    let (tx, rx) = mpsc::channel(100);
    let service = create_service(pool, cache.clone());
    let state = AppState::new(service, cache, tx, TEST_BASE_URL);

    (state, rx)
}

pub fn create_test_state(pool: PgPool) -> (AppState, mpsc::Receiver<AccessEvent>) {
    create_test_state_with_cache(pool, Arc::new(NullCache::new()))
}

/// Serves the full application router, middleware included.
pub fn create_test_server(state: AppState) -> TestServer {
    let app = ServiceExt::<Request>::into_make_service(app_router(state));
    TestServer::new(app).unwrap()
}

pub async fn insert_url(pool: &PgPool, code: &str, url: &str) -> UrlRecord {
    sqlx::query_as::<_, UrlRecord>(
        "INSERT INTO urls (original_url, short_code) VALUES ($1, $2) \
         RETURNING id, original_url, short_code, access_count, created_at, updated_at",
    )
    .bind(url)
    .bind(code)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn access_count(pool: &PgPool, code: &str) -> i64 {
    sqlx::query_scalar("SELECT access_count FROM urls WHERE short_code = $1")
        .bind(code)
        .fetch_one(pool)
        .await
        .unwrap()
}
