mod common;

use serde_json::Value;
use sqlx::PgPool;
use std::sync::Arc;

#[sqlx::test]
async fn test_stats_for_code(pool: PgPool) {
    common::insert_url(&pool, "sta123", "https://example.com").await;
    let (state, _rx) = common::create_test_state(pool.clone());
    let service = state.resolution_service.clone();
    let server = common::create_test_server(state);

    for _ in 0..3 {
        service.increment_access("sta123").await.unwrap();
    }

    let response = server.get("/shorten/sta123/stats").await;

    response.assert_status_ok();
    let json = response.json::<Value>();
    assert_eq!(json["shortCode"], "sta123");
    assert_eq!(json["url"], "https://example.com");
    assert_eq!(json["accessCount"], 3);
    assert!(json["shortUrl"].as_str().unwrap().ends_with("/r/sta123"));
}

#[sqlx::test]
async fn test_stats_not_found(pool: PgPool) {
    let (state, _rx) = common::create_test_state(pool);
    let server = common::create_test_server(state);

    let response = server.get("/shorten/nope00/stats").await;

    response.assert_status_not_found();
}

#[sqlx::test]
async fn test_stats_fresh_after_increment_with_cache(pool: PgPool) {
    let cache = Arc::new(common::MemoryCache::default());
    common::insert_url(&pool, "fresh1", "https://example.com").await;
    let (state, _rx) = common::create_test_state_with_cache(pool, cache.clone());
    let service = state.resolution_service.clone();
    let server = common::create_test_server(state);

    let before = server.get("/shorten/fresh1/stats").await.json::<Value>();
    assert_eq!(before["accessCount"], 0);
    assert!(cache.contains("fresh1"));

    service.increment_access("fresh1").await.unwrap();
    assert!(!cache.contains("fresh1"));

    let after = server.get("/shorten/fresh1/stats").await.json::<Value>();
    assert_eq!(after["accessCount"], 1);
}

#[sqlx::test]
async fn test_stats_list(pool: PgPool) {
    common::insert_url(&pool, "list01", "https://one.com").await;
    common::insert_url(&pool, "list02", "https://two.com").await;
    let (state, _rx) = common::create_test_state(pool);
    let service = state.resolution_service.clone();
    let server = common::create_test_server(state);

    service.increment_access("list01").await.unwrap();

    let response = server.get("/shorten/stats").await;

    response.assert_status_ok();
    let json = response.json::<Value>();
    let items = json.as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["shortCode"], "list02");
    assert_eq!(items[0]["accessCount"], 0);
    assert_eq!(items[1]["shortCode"], "list01");
    assert_eq!(items[1]["accessCount"], 1);
}

#[sqlx::test]
async fn test_stats_list_empty(pool: PgPool) {
    let (state, _rx) = common::create_test_state(pool);
    let server = common::create_test_server(state);

    let response = server.get("/shorten/stats").await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), serde_json::json!([]));
}
