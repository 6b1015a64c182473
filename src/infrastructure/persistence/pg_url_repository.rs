//! PostgreSQL implementation of the URL repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::entities::{NewUrlRecord, UrlRecord};
use crate::domain::errors::StoreError;
use crate::domain::repositories::UrlRepository;
use crate::utils::db_error::is_unique_violation_on_code;

/// Default budget for a single store operation.
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(5);

const RECORD_COLUMNS: &str =
    "id, original_url, short_code, access_count, created_at, updated_at";

/// PostgreSQL repository for URL records.
///
/// Uniqueness of short codes is enforced by the `urls_short_code_key`
/// constraint; a violating insert surfaces as [`StoreError::DuplicateCode`].
pub struct PgUrlRepository {
    pool: Arc<PgPool>,
    timeout: Duration,
}

impl PgUrlRepository {
    /// Creates a new repository with the default operation timeout.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self::with_timeout(pool, DEFAULT_STORE_TIMEOUT)
    }

    /// Creates a new repository whose operations give up after `timeout`.
    pub fn with_timeout(pool: Arc<PgPool>, timeout: Duration) -> Self {
        Self { pool, timeout }
    }

    async fn bounded<T, F>(&self, fut: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result.map_err(StoreError::from),
            Err(_) => Err(StoreError::Timeout(self.timeout)),
        }
    }
}

#[async_trait]
impl UrlRepository for PgUrlRepository {
    async fn insert(&self, new_record: NewUrlRecord) -> Result<UrlRecord, StoreError> {
        let sql = format!(
            "INSERT INTO urls (original_url, short_code) VALUES ($1, $2) RETURNING {RECORD_COLUMNS}"
        );

        let result = self
            .bounded(
                sqlx::query_as::<_, UrlRecord>(&sql)
                    .bind(&new_record.original_url)
                    .bind(&new_record.short_code)
                    .fetch_one(self.pool.as_ref()),
            )
            .await;

        match result {
            Err(StoreError::Database(e)) if is_unique_violation_on_code(&e) => {
                Err(StoreError::DuplicateCode)
            }
            other => other,
        }
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<UrlRecord>, StoreError> {
        let sql = format!("SELECT {RECORD_COLUMNS} FROM urls WHERE short_code = $1");

        self.bounded(
            sqlx::query_as::<_, UrlRecord>(&sql)
                .bind(code)
                .fetch_optional(self.pool.as_ref()),
        )
        .await
    }

    async fn update_url(&self, code: &str, original_url: &str) -> Result<UrlRecord, StoreError> {
        let sql = format!(
            r#"
            UPDATE urls
            SET original_url = $2, updated_at = NOW()
            WHERE short_code = $1
            RETURNING {RECORD_COLUMNS}
            "#
        );

        self.bounded(
            sqlx::query_as::<_, UrlRecord>(&sql)
                .bind(code)
                .bind(original_url)
                .fetch_optional(self.pool.as_ref()),
        )
        .await?
        .ok_or(StoreError::NotFound)
    }

    async fn delete(&self, code: &str) -> Result<(), StoreError> {
        let result = self
            .bounded(
                sqlx::query("DELETE FROM urls WHERE short_code = $1")
                    .bind(code)
                    .execute(self.pool.as_ref()),
            )
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        Ok(())
    }

    async fn increment_access(&self, code: &str) -> Result<(), StoreError> {
        let result = self
            .bounded(
                sqlx::query("UPDATE urls SET access_count = access_count + 1 WHERE short_code = $1")
                    .bind(code)
                    .execute(self.pool.as_ref()),
            )
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<UrlRecord>, StoreError> {
        let sql = format!("SELECT {RECORD_COLUMNS} FROM urls ORDER BY created_at DESC, id DESC");

        self.bounded(sqlx::query_as::<_, UrlRecord>(&sql).fetch_all(self.pool.as_ref()))
            .await
    }

    async fn count(&self) -> Result<i64, StoreError> {
        self.bounded(
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM urls").fetch_one(self.pool.as_ref()),
        )
        .await
    }
}
