//! DTOs for short URL endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::UrlRecord;

/// Request body for `POST /shorten`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUrlRequest {
    /// URL to shorten. A missing scheme is completed with `https://`.
    #[validate(length(min = 1, max = 2048, message = "URL must be 1 to 2048 characters"))]
    pub url: String,
}

/// Request body for `PUT /shorten/{code}`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUrlRequest {
    #[validate(length(min = 1, max = 2048, message = "URL must be 1 to 2048 characters"))]
    pub url: String,
}

/// Public representation of a short URL.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlResponse {
    pub id: i64,
    pub url: String,
    pub short_code: String,
    pub short_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UrlResponse {
    pub fn from_record(record: UrlRecord, short_url: String) -> Self {
        Self {
            id: record.id,
            url: record.original_url,
            short_code: record.short_code,
            short_url,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// A short URL together with its access counter.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlStatsResponse {
    #[serde(flatten)]
    pub url: UrlResponse,
    pub access_count: i64,
}

impl UrlStatsResponse {
    pub fn from_record(record: UrlRecord, short_url: String) -> Self {
        let access_count = record.access_count;
        Self {
            url: UrlResponse::from_record(record, short_url),
            access_count,
        }
    }
}
