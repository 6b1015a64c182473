//! URL record entity, the mapping from a short code to its target URL.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored short code mapping with its access counter.
///
/// The `id`, `short_code` and `created_at` fields never change after creation.
/// `updated_at` moves only when `original_url` changes; access count
/// increments leave it alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct UrlRecord {
    pub id: i64,
    pub original_url: String,
    pub short_code: String,
    pub access_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UrlRecord {
    /// Creates a new UrlRecord instance.
    pub fn new(
        id: i64,
        original_url: String,
        short_code: String,
        access_count: i64,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            original_url,
            short_code,
            access_count,
            created_at,
            updated_at,
        }
    }

    /// Returns the URL a redirect should point at.
    ///
    /// Stored URLs always carry a scheme, but records written by older
    /// deployments may not, so `https://` is completed here as well.
    pub fn redirect_target(&self) -> String {
        if self.original_url.starts_with("http://") || self.original_url.starts_with("https://") {
            self.original_url.clone()
        } else {
            format!("https://{}", self.original_url)
        }
    }
}

/// Input data for inserting a new record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUrlRecord {
    pub original_url: String,
    pub short_code: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(url: &str) -> UrlRecord {
        let now = Utc::now();
        UrlRecord::new(1, url.to_string(), "aB3xYz".to_string(), 0, now, now)
    }

    #[test]
    fn test_record_creation() {
        let now = Utc::now();
        let record = UrlRecord::new(
            7,
            "https://example.com".to_string(),
            "abc123".to_string(),
            3,
            now,
            now,
        );

        assert_eq!(record.id, 7);
        assert_eq!(record.short_code, "abc123");
        assert_eq!(record.original_url, "https://example.com");
        assert_eq!(record.access_count, 3);
        assert_eq!(record.created_at, now);
        assert_eq!(record.updated_at, now);
    }

    #[test]
    fn test_redirect_target_keeps_scheme() {
        assert_eq!(record("http://example.com").redirect_target(), "http://example.com");
        assert_eq!(
            record("https://example.com/a").redirect_target(),
            "https://example.com/a"
        );
    }

    #[test]
    fn test_redirect_target_completes_scheme() {
        assert_eq!(
            record("example.com/page").redirect_target(),
            "https://example.com/page"
        );
    }

    #[test]
    fn test_record_json_round_trip() {
        let original = record("https://example.com");
        let json = serde_json::to_string(&original).unwrap();
        let decoded: UrlRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, original);
    }
}
