//! Shared application state injected into handlers.

use std::sync::Arc;
use tokio::sync::mpsc;

use crate::application::services::ResolutionService;
use crate::domain::access_event::AccessEvent;
use crate::infrastructure::cache::CacheService;
use crate::infrastructure::persistence::PgUrlRepository;

/// State shared by all HTTP handlers.
///
/// Every handle is constructed once in [`crate::server::run`] and cloned
/// cheaply per request.
#[derive(Clone)]
pub struct AppState {
    pub resolution_service: Arc<ResolutionService<PgUrlRepository>>,
    pub cache: Arc<dyn CacheService>,
    pub access_sender: mpsc::Sender<AccessEvent>,
    /// Externally visible base URL used to build `shortUrl`, with a trailing slash.
    pub base_url: String,
}

impl AppState {
    /// Creates the state, normalizing `base_url` to end with a slash.
    pub fn new(
        resolution_service: Arc<ResolutionService<PgUrlRepository>>,
        cache: Arc<dyn CacheService>,
        access_sender: mpsc::Sender<AccessEvent>,
        base_url: impl Into<String>,
    ) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        Self {
            resolution_service,
            cache,
            access_sender,
            base_url,
        }
    }

    /// Builds the public redirect URL for a code (`<base>r/<code>`).
    pub fn short_url(&self, short_code: &str) -> String {
        format!("{}r/{}", self.base_url, short_code)
    }
}
