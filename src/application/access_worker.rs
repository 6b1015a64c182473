//! Background worker that applies access count increments.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Semaphore, mpsc};
use tokio_retry::RetryIf;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, info, warn};

use crate::application::services::{ResolutionError, ResolutionService};
use crate::domain::access_event::AccessEvent;
use crate::domain::repositories::UrlRepository;

/// Retries applied to a transient store failure.
const MAX_RETRIES: usize = 3;

/// Consumes access events until the channel closes.
///
/// Runs up to `concurrency` increments at once. Transient store failures are
/// retried with exponential backoff; anything else is logged and dropped.
/// Once every sender is gone the worker waits for in-flight increments
/// before returning.
pub async fn run_access_worker<R>(
    mut rx: mpsc::Receiver<AccessEvent>,
    service: Arc<ResolutionService<R>>,
    concurrency: usize,
) where
    R: UrlRepository + 'static,
{
    let concurrency = concurrency.max(1);
    let permits = Arc::new(Semaphore::new(concurrency));

    while let Some(event) = rx.recv().await {
        let Ok(permit) = permits.clone().acquire_owned().await else {
            break;
        };
        let service = service.clone();

        tokio::spawn(async move {
            apply_increment(&service, &event.code).await;
            drop(permit);
        });
    }

    // Every permit back means every spawned increment finished.
    if let Ok(all) = permits.acquire_many(concurrency as u32).await {
        drop(all);
    }

    info!("Access worker stopped");
}

async fn apply_increment<R: UrlRepository>(service: &ResolutionService<R>, code: &str) {
    let strategy = ExponentialBackoff::from_millis(10)
        .factor(5)
        .max_delay(Duration::from_secs(2))
        .map(jitter)
        .take(MAX_RETRIES);

    let result = RetryIf::spawn(
        strategy,
        move || service.increment_access(code),
        |e: &ResolutionError| e.is_transient(),
    )
    .await;

    match result {
        Ok(()) => debug!(code, "Access counted"),
        Err(ResolutionError::NotFound(_)) => {
            debug!(code, "Short code disappeared before access was counted")
        }
        Err(e) => warn!(code, error = %e, "Failed to count access"),
    }
}
