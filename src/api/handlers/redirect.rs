//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect},
};
use tokio::sync::mpsc::error::TrySendError;
use tracing::warn;

use crate::domain::access_event::AccessEvent;
use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /r/{code}`
///
/// # Request Flow
///
/// 1. Resolve the code (cache first, then the store)
/// 2. Queue an access event for the background worker
/// 3. Return 307 Temporary Redirect
///
/// # Access Tracking
///
/// Access events go to a bounded channel for async processing.
/// If the queue is full or closed the event is dropped (fire-and-forget);
/// the redirect never waits on or fails because of the counter.
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let record = state.resolution_service.get(&code).await?;

    match state.access_sender.try_send(AccessEvent::new(code)) {
        Ok(()) => {}
        Err(TrySendError::Full(event)) => {
            warn!(short_code = %event.code, "Access queue full, dropping access event");
        }
        Err(TrySendError::Closed(event)) => {
            warn!(short_code = %event.code, "Access queue closed, dropping access event");
        }
    }

    Ok(Redirect::temporary(&record.redirect_target()))
}
