//! Handler for per-code statistics.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::dto::url::UrlStatsResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Returns a record together with its access count.
///
/// # Endpoint
///
/// `GET /shorten/{code}/stats`
///
/// # Consistency
///
/// Reads go through the cache. Each access increment invalidates the cached
/// entry, so the count is at most one in-flight increment behind.
///
/// # Errors
///
/// Returns 404 Not Found if the code does not exist.
pub async fn stats_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<UrlStatsResponse>, AppError> {
    let record = state.resolution_service.get(&code).await?;
    let short_url = state.short_url(&record.short_code);

    Ok(Json(UrlStatsResponse::from_record(record, short_url)))
}
