//! Handler for statistics of every short URL.

use axum::{Json, extract::State};

use crate::api::dto::url::UrlStatsResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Lists every record with its access count, newest first.
///
/// # Endpoint
///
/// `GET /shorten/stats`
///
/// Always reads the store; there is no cached form of the full collection.
///
/// # Errors
///
/// Returns 500 Internal Server Error if the store cannot be read.
pub async fn stats_list_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<UrlStatsResponse>>, AppError> {
    let records = state.resolution_service.list_all_with_stats().await?;

    let items = records
        .into_iter()
        .map(|record| {
            let short_url = state.short_url(&record.short_code);
            UrlStatsResponse::from_record(record, short_url)
        })
        .collect();

    Ok(Json(items))
}
