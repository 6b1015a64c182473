//! Handlers for reading, replacing and deleting a single short URL.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::url::{UpdateUrlRequest, UrlResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Returns the record behind a short code.
///
/// # Endpoint
///
/// `GET /shorten/{code}`
///
/// # Errors
///
/// Returns 404 Not Found if the code does not exist.
pub async fn get_url_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<UrlResponse>, AppError> {
    let record = state.resolution_service.get(&code).await?;
    let short_url = state.short_url(&record.short_code);

    Ok(Json(UrlResponse::from_record(record, short_url)))
}

/// Points an existing short code at a new URL.
///
/// # Endpoint
///
/// `PUT /shorten/{code}`
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com/new" }
/// ```
///
/// # Errors
///
/// - 400 Bad Request if the body is malformed or the URL is invalid
/// - 404 Not Found if the code does not exist
pub async fn update_url_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
    payload: Result<Json<UpdateUrlRequest>, JsonRejection>,
) -> Result<Json<UrlResponse>, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let record = state.resolution_service.update(&code, &payload.url).await?;
    let short_url = state.short_url(&record.short_code);

    Ok(Json(UrlResponse::from_record(record, short_url)))
}

/// Deletes a short code.
///
/// # Endpoint
///
/// `DELETE /shorten/{code}`
///
/// # Response
///
/// `204 No Content` on success.
///
/// # Errors
///
/// Returns 404 Not Found if the code does not exist.
pub async fn delete_url_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    state.resolution_service.delete(&code).await?;

    Ok(StatusCode::NO_CONTENT)
}
