//! API route configuration.

use crate::api::handlers::{
    delete_url_handler, get_url_handler, shorten_handler, stats_handler, stats_list_handler,
    update_url_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Short URL management routes.
///
/// # Endpoints
///
/// - `POST   /shorten`              - Create a short URL
/// - `GET    /shorten/stats`        - Every short URL with its access count
/// - `GET    /shorten/{code}`       - Fetch a short URL
/// - `PUT    /shorten/{code}`       - Replace the target URL
/// - `DELETE /shorten/{code}`       - Delete a short URL
/// - `GET    /shorten/{code}/stats` - A short URL with its access count
///
/// The static `/shorten/stats` segment takes precedence over `{code}`.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/shorten", post(shorten_handler))
        .route("/shorten/stats", get(stats_list_handler))
        .route(
            "/shorten/{code}",
            get(get_url_handler)
                .put(update_url_handler)
                .delete(delete_url_handler),
        )
        .route("/shorten/{code}/stats", get(stats_handler))
}
