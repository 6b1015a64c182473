//! Cross-origin resource sharing middleware.

use axum::http::{Method, header};
use tower_http::cors::{Any, CorsLayer};

/// Creates the CORS layer applied to every route.
///
/// Any origin may call the API with `GET`, `POST`, `PUT`, `DELETE` and
/// `OPTIONS`, sending `Content-Type` and `Authorization` headers. Preflight
/// requests are answered by the layer without reaching a handler.
pub fn layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}
