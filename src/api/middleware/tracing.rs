//! HTTP request/response tracing middleware.

use tower_http::LatencyUnit;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Creates a tracing middleware for HTTP requests.
///
/// # Logging Behavior
///
/// **On Request:**
/// - Creates a span at `INFO` level with:
///   - HTTP method
///   - URI path
///   - HTTP version
///
/// **On Response:**
/// - Logs at `INFO` level with:
///   - Status code
///   - Latency in milliseconds
///
/// Redirects are logged like any other route, so `/r/{code}` latency shows
/// up here. Access counting happens after the response in the worker and is
/// not part of the reported latency.
///
/// # Example Logs
///
/// ```text
/// INFO request{method=POST uri=/shorten version=HTTP/1.1}: finished processing request latency=12 ms status=201
/// INFO request{method=GET uri=/r/aB3xYz version=HTTP/1.1}: finished processing request latency=1 ms status=307
/// INFO request{method=GET uri=/shorten/aB3xYz/stats version=HTTP/1.1}: finished processing request latency=3 ms status=200
/// INFO request{method=DELETE uri=/shorten/zzzzzz version=HTTP/1.1}: finished processing request latency=2 ms status=404
/// ```
///
/// # Integration
///
/// Applied in [`crate::routes::app_router`] outside the CORS layer, so
/// preflight `OPTIONS` requests are traced too:
///
/// ```rust,ignore
/// let app = Router::new()
///     .route("/r/{code}", get(redirect_handler))
///     .merge(api_routes())
///     .with_state(state)
///     .layer(cors::layer())
///     .layer(tracing::layer());
/// ```
pub fn layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>> {
    TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        )
}
