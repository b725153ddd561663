pub mod catalog;
pub mod config;
pub mod handlers;
pub mod session;
pub mod state;
pub mod utils;

use anyhow::{Context, Result};
use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use state::AppState;

/// Build the application router over shared state.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/feed", get(handlers::feed::feed_handler))
        .route("/session/start", post(handlers::session::start_handler))
        .route("/session/ping", post(handlers::session::ping_handler))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        // A panicking handler becomes a 500, never a dead process.
        .layer(CatchPanicLayer::new())
}

/// CORS policy from the configured origin.
///
/// `*` reflects the request origin (the wildcard itself cannot be combined
/// with credentials); anything else is an exact origin. Credentials are
/// allowed either way.
pub fn cors_layer(allowed_origin: &str) -> Result<CorsLayer> {
    let origin = if allowed_origin == "*" {
        AllowOrigin::mirror_request()
    } else {
        AllowOrigin::exact(
            allowed_origin
                .parse::<HeaderValue>()
                .with_context(|| format!("invalid CORS origin: {allowed_origin}"))?,
        )
    };

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true))
}
