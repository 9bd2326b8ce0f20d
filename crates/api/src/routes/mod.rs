pub mod articles;
pub mod auth;
pub mod comments;
pub mod events;
pub mod health;

use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;

use crate::middleware;
use crate::state::AppState;

/// Assemble the full router with all route groups.
pub fn build_router(state: AppState) -> Router {
    let body_limit = RequestBodyLimitLayer::new(state.config().max_body_bytes);

    Router::new()
        .merge(health::routes())
        .merge(articles::routes())
        .merge(comments::routes())
        .merge(auth::routes())
        .merge(events::routes())
        .layer(body_limit)
        .with_state(state)
}

/// Router wrapped in the request tracing and CORS layers, as served by the binary.
/// Each layer is applied to the router separately so the response body is
/// converted back to `axum::body::Body` between them.
pub fn build_app(state: AppState) -> Router {
    build_router(state)
        .layer(middleware::request_tracing::trace_layer())
        .layer(middleware::cors::cors_layer())
}
