use axum::http::{header, Method};
use tower_http::cors::{Any, CorsLayer};

/// Browsers on any origin may read content and send bearer-authenticated writes.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}
