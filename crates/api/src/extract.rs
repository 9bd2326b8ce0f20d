use axum::{
    extract::{FromRequest, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use quire_core::auth::Identity;

use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated caller, resolved from the `Authorization: Bearer` header.
/// Handlers that take a `Caller` reject anonymous requests with 401 before
/// any store access happens.
#[derive(Debug, Clone)]
pub struct Caller(pub Identity);

impl FromRequestParts<AppState> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .map(|v| v.to_str().unwrap_or_default());

        let identity = state.gate().authorize(header)?;
        Ok(Caller(identity))
    }
}

/// JSON request body whose rejections (bad syntax, wrong field types, missing
/// content type) render as a `badRequest` error body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);
