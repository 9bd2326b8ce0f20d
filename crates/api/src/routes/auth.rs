use axum::{extract::State, http::StatusCode, routing::{get, post}, Json, Router};
use quire_core::auth::accounts::{AccountProfile, NewAccount};
use quire_core::auth::{Identity, IssuedToken};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::extract::{ApiJson, Caller};
use crate::state::AppState;

/// Admin provisioning and token issuance.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/setup", post(setup))
        .route("/api/auth/login", post(login))
        .route("/api/auth/me", get(me))
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginResponse {
    #[serde(flatten)]
    token: IssuedToken,
    account: AccountProfile,
}

/// Create the first admin account. Closed once any account exists.
async fn setup(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NewAccount>,
) -> ApiResult<(StatusCode, Json<AccountProfile>)> {
    let account = state.accounts().setup(input).await?;
    Ok((StatusCode::CREATED, Json(account.profile())))
}

async fn login(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let account = state.accounts().login(&input.email, &input.password).await?;
    let token = state
        .tokens()
        .issue(&account)
        .map_err(|e| ApiError::Internal(format!("token signing failed: {e}")))?;

    tracing::info!(account_id = %account.id, "login succeeded");
    Ok(Json(LoginResponse {
        token,
        account: account.profile(),
    }))
}

async fn me(Caller(caller): Caller) -> Json<Identity> {
    Json(caller)
}
