use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use quire_core::content::{Comment, NewComment};
use serde_json::{json, Value};

use crate::error::ApiResult;
use crate::extract::{ApiJson, Caller};
use crate::state::AppState;

/// Comment routes. Anyone may comment; only an authenticated caller may delete.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/articles/{id}/comments",
            get(list_comments).post(create_comment),
        )
        .route(
            "/api/articles/{id}/comments/{comment_id}",
            delete(delete_comment),
        )
}

async fn list_comments(
    State(state): State<AppState>,
    Path(article_id): Path<String>,
) -> ApiResult<Json<Vec<Comment>>> {
    Ok(Json(state.content().list_comments(&article_id).await?))
}

async fn create_comment(
    State(state): State<AppState>,
    Path(article_id): Path<String>,
    ApiJson(input): ApiJson<NewComment>,
) -> ApiResult<(StatusCode, Json<Comment>)> {
    let comment = state.content().create_comment(&article_id, input).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

async fn delete_comment(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path((article_id, comment_id)): Path<(String, String)>,
) -> ApiResult<Json<Value>> {
    state
        .content()
        .delete_comment(&caller, &article_id, &comment_id)
        .await?;
    Ok(Json(json!({ "success": true })))
}
