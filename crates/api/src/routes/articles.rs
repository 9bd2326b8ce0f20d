use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use quire_core::content::{Article, ArticlePatch, NewArticle};
use serde_json::{json, Value};

use crate::error::ApiResult;
use crate::extract::{ApiJson, Caller};
use crate::state::AppState;

/// Article routes. Reads are public; writes need a bearer token.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/articles", get(list_articles).post(create_article))
        .route(
            "/api/articles/{id}",
            get(get_article).put(update_article).delete(delete_article),
        )
}

async fn list_articles(State(state): State<AppState>) -> ApiResult<Json<Vec<Article>>> {
    Ok(Json(state.content().list_articles().await?))
}

async fn get_article(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Article>> {
    Ok(Json(state.content().get_article(&id).await?))
}

async fn create_article(
    State(state): State<AppState>,
    Caller(caller): Caller,
    ApiJson(input): ApiJson<NewArticle>,
) -> ApiResult<(StatusCode, Json<Article>)> {
    let article = state.content().create_article(&caller, input).await?;
    Ok((StatusCode::CREATED, Json(article)))
}

async fn update_article(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<ArticlePatch>,
) -> ApiResult<Json<Article>> {
    Ok(Json(state.content().update_article(&caller, &id, patch).await?))
}

async fn delete_article(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let removed = state.content().delete_article(&caller, &id).await?;
    Ok(Json(json!({ "success": true, "removedComments": removed })))
}
