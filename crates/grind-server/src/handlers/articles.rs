//! Article handlers (list, get, delete).

use axum::extract::{Path, State};
use axum::Json;

use grind_core::{Article, ArticleId};

use crate::auth;
use crate::error::ApiError;
use crate::schema::articles::ArticleListResponse;
use crate::state::AppState;

/// Lists all articles, most recent first.
///
/// `GET /articles`
pub async fn list_articles(
    State(state): State<AppState>,
) -> Result<Json<ArticleListResponse>, ApiError> {
    let service = state.service.lock().await;
    Ok(Json(ArticleListResponse {
        articles: service.articles().to_vec(),
    }))
}

/// Returns one article with its blocks.
///
/// `GET /articles/{id}`
pub async fn get_article(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Article>, ApiError> {
    let service = state.service.lock().await;
    let article = service.get_article(&ArticleId(id))?;
    Ok(Json(article))
}

/// Deletes an article and closes any editor session open on it.
///
/// `DELETE /articles/{id}`
pub async fn delete_article(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    auth::require_admin(&state).await?;
    let id = ArticleId(id);
    let mut service = state.service.lock().await;
    service.delete_article(&id)?;
    state.sessions.close(&id);
    Ok(Json(serde_json::json!({ "success": true })))
}
