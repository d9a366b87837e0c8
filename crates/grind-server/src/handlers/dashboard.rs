//! Admin dashboard handler.

use axum::extract::State;
use axum::Json;

use crate::auth;
use crate::error::ApiError;
use crate::schema::dashboard::{ArticleSummaryView, DashboardResponse};
use crate::state::AppState;

/// Article summaries, subscribers and editor status in one payload.
///
/// `GET /dashboard`
pub async fn dashboard(
    State(state): State<AppState>,
) -> Result<Json<DashboardResponse>, ApiError> {
    auth::require_admin(&state).await?;
    let service = state.service.lock().await;
    let articles: Vec<ArticleSummaryView> =
        service.articles().iter().map(ArticleSummaryView::from).collect();
    Ok(Json(DashboardResponse {
        article_count: articles.len(),
        subscriber_count: service.subscribers().len(),
        articles,
        subscribers: service.subscribers().to_vec(),
        open_sessions: state.sessions.len(),
        text_generation_enabled: state.text_gen.is_configured(),
    }))
}
