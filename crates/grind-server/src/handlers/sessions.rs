//! Editor session handlers.
//!
//! Sessions are addressed by the id of the article they edit. A session is
//! removed once it is saved successfully or closed explicitly; a failed save
//! keeps it open so no edits are lost, and so does a save that raced with a
//! later edit.

use axum::extract::{Path, State};
use axum::Json;

use grind_core::{ArticleId, BlockId, BlockPatch, ContentBlock};

use crate::auth;
use crate::error::ApiError;
use crate::handlers::generate::required_prompt;
use crate::schema::generate::{GenerateBlockResponse, GenerateRequest};
use crate::schema::sessions::{
    CommandsRequest, CommandsResponse, OpenSessionRequest, SaveSessionResponse, SessionView,
};
use crate::state::AppState;

fn session_not_found(id: &ArticleId) -> ApiError {
    ApiError::NotFound(format!("no editor session for article {}", id))
}

/// Starts a draft, opens a persisted article, or resumes an open session.
///
/// `POST /sessions`
pub async fn open_session(
    State(state): State<AppState>,
    Json(req): Json<OpenSessionRequest>,
) -> Result<Json<SessionView>, ApiError> {
    auth::require_admin(&state).await?;

    let session = match req.article_id {
        None => state.sessions.open_draft(&state.config.default_author),
        Some(id) => match state.sessions.get(&id) {
            Some(session) => session,
            None => {
                let article = state.service.lock().await.get_article(&id)?;
                state.sessions.open_existing(article)
            }
        },
    };
    Ok(Json(SessionView::from(session)))
}

/// `GET /sessions/{id}`
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, ApiError> {
    auth::require_admin(&state).await?;
    let id = ArticleId(id);
    let session = state
        .sessions
        .get(&id)
        .ok_or_else(|| session_not_found(&id))?;
    Ok(Json(SessionView::from(session)))
}

/// Discards a session without saving.
///
/// `DELETE /sessions/{id}`
pub async fn close_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    auth::require_admin(&state).await?;
    let id = ArticleId(id);
    if !state.sessions.close(&id) {
        return Err(session_not_found(&id));
    }
    Ok(Json(serde_json::json!({ "success": true })))
}

/// Applies a batch of edit commands to the working copy.
///
/// `POST /sessions/{id}/commands`
pub async fn apply_commands(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<CommandsRequest>,
) -> Result<Json<CommandsResponse>, ApiError> {
    auth::require_admin(&state).await?;
    let id = ArticleId(id);
    let (outcomes, article) = state
        .sessions
        .apply(&id, req.commands)
        .ok_or_else(|| session_not_found(&id))?;
    Ok(Json(CommandsResponse { outcomes, article }))
}

/// Persists the working copy and closes the session.
///
/// The session stays open when edits arrived after the copy was taken;
/// `sessionClosed` tells the client whether another save is needed.
///
/// `POST /sessions/{id}/save`
pub async fn save_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SaveSessionResponse>, ApiError> {
    auth::require_admin(&state).await?;
    let id = ArticleId(id);

    let mut service = state.service.lock().await;
    let article = state
        .sessions
        .get(&id)
        .ok_or_else(|| session_not_found(&id))?
        .finalize();
    let outcome = service.save_article(&article)?;
    drop(service);

    let session_closed = state.sessions.close_if_unchanged(&id, &article);
    if !session_closed {
        tracing::debug!(article_id = %id, "session edited during save; kept open");
    }
    Ok(Json(SaveSessionResponse {
        outcome,
        article,
        session_closed,
    }))
}

/// Generates copy and writes it into a text block of the session.
///
/// `POST /sessions/{id}/blocks/{block_id}/generate`
pub async fn generate_into_block(
    State(state): State<AppState>,
    Path((id, block_id)): Path<(String, String)>,
    Json(req): Json<GenerateRequest>,
) -> Result<Json<GenerateBlockResponse>, ApiError> {
    auth::require_admin(&state).await?;
    let prompt = required_prompt(&req.prompt)?;
    let id = ArticleId(id);
    let block_id = BlockId(block_id);

    let session = state
        .sessions
        .get(&id)
        .ok_or_else(|| session_not_found(&id))?;
    match session.article().block(&block_id) {
        Some(ContentBlock::Text { .. }) => {}
        Some(other) => {
            return Err(ApiError::BadRequest(format!(
                "block {} is a {} block; only text blocks take generated copy",
                block_id,
                other.block_type()
            )))
        }
        None => {
            return Err(ApiError::NotFound(format!(
                "block {} not found in article {}",
                block_id, id
            )))
        }
    }

    let text = state.text_gen.generate(prompt).await;

    // The session may have been closed while the provider was answering.
    let (_, article) = state
        .sessions
        .update_block(&id, &block_id, &BlockPatch::content(text.clone()))
        .ok_or_else(|| session_not_found(&id))?;
    Ok(Json(GenerateBlockResponse { text, article }))
}
