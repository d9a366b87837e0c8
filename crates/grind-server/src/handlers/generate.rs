//! Free-standing text generation handler.

use axum::extract::State;
use axum::Json;

use crate::auth;
use crate::error::ApiError;
use crate::schema::generate::{GenerateRequest, GenerateResponse};
use crate::state::AppState;

/// Generates copy in the house style.
///
/// `POST /generate`
pub async fn generate(
    State(state): State<AppState>,
    Json(req): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, ApiError> {
    auth::require_admin(&state).await?;
    let prompt = required_prompt(&req.prompt)?;
    let text = state.text_gen.generate(prompt).await;
    Ok(Json(GenerateResponse { text }))
}

/// Rejects an empty prompt.
pub(crate) fn required_prompt(prompt: &str) -> Result<&str, ApiError> {
    let prompt = prompt.trim();
    if prompt.is_empty() {
        return Err(ApiError::BadRequest("prompt is required".to_string()));
    }
    Ok(prompt)
}
