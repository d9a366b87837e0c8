//! Admin gate handlers.

use axum::extract::State;
use axum::Json;

use crate::auth;
use crate::error::ApiError;
use crate::schema::auth::{AuthStatusResponse, LoginRequest};
use crate::state::AppState;

/// `POST /auth/login`
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthStatusResponse>, ApiError> {
    auth::login(&state, &req.email, &req.password).await?;
    Ok(Json(AuthStatusResponse {
        authenticated: true,
    }))
}

/// `POST /auth/logout`
pub async fn logout(State(state): State<AppState>) -> Result<Json<AuthStatusResponse>, ApiError> {
    auth::logout(&state).await?;
    Ok(Json(AuthStatusResponse {
        authenticated: false,
    }))
}

/// `GET /auth/status`
pub async fn status(State(state): State<AppState>) -> Result<Json<AuthStatusResponse>, ApiError> {
    let authenticated = auth::is_authenticated(&state).await?;
    Ok(Json(AuthStatusResponse { authenticated }))
}
