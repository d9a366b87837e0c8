//! Admin gate.
//!
//! A single persisted flag decides whether the admin routes answer. Logging
//! in with the configured credentials sets it; logging out clears it. The
//! flag survives restarts because it lives in the store's `settings` table.
//! This is a convenience gate for a single operator, not access control.

use crate::config::ServerConfig;
use crate::error::ApiError;
use crate::state::AppState;

pub const INVALID_CREDENTIALS: &str = "Invalid credentials.";

/// Compares a login attempt against the configured credentials.
///
/// The email comparison ignores case and surrounding whitespace.
pub fn credentials_match(config: &ServerConfig, email: &str, password: &str) -> bool {
    email.trim().eq_ignore_ascii_case(config.admin_email.trim()) && password == config.admin_password
}

/// Opens the gate if the credentials match.
pub async fn login(state: &AppState, email: &str, password: &str) -> Result<(), ApiError> {
    if !credentials_match(&state.config, email, password) {
        tracing::warn!("rejected admin login attempt");
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }
    let mut service = state.service.lock().await;
    service.set_admin(true)?;
    tracing::info!("admin logged in");
    Ok(())
}

pub async fn logout(state: &AppState) -> Result<(), ApiError> {
    let mut service = state.service.lock().await;
    service.set_admin(false)?;
    tracing::info!("admin logged out");
    Ok(())
}

pub async fn is_authenticated(state: &AppState) -> Result<bool, ApiError> {
    let service = state.service.lock().await;
    service.is_admin()
}

/// Fails with 401 unless the gate is open.
pub async fn require_admin(state: &AppState) -> Result<(), ApiError> {
    if is_authenticated(state).await? {
        Ok(())
    } else {
        Err(ApiError::Unauthorized("admin login required".to_string()))
    }
}
