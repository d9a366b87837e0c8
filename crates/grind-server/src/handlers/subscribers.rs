//! Subscriber handlers.

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;

use grind_core::{Subscriber, SubscriberId};

use crate::auth;
use crate::error::ApiError;
use crate::export::{subscribers_csv, CSV_FILE_NAME};
use crate::schema::subscribers::{SubscribeRequest, SubscriberListResponse};
use crate::state::AppState;

/// Subscribes an email address, updating the name if it is already known.
///
/// `POST /subscribers`
pub async fn subscribe(
    State(state): State<AppState>,
    Json(req): Json<SubscribeRequest>,
) -> Result<Json<Subscriber>, ApiError> {
    let mut service = state.service.lock().await;
    let subscriber = service.add_subscriber(&req.email, req.name.as_deref())?;
    Ok(Json(subscriber))
}

/// `GET /subscribers`
pub async fn list_subscribers(
    State(state): State<AppState>,
) -> Result<Json<SubscriberListResponse>, ApiError> {
    auth::require_admin(&state).await?;
    let service = state.service.lock().await;
    Ok(Json(SubscriberListResponse {
        subscribers: service.subscribers().to_vec(),
    }))
}

/// `DELETE /subscribers/{id}`
pub async fn delete_subscriber(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    auth::require_admin(&state).await?;
    let mut service = state.service.lock().await;
    service.delete_subscriber(SubscriberId(id))?;
    Ok(Json(serde_json::json!({ "success": true })))
}

/// Downloads all subscribers as CSV.
///
/// `GET /subscribers/export.csv`
pub async fn export_subscribers(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    auth::require_admin(&state).await?;
    let service = state.service.lock().await;
    let body = subscribers_csv(service.subscribers())?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", CSV_FILE_NAME),
            ),
        ],
        body,
    ))
}
