//! Router assembly for the Grind Stories HTTP API.
//!
//! [`build_router`] wires all handler functions to their routes with
//! CORS and tracing middleware layers.

use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Builds the complete axum router with all API routes.
///
/// Routes use axum 0.8 `/{param}` path syntax. Public routes serve readers;
/// every other route checks the admin gate inside its handler.
/// TraceLayer provides request-level logging via tracing.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Public reading
        .route("/articles", get(handlers::articles::list_articles))
        .route(
            "/articles/{id}",
            get(handlers::articles::get_article).delete(handlers::articles::delete_article),
        )
        // Subscribers
        .route(
            "/subscribers",
            get(handlers::subscribers::list_subscribers).post(handlers::subscribers::subscribe),
        )
        .route(
            "/subscribers/export.csv",
            get(handlers::subscribers::export_subscribers),
        )
        .route(
            "/subscribers/{id}",
            delete(handlers::subscribers::delete_subscriber),
        )
        // Admin gate
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/auth/status", get(handlers::auth::status))
        .route("/dashboard", get(handlers::dashboard::dashboard))
        // Editor sessions
        .route("/sessions", post(handlers::sessions::open_session))
        .route(
            "/sessions/{id}",
            get(handlers::sessions::get_session).delete(handlers::sessions::close_session),
        )
        .route(
            "/sessions/{id}/commands",
            post(handlers::sessions::apply_commands),
        )
        .route("/sessions/{id}/save", post(handlers::sessions::save_session))
        .route(
            "/sessions/{id}/blocks/{block_id}/generate",
            post(handlers::sessions::generate_into_block),
        )
        // Text generation
        .route("/generate", post(handlers::generate::generate))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
