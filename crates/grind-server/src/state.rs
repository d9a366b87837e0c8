//! Application state with shared `ContentService` for concurrent access.
//!
//! [`AppState`] wraps the service in `Arc<tokio::sync::Mutex<>>` for use with
//! axum handlers. Uses `tokio::sync::Mutex` (async-aware) instead of
//! `std::sync::Mutex` (blocking) so handlers await the lock without blocking
//! the tokio runtime. `rusqlite::Connection` is `!Sync`, which rules out an
//! `RwLock`; all persistence steps of one save therefore run serialized.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::error::ApiError;
use crate::service::ContentService;
use crate::sessions::EditorSessions;
use crate::text_gen::TextGenerator;

/// Shared application state for the HTTP server.
#[derive(Clone)]
pub struct AppState {
    /// The shared content service (async Mutex -- non-blocking await).
    pub service: Arc<tokio::sync::Mutex<ContentService>>,
    /// Open editor sessions, one per article.
    pub sessions: Arc<EditorSessions>,
    /// Gemini client used by the editor.
    pub text_gen: Arc<TextGenerator>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Creates a new `AppState` with a `ContentService` backed by the SQLite
    /// database at `config.db_path`.
    pub fn new(config: ServerConfig) -> Result<Self, ApiError> {
        let service = ContentService::open(&config.db_path)?;
        tracing::info!(
            db_path = %config.db_path,
            articles = service.articles().len(),
            subscribers = service.subscribers().len(),
            "content loaded"
        );
        Ok(Self::with_service(service, config))
    }

    /// Creates a new `AppState` with an in-memory store and default
    /// configuration (for testing).
    pub fn in_memory() -> Result<Self, ApiError> {
        Ok(Self::in_memory_with(ServerConfig::default()))
    }

    /// Creates a new `AppState` with an in-memory store and the given
    /// configuration.
    pub fn in_memory_with(config: ServerConfig) -> Self {
        let service = ContentService::in_memory();
        Self::with_service(service, config)
    }

    fn with_service(service: ContentService, config: ServerConfig) -> Self {
        AppState {
            service: Arc::new(tokio::sync::Mutex::new(service)),
            sessions: Arc::new(EditorSessions::new()),
            text_gen: Arc::new(TextGenerator::new(config.gemini.clone())),
            config: Arc::new(config),
        }
    }
}
