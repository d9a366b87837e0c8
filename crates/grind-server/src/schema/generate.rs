//! Text generation request/response types.

use grind_core::Article;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub prompt: String,
}

/// Generated copy, or one of the fixed error messages.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateResponse {
    pub text: String,
}

/// Result of generating into a session's text block.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateBlockResponse {
    pub text: String,
    /// The session's working copy after the block was updated.
    pub article: Article,
}
