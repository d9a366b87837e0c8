//! Editor session request/response types.

use grind_core::{Article, ArticleId, EditCommand, EditOutcome, EditorSession};
use grind_storage::SaveOutcome;
use serde::{Deserialize, Serialize};

/// Request to open an editor session.
///
/// Without `articleId` a blank draft is started; with one, the persisted
/// article is opened (or its open session resumed).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenSessionRequest {
    #[serde(default)]
    pub article_id: Option<ArticleId>,
}

/// An editor session as returned by the API.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub article_id: ArticleId,
    /// `true` for drafts that have never been saved.
    pub is_new: bool,
    pub article: Article,
}

impl From<EditorSession> for SessionView {
    fn from(session: EditorSession) -> Self {
        SessionView {
            article_id: session.article().id.clone(),
            is_new: session.is_new(),
            article: session.finalize(),
        }
    }
}

/// A batch of edit commands applied in order.
#[derive(Debug, Clone, Deserialize)]
pub struct CommandsRequest {
    pub commands: Vec<EditCommand>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommandsResponse {
    /// One outcome per command, in request order.
    pub outcomes: Vec<EditOutcome>,
    pub article: Article,
}

/// Response from saving a session.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveSessionResponse {
    pub outcome: SaveOutcome,
    /// The article as persisted.
    pub article: Article,
    /// `false` when the session was edited while saving and is still open.
    pub session_closed: bool,
}
