//! Registry of open editor sessions.
//!
//! [`EditorSessions`] holds at most one [`EditorSession`] per article id.
//! Opening an article that already has a session resumes it, so two browser
//! tabs never hold diverging working copies of the same article.

use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use grind_core::{
    Article, ArticleId, BlockId, BlockPatch, EditCommand, EditOutcome, EditorSession,
};

/// Open editor sessions keyed by article id.
///
/// Backed by `DashMap` for concurrent access from async handler tasks.
pub struct EditorSessions {
    sessions: DashMap<ArticleId, EditorSession>,
}

impl EditorSessions {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        EditorSessions {
            sessions: DashMap::new(),
        }
    }

    /// Starts a session on a blank draft bylined to `author`.
    pub fn open_draft(&self, author: &str) -> EditorSession {
        let session = EditorSession::draft(Article::draft(author, Utc::now()));
        self.sessions
            .insert(session.article().id.clone(), session.clone());
        tracing::debug!(article_id = %session.article().id, "draft session opened");
        session
    }

    /// Opens a session on a persisted article, or resumes the session that
    /// is already open for it.
    pub fn open_existing(&self, article: Article) -> EditorSession {
        match self.sessions.entry(article.id.clone()) {
            Entry::Occupied(entry) => entry.get().clone(),
            Entry::Vacant(entry) => {
                tracing::debug!(article_id = %article.id, "session opened");
                entry.insert(EditorSession::new(article)).clone()
            }
        }
    }

    /// Returns a clone of the session, if it exists.
    pub fn get(&self, id: &ArticleId) -> Option<EditorSession> {
        self.sessions.get(id).map(|entry| entry.clone())
    }

    pub fn contains(&self, id: &ArticleId) -> bool {
        self.sessions.contains_key(id)
    }

    /// Applies `commands` in order. Returns `None` if no session is open.
    pub fn apply(
        &self,
        id: &ArticleId,
        commands: Vec<EditCommand>,
    ) -> Option<(Vec<EditOutcome>, Article)> {
        let mut entry = self.sessions.get_mut(id)?;
        let outcomes = commands
            .into_iter()
            .map(|command| entry.apply(command))
            .collect();
        Some((outcomes, entry.article().clone()))
    }

    /// Patches one block. `None` if no session is open; `Some(false)` if
    /// the block is absent.
    pub fn update_block(
        &self,
        id: &ArticleId,
        block_id: &BlockId,
        patch: &BlockPatch,
    ) -> Option<(bool, Article)> {
        let mut entry = self.sessions.get_mut(id)?;
        let changed = entry.update_block(block_id, patch);
        Some((changed, entry.article().clone()))
    }

    /// Closes a session. Returns `true` if one was open.
    pub fn close(&self, id: &ArticleId) -> bool {
        self.sessions.remove(id).is_some()
    }

    /// Closes a session only if its working copy still equals `saved`.
    ///
    /// Edits applied after `saved` was taken keep the session open.
    pub fn close_if_unchanged(&self, id: &ArticleId, saved: &Article) -> bool {
        self.sessions
            .remove_if(id, |_, session| session.article() == saved)
            .is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl Default for EditorSessions {
    fn default() -> Self {
        Self::new()
    }
}
