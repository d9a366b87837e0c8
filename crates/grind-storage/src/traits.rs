//! The [`ContentStore`] trait defining the storage contract.
//!
//! Two-layer API design:
//! - **Row-level reads** (`list_article_rows`, `list_block_rows`) expose the
//!   flat relational shape.
//! - **Article-level writes** (`insert_article`, `replace_article`,
//!   `save_article`, `delete_article`) each apply the complete row set of one
//!   article atomically.
//!
//! Both backends ([`InMemoryStore`](crate::InMemoryStore) and
//! [`SqliteStore`](crate::SqliteStore)) implement this trait with identical
//! semantics.

use grind_core::{Article, ArticleId, Subscriber, SubscriberId};

use crate::convert::assemble_articles;
use crate::error::StorageError;
use crate::types::{ArticleRow, BlockRow, SaveOutcome};

/// The storage contract for articles, subscribers and the admin flag.
///
/// The trait is synchronous; the server serializes access behind an async
/// mutex.
pub trait ContentStore {
    // -------------------------------------------------------------------
    // Article reads
    // -------------------------------------------------------------------

    /// Returns `true` if an article row with `id` exists.
    fn article_exists(&self, id: &ArticleId) -> Result<bool, StorageError>;

    /// All article rows, most recently created first.
    fn list_article_rows(&self) -> Result<Vec<ArticleRow>, StorageError>;

    /// All block rows of all articles, ordered by `block_order` within each
    /// article.
    fn list_block_rows(&self) -> Result<Vec<BlockRow>, StorageError>;

    /// Rows of one article, or `None` if it does not exist.
    fn article_rows(
        &self,
        id: &ArticleId,
    ) -> Result<Option<(ArticleRow, Vec<BlockRow>)>, StorageError>;

    // -------------------------------------------------------------------
    // Article writes
    // -------------------------------------------------------------------

    /// Inserts a new article row, then its block rows (none when the block
    /// sequence is empty).
    ///
    /// Fails with [`StorageError::ArticleExists`] if the id is taken.
    fn insert_article(&mut self, article: &Article) -> Result<(), StorageError>;

    /// Updates the scalar fields of an existing article, deletes all of its
    /// block rows, and inserts the current sequence.
    ///
    /// Fails with [`StorageError::ArticleNotFound`] if the id is unknown.
    fn replace_article(&mut self, article: &Article) -> Result<(), StorageError>;

    /// Replaces the article if it exists, inserts it otherwise.
    fn save_article(&mut self, article: &Article) -> Result<SaveOutcome, StorageError>;

    /// Deletes the article row and every block row that references it.
    fn delete_article(&mut self, id: &ArticleId) -> Result<(), StorageError>;

    // -------------------------------------------------------------------
    // Subscribers
    // -------------------------------------------------------------------

    /// All subscribers, most recent first.
    fn list_subscribers(&self) -> Result<Vec<Subscriber>, StorageError>;

    /// Inserts a subscriber, or updates the existing row with the same
    /// (normalized) email. A `None` name never erases a stored one.
    fn upsert_subscriber(
        &mut self,
        email: &str,
        name: Option<&str>,
    ) -> Result<Subscriber, StorageError>;

    fn delete_subscriber(&mut self, id: SubscriberId) -> Result<(), StorageError>;

    // -------------------------------------------------------------------
    // Admin flag
    // -------------------------------------------------------------------

    fn admin_flag(&self) -> Result<bool, StorageError>;

    fn set_admin_flag(&mut self, enabled: bool) -> Result<(), StorageError>;

    // -------------------------------------------------------------------
    // Convenience reads
    // -------------------------------------------------------------------

    /// Every article with its blocks, most recently created first.
    fn load_articles(&self) -> Result<Vec<Article>, StorageError> {
        let articles = self.list_article_rows()?;
        let blocks = self.list_block_rows()?;
        Ok(assemble_articles(articles, blocks))
    }

    /// One article with its blocks.
    fn load_article(&self, id: &ArticleId) -> Result<Article, StorageError> {
        let (row, blocks) = self
            .article_rows(id)?
            .ok_or_else(|| StorageError::ArticleNotFound(id.to_string()))?;
        assemble_articles(vec![row], blocks)
            .pop()
            .ok_or_else(|| StorageError::ArticleNotFound(id.to_string()))
    }
}

/// Rejects an article whose block ids are not unique.
pub(crate) fn check_block_ids(article: &Article) -> Result<(), StorageError> {
    match article.duplicate_block_id() {
        Some(dup) => Err(StorageError::IntegrityError {
            reason: format!("duplicate block id '{}' in article {}", dup, article.id),
        }),
        None => Ok(()),
    }
}

/// Trims a subscriber name, mapping blank names to `None`.
pub(crate) fn clean_name(name: Option<&str>) -> Option<String> {
    name.map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
}
