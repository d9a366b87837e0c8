//! In-memory implementation of [`ContentStore`].
//!
//! [`InMemoryStore`] is a first-class backend for tests and ephemeral
//! sessions. It stores rows in HashMaps with the same semantics as the SQLite
//! backend: every article-level write is validated up front and then applied
//! in one step, so a rejected write leaves no partial state.

use std::collections::HashMap;

use grind_core::{normalize_email, Article, ArticleId, Subscriber, SubscriberId};

use crate::convert::{article_to_row, serialize_blocks};
use crate::error::StorageError;
use crate::traits::{check_block_ids, clean_name, ContentStore};
use crate::types::{now_timestamp, ArticleRow, BlockRow, SaveOutcome};

/// An article row plus its insertion sequence (breaks `created_at` ties).
#[derive(Debug, Clone)]
struct StoredArticle {
    row: ArticleRow,
    seq: u64,
}

/// HashMap-backed [`ContentStore`].
#[derive(Debug, Clone)]
pub struct InMemoryStore {
    articles: HashMap<ArticleId, StoredArticle>,
    /// Block rows per article, kept in `block_order`.
    blocks: HashMap<ArticleId, Vec<BlockRow>>,
    subscribers: Vec<Subscriber>,
    next_seq: u64,
    next_subscriber_id: i64,
    admin_flag: bool,
}

impl InMemoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        InMemoryStore {
            articles: HashMap::new(),
            blocks: HashMap::new(),
            subscribers: Vec::new(),
            next_seq: 0,
            next_subscriber_id: 1,
            admin_flag: false,
        }
    }

    fn put_blocks(&mut self, article: &Article) {
        let rows = serialize_blocks(&article.id, &article.content);
        if rows.is_empty() {
            self.blocks.remove(&article.id);
        } else {
            self.blocks.insert(article.id.clone(), rows);
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentStore for InMemoryStore {
    fn article_exists(&self, id: &ArticleId) -> Result<bool, StorageError> {
        Ok(self.articles.contains_key(id))
    }

    fn list_article_rows(&self) -> Result<Vec<ArticleRow>, StorageError> {
        let mut stored: Vec<&StoredArticle> = self.articles.values().collect();
        stored.sort_by(|a, b| {
            b.row
                .created_at
                .cmp(&a.row.created_at)
                .then(b.seq.cmp(&a.seq))
        });
        Ok(stored.into_iter().map(|s| s.row.clone()).collect())
    }

    fn list_block_rows(&self) -> Result<Vec<BlockRow>, StorageError> {
        Ok(self.blocks.values().flatten().cloned().collect())
    }

    fn article_rows(
        &self,
        id: &ArticleId,
    ) -> Result<Option<(ArticleRow, Vec<BlockRow>)>, StorageError> {
        Ok(self.articles.get(id).map(|stored| {
            let blocks = self.blocks.get(id).cloned().unwrap_or_default();
            (stored.row.clone(), blocks)
        }))
    }

    fn insert_article(&mut self, article: &Article) -> Result<(), StorageError> {
        check_block_ids(article)?;
        if self.articles.contains_key(&article.id) {
            return Err(StorageError::ArticleExists(article.id.to_string()));
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.articles.insert(
            article.id.clone(),
            StoredArticle {
                row: article_to_row(article, now_timestamp()),
                seq,
            },
        );
        self.put_blocks(article);
        Ok(())
    }

    fn replace_article(&mut self, article: &Article) -> Result<(), StorageError> {
        check_block_ids(article)?;
        let stored = self
            .articles
            .get_mut(&article.id)
            .ok_or_else(|| StorageError::ArticleNotFound(article.id.to_string()))?;
        let created_at = std::mem::take(&mut stored.row.created_at);
        stored.row = article_to_row(article, created_at);
        self.put_blocks(article);
        Ok(())
    }

    fn save_article(&mut self, article: &Article) -> Result<SaveOutcome, StorageError> {
        if self.articles.contains_key(&article.id) {
            self.replace_article(article)?;
            Ok(SaveOutcome::Updated)
        } else {
            self.insert_article(article)?;
            Ok(SaveOutcome::Inserted)
        }
    }

    fn delete_article(&mut self, id: &ArticleId) -> Result<(), StorageError> {
        self.articles
            .remove(id)
            .ok_or_else(|| StorageError::ArticleNotFound(id.to_string()))?;
        self.blocks.remove(id);
        Ok(())
    }

    fn list_subscribers(&self) -> Result<Vec<Subscriber>, StorageError> {
        let mut subscribers = self.subscribers.clone();
        subscribers.sort_by(|a, b| {
            b.subscribed_at
                .cmp(&a.subscribed_at)
                .then(b.id.0.cmp(&a.id.0))
        });
        Ok(subscribers)
    }

    fn upsert_subscriber(
        &mut self,
        email: &str,
        name: Option<&str>,
    ) -> Result<Subscriber, StorageError> {
        let email = normalize_email(email);
        let name = clean_name(name);
        if let Some(existing) = self.subscribers.iter_mut().find(|s| s.email == email) {
            if name.is_some() {
                existing.name = name;
            }
            return Ok(existing.clone());
        }
        let subscriber = Subscriber {
            id: SubscriberId(self.next_subscriber_id),
            name,
            email,
            subscribed_at: now_timestamp(),
        };
        self.next_subscriber_id += 1;
        self.subscribers.push(subscriber.clone());
        Ok(subscriber)
    }

    fn delete_subscriber(&mut self, id: SubscriberId) -> Result<(), StorageError> {
        let before = self.subscribers.len();
        self.subscribers.retain(|s| s.id != id);
        if self.subscribers.len() == before {
            return Err(StorageError::SubscriberNotFound(id.0));
        }
        Ok(())
    }

    fn admin_flag(&self) -> Result<bool, StorageError> {
        Ok(self.admin_flag)
    }

    fn set_admin_flag(&mut self, enabled: bool) -> Result<(), StorageError> {
        self.admin_flag = enabled;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grind_core::{BlockId, ContentBlock};

    fn article(id: &str, blocks: &[(&str, &str)]) -> Article {
        let mut article = Article::new(ArticleId::from(id));
        article.title = format!("Title of {}", id);
        article.content = blocks
            .iter()
            .map(|(bid, html)| ContentBlock::Text {
                id: BlockId::from(*bid),
                content: html.to_string(),
            })
            .collect();
        article
    }

    #[test]
    fn insert_then_load() {
        let mut store = InMemoryStore::new();
        let a = article("a", &[("1", "<p>one</p>"), ("2", "<p>two</p>")]);
        store.insert_article(&a).unwrap();
        assert_eq!(store.load_article(&a.id).unwrap(), a);
        assert!(store.article_exists(&a.id).unwrap());
    }

    #[test]
    fn insert_without_blocks_writes_no_block_rows() {
        let mut store = InMemoryStore::new();
        store.insert_article(&article("empty", &[])).unwrap();
        assert!(store.list_block_rows().unwrap().is_empty());
        assert!(store.load_article(&ArticleId::from("empty")).unwrap().content.is_empty());
    }

    #[test]
    fn insert_twice_conflicts() {
        let mut store = InMemoryStore::new();
        store.insert_article(&article("a", &[])).unwrap();
        let err = store.insert_article(&article("a", &[])).unwrap_err();
        assert!(matches!(err, StorageError::ArticleExists(_)));
    }

    #[test]
    fn save_replaces_block_set_exactly() {
        let mut store = InMemoryStore::new();
        let original = article("a", &[("1", "x"), ("2", "y"), ("3", "z")]);
        assert_eq!(store.save_article(&original).unwrap(), SaveOutcome::Inserted);

        let edited = article("a", &[("3", "z2"), ("4", "new")]);
        assert_eq!(store.save_article(&edited).unwrap(), SaveOutcome::Updated);

        let rows = store.list_block_rows().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(store.load_article(&edited.id).unwrap(), edited);
    }

    #[test]
    fn replace_keeps_created_at() {
        let mut store = InMemoryStore::new();
        store.insert_article(&article("a", &[])).unwrap();
        let created = store.list_article_rows().unwrap()[0].created_at.clone();

        let mut edited = article("a", &[]);
        edited.title = "Renamed".into();
        store.replace_article(&edited).unwrap();

        let row = &store.list_article_rows().unwrap()[0];
        assert_eq!(row.created_at, created);
        assert_eq!(row.title, "Renamed");
    }

    #[test]
    fn replace_missing_article_fails() {
        let mut store = InMemoryStore::new();
        let err = store.replace_article(&article("ghost", &[])).unwrap_err();
        assert!(matches!(err, StorageError::ArticleNotFound(_)));
    }

    #[test]
    fn duplicate_block_ids_leave_state_untouched() {
        let mut store = InMemoryStore::new();
        let original = article("a", &[("1", "keep")]);
        store.insert_article(&original).unwrap();

        let bad = article("a", &[("9", "x"), ("9", "y")]);
        let err = store.save_article(&bad).unwrap_err();
        assert!(matches!(err, StorageError::IntegrityError { .. }));
        assert_eq!(store.load_article(&original.id).unwrap(), original);
    }

    #[test]
    fn listing_is_newest_first() {
        let mut store = InMemoryStore::new();
        for id in ["first", "second", "third"] {
            store.insert_article(&article(id, &[])).unwrap();
        }
        let ids: Vec<String> = store
            .load_articles()
            .unwrap()
            .into_iter()
            .map(|a| a.id.0)
            .collect();
        assert_eq!(ids, ["third", "second", "first"]);
    }

    #[test]
    fn delete_removes_blocks() {
        let mut store = InMemoryStore::new();
        store.insert_article(&article("a", &[("1", "x")])).unwrap();
        store.insert_article(&article("b", &[("1", "y")])).unwrap();
        store.delete_article(&ArticleId::from("a")).unwrap();

        let rows = store.list_block_rows().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].article_id, ArticleId::from("b"));
        assert!(matches!(
            store.delete_article(&ArticleId::from("a")),
            Err(StorageError::ArticleNotFound(_))
        ));
    }

    #[test]
    fn subscriber_upsert_is_keyed_on_email() {
        let mut store = InMemoryStore::new();
        let first = store.upsert_subscriber("reader@example.com", None).unwrap();
        let again = store
            .upsert_subscriber(" Reader@Example.com ", Some("Ada"))
            .unwrap();
        assert_eq!(first.id, again.id);
        assert_eq!(again.name.as_deref(), Some("Ada"));
        assert_eq!(again.subscribed_at, first.subscribed_at);

        let keep_name = store.upsert_subscriber("reader@example.com", None).unwrap();
        assert_eq!(keep_name.name.as_deref(), Some("Ada"));
        assert_eq!(store.list_subscribers().unwrap().len(), 1);
    }

    #[test]
    fn delete_subscriber() {
        let mut store = InMemoryStore::new();
        let s = store.upsert_subscriber("a@example.com", None).unwrap();
        store.delete_subscriber(s.id).unwrap();
        assert!(store.list_subscribers().unwrap().is_empty());
        assert!(matches!(
            store.delete_subscriber(s.id),
            Err(StorageError::SubscriberNotFound(_))
        ));
    }

    #[test]
    fn admin_flag_round_trip() {
        let mut store = InMemoryStore::new();
        assert!(!store.admin_flag().unwrap());
        store.set_admin_flag(true).unwrap();
        assert!(store.admin_flag().unwrap());
        store.set_admin_flag(false).unwrap();
        assert!(!store.admin_flag().unwrap());
    }
}
