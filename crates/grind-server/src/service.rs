//! ContentService: the single coordinator between HTTP handlers and the
//! storage crate.
//!
//! All business logic flows through [`ContentService`]. It keeps the article
//! and subscriber collections cached in memory, refreshes them only after a
//! write fully succeeds, and logs every persistence failure before returning
//! it to the caller.

use grind_core::{normalize_email, Article, ArticleId, Subscriber, SubscriberId};
use grind_storage::{ContentStore, InMemoryStore, SaveOutcome, SqliteStore, StorageError};

use crate::error::ApiError;

/// The storage backend the service owns. `Send` so the service can live
/// behind a `tokio::sync::Mutex`.
pub type BoxedStore = Box<dyn ContentStore + Send>;

/// Cached view of persisted content plus the write operations on it.
pub struct ContentService {
    store: BoxedStore,
    articles: Vec<Article>,
    subscribers: Vec<Subscriber>,
    loading: bool,
}

impl ContentService {
    /// Creates a service over `store` and performs the initial load.
    ///
    /// A failing initial load is logged and leaves empty collections; the
    /// next successful write or [`refresh`](Self::refresh) fills them.
    pub fn new(store: BoxedStore) -> Self {
        let mut service = ContentService {
            store,
            articles: Vec::new(),
            subscribers: Vec::new(),
            loading: true,
        };
        service.refresh();
        service
    }

    /// Opens a SQLite database at `db_path`.
    pub fn open(db_path: &str) -> Result<Self, ApiError> {
        let store = SqliteStore::new(db_path)
            .map_err(|e| ApiError::InternalError(format!("failed to open store: {}", e)))?;
        Ok(Self::new(Box::new(store)))
    }

    /// Creates a service over a fresh in-memory store (for testing).
    pub fn in_memory() -> Self {
        Self::new(Box::new(InMemoryStore::new()))
    }

    // -----------------------------------------------------------------------
    // Cached reads
    // -----------------------------------------------------------------------

    /// Articles, most recently created first.
    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    pub fn get_article(&self, id: &ArticleId) -> Result<Article, ApiError> {
        self.articles
            .iter()
            .find(|a| &a.id == id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("article {} not found", id)))
    }

    /// Subscribers, most recent first.
    pub fn subscribers(&self) -> &[Subscriber] {
        &self.subscribers
    }

    /// `true` while a refresh is in flight.
    ///
    /// Refreshes run synchronously under the service lock, so any caller
    /// that can reach the service observes `false`.
    pub fn loading(&self) -> bool {
        self.loading
    }

    /// Reloads both collections from storage.
    ///
    /// On failure the previous collections stay in place.
    pub fn refresh(&mut self) {
        self.loading = true;
        self.refresh_articles();
        self.refresh_subscribers();
        self.loading = false;
    }

    fn refresh_articles(&mut self) {
        match self.store.load_articles() {
            Ok(articles) => self.articles = articles,
            Err(err) => {
                tracing::error!(error = %err, "failed to load articles");
            }
        }
    }

    fn refresh_subscribers(&mut self) {
        match self.store.list_subscribers() {
            Ok(subscribers) => self.subscribers = subscribers,
            Err(err) => {
                tracing::error!(error = %err, "failed to load subscribers");
            }
        }
    }

    // -----------------------------------------------------------------------
    // Article writes
    // -----------------------------------------------------------------------

    /// Persists `article`, updating it if it already exists and adding it
    /// otherwise.
    pub fn save_article(&mut self, article: &Article) -> Result<SaveOutcome, ApiError> {
        let exists = logged("check article", self.store.article_exists(&article.id))?;
        if exists {
            self.update_article(article)?;
            Ok(SaveOutcome::Updated)
        } else {
            self.add_article(article)?;
            Ok(SaveOutcome::Inserted)
        }
    }

    /// Replaces an existing article and its whole block sequence.
    pub fn update_article(&mut self, article: &Article) -> Result<(), ApiError> {
        logged("update article", self.store.replace_article(article))?;
        tracing::info!(article_id = %article.id, blocks = article.content.len(), "article updated");
        self.refresh_articles();
        Ok(())
    }

    /// Inserts a new article and its blocks.
    pub fn add_article(&mut self, article: &Article) -> Result<(), ApiError> {
        logged("add article", self.store.insert_article(article))?;
        tracing::info!(article_id = %article.id, blocks = article.content.len(), "article added");
        self.refresh_articles();
        Ok(())
    }

    pub fn delete_article(&mut self, id: &ArticleId) -> Result<(), ApiError> {
        logged("delete article", self.store.delete_article(id))?;
        tracing::info!(article_id = %id, "article deleted");
        self.refresh_articles();
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Subscribers
    // -----------------------------------------------------------------------

    /// Subscribes `email`, or updates the name of an existing subscriber.
    pub fn add_subscriber(
        &mut self,
        email: &str,
        name: Option<&str>,
    ) -> Result<Subscriber, ApiError> {
        if normalize_email(email).is_empty() {
            return Err(ApiError::BadRequest("email is required".to_string()));
        }
        let subscriber = logged("add subscriber", self.store.upsert_subscriber(email, name))?;
        tracing::info!(subscriber_id = %subscriber.id, "subscriber saved");
        self.refresh_subscribers();
        Ok(subscriber)
    }

    pub fn delete_subscriber(&mut self, id: SubscriberId) -> Result<(), ApiError> {
        logged("delete subscriber", self.store.delete_subscriber(id))?;
        self.refresh_subscribers();
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Admin flag
    // -----------------------------------------------------------------------

    pub fn is_admin(&self) -> Result<bool, ApiError> {
        logged("read admin flag", self.store.admin_flag())
    }

    pub fn set_admin(&mut self, enabled: bool) -> Result<(), ApiError> {
        logged("write admin flag", self.store.set_admin_flag(enabled))
    }
}

/// Logs a storage failure and converts it for the caller.
fn logged<T>(operation: &str, result: Result<T, StorageError>) -> Result<T, ApiError> {
    result.map_err(|err| {
        tracing::error!(operation, error = %err, "persistence failed");
        ApiError::from(err)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    use grind_core::{BlockId, BlockType, ContentBlock, EditorSession};
    use grind_storage::{ArticleRow, BlockRow};

    /// Delegates to an [`InMemoryStore`] but fails every write while the
    /// shared switch is on.
    struct FailingStore {
        inner: InMemoryStore,
        fail_writes: Arc<AtomicBool>,
    }

    impl FailingStore {
        fn check(&self) -> Result<(), StorageError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                Err(StorageError::Migration("injected failure".into()))
            } else {
                Ok(())
            }
        }
    }

    impl ContentStore for FailingStore {
        fn article_exists(&self, id: &ArticleId) -> Result<bool, StorageError> {
            self.inner.article_exists(id)
        }
        fn list_article_rows(&self) -> Result<Vec<ArticleRow>, StorageError> {
            self.inner.list_article_rows()
        }
        fn list_block_rows(&self) -> Result<Vec<BlockRow>, StorageError> {
            self.inner.list_block_rows()
        }
        fn article_rows(
            &self,
            id: &ArticleId,
        ) -> Result<Option<(ArticleRow, Vec<BlockRow>)>, StorageError> {
            self.inner.article_rows(id)
        }
        fn insert_article(&mut self, article: &Article) -> Result<(), StorageError> {
            self.check()?;
            self.inner.insert_article(article)
        }
        fn replace_article(&mut self, article: &Article) -> Result<(), StorageError> {
            self.check()?;
            self.inner.replace_article(article)
        }
        fn save_article(&mut self, article: &Article) -> Result<SaveOutcome, StorageError> {
            self.check()?;
            self.inner.save_article(article)
        }
        fn delete_article(&mut self, id: &ArticleId) -> Result<(), StorageError> {
            self.check()?;
            self.inner.delete_article(id)
        }
        fn list_subscribers(&self) -> Result<Vec<Subscriber>, StorageError> {
            self.inner.list_subscribers()
        }
        fn upsert_subscriber(
            &mut self,
            email: &str,
            name: Option<&str>,
        ) -> Result<Subscriber, StorageError> {
            self.check()?;
            self.inner.upsert_subscriber(email, name)
        }
        fn delete_subscriber(&mut self, id: SubscriberId) -> Result<(), StorageError> {
            self.check()?;
            self.inner.delete_subscriber(id)
        }
        fn admin_flag(&self) -> Result<bool, StorageError> {
            self.inner.admin_flag()
        }
        fn set_admin_flag(&mut self, enabled: bool) -> Result<(), StorageError> {
            self.check()?;
            self.inner.set_admin_flag(enabled)
        }
    }

    fn failing_service() -> (ContentService, Arc<AtomicBool>) {
        let switch = Arc::new(AtomicBool::new(false));
        let store = FailingStore {
            inner: InMemoryStore::new(),
            fail_writes: Arc::clone(&switch),
        };
        (ContentService::new(Box::new(store)), switch)
    }

    fn article(id: &str, title: &str) -> Article {
        let mut article = Article::new(ArticleId::from(id));
        article.title = title.to_string();
        article.content.push(ContentBlock::Text {
            id: BlockId::from("1"),
            content: "<p>Opening</p>".into(),
        });
        article
    }

    #[test]
    fn save_dispatches_on_existence() {
        let mut service = ContentService::in_memory();
        assert!(!service.loading());

        let mut a = article("a", "First");
        assert_eq!(service.save_article(&a).unwrap(), SaveOutcome::Inserted);

        a.title = "Second".into();
        assert_eq!(service.save_article(&a).unwrap(), SaveOutcome::Updated);

        assert_eq!(service.articles().len(), 1);
        assert_eq!(service.get_article(&a.id).unwrap().title, "Second");
    }

    #[test]
    fn edited_session_round_trips_through_service() {
        let mut service = ContentService::in_memory();
        service.add_article(&article("a", "Story")).unwrap();

        let mut session = EditorSession::new(service.get_article(&ArticleId::from("a")).unwrap());
        let added = session.add_block(BlockType::Image);
        session.move_block(&added, &BlockId::from("1"));
        let edited = session.finalize();
        service.save_article(&edited).unwrap();

        assert_eq!(service.get_article(&edited.id).unwrap(), edited);
    }

    #[test]
    fn failed_save_leaves_cache_untouched() {
        let (mut service, fail) = failing_service();
        let original = article("a", "Original");
        service.add_article(&original).unwrap();

        fail.store(true, Ordering::SeqCst);
        let mut edited = original.clone();
        edited.title = "Edited".into();
        assert!(matches!(
            service.save_article(&edited),
            Err(ApiError::InternalError(_))
        ));
        assert!(service.add_article(&article("b", "New")).is_err());
        assert!(service.delete_article(&original.id).is_err());

        assert_eq!(service.articles(), &[original]);
    }

    #[test]
    fn failed_subscribe_leaves_cache_untouched() {
        let (mut service, fail) = failing_service();
        service.add_subscriber("a@example.com", Some("Ada")).unwrap();
        let before = service.subscribers().to_vec();

        fail.store(true, Ordering::SeqCst);
        assert!(service.add_subscriber("b@example.com", None).is_err());
        assert_eq!(service.subscribers(), before.as_slice());
    }

    #[test]
    fn subscribe_twice_keeps_one_row() {
        let mut service = ContentService::in_memory();
        let first = service.add_subscriber("Reader@Example.com", None).unwrap();
        let second = service
            .add_subscriber("reader@example.com", Some("Reader"))
            .unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(service.subscribers().len(), 1);
        assert_eq!(service.subscribers()[0].name.as_deref(), Some("Reader"));
    }

    #[test]
    fn blank_email_is_rejected() {
        let mut service = ContentService::in_memory();
        assert!(matches!(
            service.add_subscriber("   ", None),
            Err(ApiError::BadRequest(_))
        ));
        assert!(service.subscribers().is_empty());
    }

    #[test]
    fn delete_unknown_article_is_not_found() {
        let mut service = ContentService::in_memory();
        assert!(matches!(
            service.delete_article(&ArticleId::from("ghost")),
            Err(ApiError::NotFound(_))
        ));
        assert!(matches!(
            service.get_article(&ArticleId::from("ghost")),
            Err(ApiError::NotFound(_))
        ));
    }

    #[test]
    fn admin_flag_toggles() {
        let mut service = ContentService::in_memory();
        assert!(!service.is_admin().unwrap());
        service.set_admin(true).unwrap();
        assert!(service.is_admin().unwrap());
        service.set_admin(false).unwrap();
        assert!(!service.is_admin().unwrap());
    }
}
