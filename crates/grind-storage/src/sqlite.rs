//! SQLite implementation of [`ContentStore`].
//!
//! [`SqliteStore`] persists articles in a SQLite database with WAL mode,
//! foreign keys, and automatic schema migrations. Every article-level write
//! runs in one transaction: the scalar update, the delete of the old block
//! rows and the insert of the new ones commit together or not at all.

use rusqlite::{params, Connection, OptionalExtension, Row, Transaction};

use grind_core::{normalize_email, Article, ArticleId, Subscriber, SubscriberId};

use crate::convert::serialize_blocks;
use crate::error::StorageError;
use crate::traits::{check_block_ids, clean_name, ContentStore};
use crate::types::{ArticleRow, BlockRow, SaveOutcome};

const ADMIN_FLAG_KEY: &str = "GRIND_ADMIN_AUTH";

const ARTICLE_COLUMNS: &str =
    "id, title, subtitle, author, publish_date, hero_image, created_at";

const BLOCK_COLUMNS: &str =
    "article_id, id, type, content, src, caption, title, company, logo_src, link, block_order";

/// SQLite-backed implementation of [`ContentStore`].
pub struct SqliteStore {
    conn: Connection,
}

/// How [`SqliteStore::write_article`] treats an existing row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriteMode {
    InsertOnly,
    ReplaceOnly,
    Upsert,
}

impl SqliteStore {
    /// Opens (or creates) a SQLite database at `path`.
    pub fn new(path: &str) -> Result<Self, StorageError> {
        let conn = crate::schema::open_database(path)?;
        Ok(SqliteStore { conn })
    }

    /// Opens an in-memory SQLite database (for testing).
    pub fn in_memory() -> Result<Self, StorageError> {
        let conn = crate::schema::open_in_memory()?;
        Ok(SqliteStore { conn })
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    fn read_article_row(row: &Row<'_>) -> rusqlite::Result<ArticleRow> {
        Ok(ArticleRow {
            id: ArticleId(row.get(0)?),
            title: row.get(1)?,
            subtitle: row.get(2)?,
            author: row.get(3)?,
            publish_date: row.get(4)?,
            hero_image: row.get(5)?,
            created_at: row.get(6)?,
        })
    }

    fn read_block_row(row: &Row<'_>) -> rusqlite::Result<BlockRow> {
        Ok(BlockRow {
            article_id: ArticleId(row.get(0)?),
            id: row.get(1)?,
            block_type: row.get(2)?,
            content: row.get(3)?,
            src: row.get(4)?,
            caption: row.get(5)?,
            title: row.get(6)?,
            company: row.get(7)?,
            logo_src: row.get(8)?,
            link: row.get(9)?,
            block_order: row.get(10)?,
        })
    }

    fn read_subscriber(row: &Row<'_>) -> rusqlite::Result<Subscriber> {
        Ok(Subscriber {
            id: SubscriberId(row.get(0)?),
            name: row.get(1)?,
            email: row.get(2)?,
            subscribed_at: row.get(3)?,
        })
    }

    fn exists_in(tx: &Transaction<'_>, id: &ArticleId) -> Result<bool, StorageError> {
        let exists: bool = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM articles WHERE id = ?1)",
            params![id.as_str()],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    fn insert_blocks(tx: &Transaction<'_>, article: &Article) -> Result<(), StorageError> {
        let rows = serialize_blocks(&article.id, &article.content);
        if rows.is_empty() {
            return Ok(());
        }
        let mut stmt = tx.prepare_cached(&format!(
            "INSERT INTO content_blocks ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            BLOCK_COLUMNS
        ))?;
        for row in &rows {
            stmt.execute(params![
                row.article_id.as_str(),
                row.id,
                row.block_type,
                row.content,
                row.src,
                row.caption,
                row.title,
                row.company,
                row.logo_src,
                row.link,
                row.block_order,
            ])?;
        }
        Ok(())
    }

    /// Writes one article's rows in a single transaction.
    fn write_article(
        &mut self,
        article: &Article,
        mode: WriteMode,
    ) -> Result<SaveOutcome, StorageError> {
        check_block_ids(article)?;
        let tx = self.conn.transaction()?;
        let exists = Self::exists_in(&tx, &article.id)?;

        let outcome = match (exists, mode) {
            (true, WriteMode::InsertOnly) => {
                return Err(StorageError::ArticleExists(article.id.to_string()))
            }
            (false, WriteMode::ReplaceOnly) => {
                return Err(StorageError::ArticleNotFound(article.id.to_string()))
            }
            (true, _) => {
                tx.execute(
                    "UPDATE articles SET title = ?2, subtitle = ?3, author = ?4, publish_date = ?5, hero_image = ?6 WHERE id = ?1",
                    params![
                        article.id.as_str(),
                        article.title,
                        article.subtitle,
                        article.author,
                        article.publish_date,
                        article.hero_image,
                    ],
                )?;
                tx.execute(
                    "DELETE FROM content_blocks WHERE article_id = ?1",
                    params![article.id.as_str()],
                )?;
                SaveOutcome::Updated
            }
            (false, _) => {
                tx.execute(
                    "INSERT INTO articles (id, title, subtitle, author, publish_date, hero_image) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                    params![
                        article.id.as_str(),
                        article.title,
                        article.subtitle,
                        article.author,
                        article.publish_date,
                        article.hero_image,
                    ],
                )?;
                SaveOutcome::Inserted
            }
        };

        Self::insert_blocks(&tx, article)?;
        tx.commit()?;
        tracing::debug!(
            article_id = %article.id,
            blocks = article.content.len(),
            ?outcome,
            "article written"
        );
        Ok(outcome)
    }
}

impl ContentStore for SqliteStore {
    fn article_exists(&self, id: &ArticleId) -> Result<bool, StorageError> {
        let exists: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM articles WHERE id = ?1)",
            params![id.as_str()],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    fn list_article_rows(&self) -> Result<Vec<ArticleRow>, StorageError> {
        let mut stmt = self.conn.prepare_cached(&format!(
            "SELECT {} FROM articles ORDER BY created_at DESC, rowid DESC",
            ARTICLE_COLUMNS
        ))?;
        let rows = stmt.query_map([], Self::read_article_row)?;
        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }

    fn list_block_rows(&self) -> Result<Vec<BlockRow>, StorageError> {
        let mut stmt = self.conn.prepare_cached(&format!(
            "SELECT {} FROM content_blocks ORDER BY article_id, block_order",
            BLOCK_COLUMNS
        ))?;
        let rows = stmt.query_map([], Self::read_block_row)?;
        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }

    fn article_rows(
        &self,
        id: &ArticleId,
    ) -> Result<Option<(ArticleRow, Vec<BlockRow>)>, StorageError> {
        let article = self
            .conn
            .query_row(
                &format!("SELECT {} FROM articles WHERE id = ?1", ARTICLE_COLUMNS),
                params![id.as_str()],
                Self::read_article_row,
            )
            .optional()?;
        let Some(article) = article else {
            return Ok(None);
        };

        let mut stmt = self.conn.prepare_cached(&format!(
            "SELECT {} FROM content_blocks WHERE article_id = ?1 ORDER BY block_order",
            BLOCK_COLUMNS
        ))?;
        let rows = stmt.query_map(params![id.as_str()], Self::read_block_row)?;
        let mut blocks = Vec::new();
        for row in rows {
            blocks.push(row?);
        }
        Ok(Some((article, blocks)))
    }

    fn insert_article(&mut self, article: &Article) -> Result<(), StorageError> {
        self.write_article(article, WriteMode::InsertOnly)?;
        Ok(())
    }

    fn replace_article(&mut self, article: &Article) -> Result<(), StorageError> {
        self.write_article(article, WriteMode::ReplaceOnly)?;
        Ok(())
    }

    fn save_article(&mut self, article: &Article) -> Result<SaveOutcome, StorageError> {
        self.write_article(article, WriteMode::Upsert)
    }

    fn delete_article(&mut self, id: &ArticleId) -> Result<(), StorageError> {
        let tx = self.conn.transaction()?;
        // The FK cascades too; the explicit delete keeps orphans impossible
        // even on a connection opened without foreign_keys.
        tx.execute(
            "DELETE FROM content_blocks WHERE article_id = ?1",
            params![id.as_str()],
        )?;
        let removed = tx.execute("DELETE FROM articles WHERE id = ?1", params![id.as_str()])?;
        if removed == 0 {
            return Err(StorageError::ArticleNotFound(id.to_string()));
        }
        tx.commit()?;
        Ok(())
    }

    fn list_subscribers(&self) -> Result<Vec<Subscriber>, StorageError> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT id, name, email, subscribed_at FROM subscribers ORDER BY subscribed_at DESC, id DESC",
        )?;
        let rows = stmt.query_map([], Self::read_subscriber)?;
        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }

    fn upsert_subscriber(
        &mut self,
        email: &str,
        name: Option<&str>,
    ) -> Result<Subscriber, StorageError> {
        let email = normalize_email(email);
        let name = clean_name(name);
        let subscriber = self.conn.query_row(
            "INSERT INTO subscribers (email, name) VALUES (?1, ?2)
             ON CONFLICT(email) DO UPDATE SET name = COALESCE(excluded.name, subscribers.name)
             RETURNING id, name, email, subscribed_at",
            params![email, name],
            Self::read_subscriber,
        )?;
        Ok(subscriber)
    }

    fn delete_subscriber(&mut self, id: SubscriberId) -> Result<(), StorageError> {
        let removed = self
            .conn
            .execute("DELETE FROM subscribers WHERE id = ?1", params![id.0])?;
        if removed == 0 {
            return Err(StorageError::SubscriberNotFound(id.0));
        }
        Ok(())
    }

    fn admin_flag(&self) -> Result<bool, StorageError> {
        let value: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM settings WHERE key = ?1",
                params![ADMIN_FLAG_KEY],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value.as_deref() == Some("true"))
    }

    fn set_admin_flag(&mut self, enabled: bool) -> Result<(), StorageError> {
        if enabled {
            self.conn.execute(
                "INSERT INTO settings (key, value) VALUES (?1, 'true')
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                params![ADMIN_FLAG_KEY],
            )?;
        } else {
            self.conn.execute(
                "DELETE FROM settings WHERE key = ?1",
                params![ADMIN_FLAG_KEY],
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grind_core::{BlockId, BlockType, ContentBlock, EditorSession};

    fn sample_article(id: &str) -> Article {
        let mut article = Article::new(ArticleId::from(id));
        article.title = "The Art of Timeless Style".into();
        article.subtitle = "Cultivating a wardrobe that transcends trends.".into();
        article.author = "A. Vanderbilt".into();
        article.publish_date = "October 12, 2023".into();
        article.hero_image = "https://picsum.photos/1200/800".into();
        article.content = vec![
            ContentBlock::Text {
                id: BlockId::from("1"),
                content: "<p>In a world saturated with fleeting trends</p>".into(),
            },
            ContentBlock::Image {
                id: BlockId::from("2"),
                src: "https://picsum.photos/1000/700".into(),
                caption: "A well-tailored coat.".into(),
            },
            ContentBlock::Sponsorship {
                id: BlockId::from("4"),
                company: "Heirloom Watches Co.".into(),
                logo_src: "https://picsum.photos/200/200".into(),
                link: "#".into(),
            },
        ];
        article
    }

    fn block_count(store: &SqliteStore, id: &str) -> i64 {
        store
            .conn
            .query_row(
                "SELECT COUNT(*) FROM content_blocks WHERE article_id = ?1",
                params![id],
                |row| row.get(0),
            )
            .unwrap()
    }

    #[test]
    fn insert_and_load_round_trip() {
        let mut store = SqliteStore::in_memory().unwrap();
        let article = sample_article("timeless");
        assert_eq!(store.save_article(&article).unwrap(), SaveOutcome::Inserted);
        assert_eq!(store.load_article(&article.id).unwrap(), article);
        assert_eq!(store.load_articles().unwrap(), vec![article]);
    }

    #[test]
    fn variant_columns_are_null_for_other_variants() {
        let mut store = SqliteStore::in_memory().unwrap();
        store.insert_article(&sample_article("a")).unwrap();
        let (content, src, company): (Option<String>, Option<String>, Option<String>) = store
            .conn
            .query_row(
                "SELECT content, src, company FROM content_blocks WHERE article_id = 'a' AND id = '2'",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .unwrap();
        assert!(content.is_none());
        assert!(company.is_none());
        assert_eq!(src.as_deref(), Some("https://picsum.photos/1000/700"));
    }

    #[test]
    fn save_existing_replaces_blocks_exactly() {
        let mut store = SqliteStore::in_memory().unwrap();
        let article = sample_article("a");
        store.save_article(&article).unwrap();

        let mut session = EditorSession::new(store.load_article(&article.id).unwrap());
        session.remove_block(&BlockId::from("2"));
        let added = session.add_block(BlockType::Audio);
        session.move_block(&added, &BlockId::from("1"));
        let edited = session.finalize();

        assert_eq!(store.save_article(&edited).unwrap(), SaveOutcome::Updated);
        assert_eq!(block_count(&store, "a"), 3);

        let orders: Vec<(String, i64)> = store
            .list_block_rows()
            .unwrap()
            .into_iter()
            .map(|r| (r.id, r.block_order))
            .collect();
        assert_eq!(
            orders,
            vec![
                (added.to_string(), 0),
                ("1".to_string(), 1),
                ("4".to_string(), 2)
            ]
        );
        assert_eq!(store.load_article(&edited.id).unwrap(), edited);
    }

    #[test]
    fn empty_article_inserts_no_blocks() {
        let mut store = SqliteStore::in_memory().unwrap();
        let article = Article::new(ArticleId::from("blank"));
        store.insert_article(&article).unwrap();
        assert_eq!(block_count(&store, "blank"), 0);
        assert_eq!(store.load_article(&article.id).unwrap(), article);
    }

    #[test]
    fn insert_existing_and_replace_missing_fail() {
        let mut store = SqliteStore::in_memory().unwrap();
        let article = sample_article("a");
        store.insert_article(&article).unwrap();
        assert!(matches!(
            store.insert_article(&article),
            Err(StorageError::ArticleExists(_))
        ));
        assert!(matches!(
            store.replace_article(&sample_article("ghost")),
            Err(StorageError::ArticleNotFound(_))
        ));
        assert!(!store.article_exists(&ArticleId::from("ghost")).unwrap());
    }

    #[test]
    fn failed_block_insert_rolls_back_whole_save() {
        let mut store = SqliteStore::in_memory().unwrap();
        let original = sample_article("a");
        store.save_article(&original).unwrap();

        store
            .conn
            .execute_batch(
                "CREATE TRIGGER reject_boom BEFORE INSERT ON content_blocks
                 WHEN NEW.content = 'boom'
                 BEGIN SELECT RAISE(ABORT, 'boom rejected'); END;",
            )
            .unwrap();

        let mut edited = original.clone();
        edited.title = "Should not stick".into();
        edited.content.push(ContentBlock::Text {
            id: BlockId::from("9"),
            content: "boom".into(),
        });
        assert!(matches!(
            store.save_article(&edited),
            Err(StorageError::Sqlite(_))
        ));

        assert_eq!(store.load_article(&original.id).unwrap(), original);
    }

    #[test]
    fn duplicate_block_ids_are_rejected() {
        let mut store = SqliteStore::in_memory().unwrap();
        let mut article = sample_article("a");
        article.content.push(ContentBlock::Text {
            id: BlockId::from("1"),
            content: "dup".into(),
        });
        assert!(matches!(
            store.save_article(&article),
            Err(StorageError::IntegrityError { .. })
        ));
        assert!(!store.article_exists(&article.id).unwrap());
    }

    #[test]
    fn unknown_block_type_is_skipped_on_load() {
        let mut store = SqliteStore::in_memory().unwrap();
        let article = sample_article("a");
        store.insert_article(&article).unwrap();
        store
            .conn
            .execute(
                "INSERT INTO content_blocks (article_id, id, type, content, block_order) VALUES ('a', 'poll', 'poll', 'Which watch?', 1)",
                [],
            )
            .unwrap();
        store
            .conn
            .execute(
                "UPDATE content_blocks SET block_order = block_order + 1 WHERE article_id = 'a' AND id IN ('2', '4')",
                [],
            )
            .unwrap();

        assert_eq!(store.load_article(&article.id).unwrap(), article);
    }

    #[test]
    fn delete_removes_article_and_blocks() {
        let mut store = SqliteStore::in_memory().unwrap();
        store.insert_article(&sample_article("a")).unwrap();
        store.insert_article(&sample_article("b")).unwrap();

        store.delete_article(&ArticleId::from("a")).unwrap();
        assert_eq!(block_count(&store, "a"), 0);
        assert_eq!(block_count(&store, "b"), 3);
        assert!(matches!(
            store.load_article(&ArticleId::from("a")),
            Err(StorageError::ArticleNotFound(_))
        ));
        assert!(matches!(
            store.delete_article(&ArticleId::from("a")),
            Err(StorageError::ArticleNotFound(_))
        ));
    }

    #[test]
    fn foreign_key_cascade_removes_blocks() {
        let mut store = SqliteStore::in_memory().unwrap();
        store.insert_article(&sample_article("a")).unwrap();
        store
            .conn
            .execute("DELETE FROM articles WHERE id = 'a'", [])
            .unwrap();
        assert_eq!(block_count(&store, "a"), 0);
    }

    #[test]
    fn listing_is_newest_first() {
        let mut store = SqliteStore::in_memory().unwrap();
        for id in ["first", "second", "third"] {
            store.insert_article(&Article::new(ArticleId::from(id))).unwrap();
        }
        store
            .conn
            .execute(
                "UPDATE articles SET created_at = '2020-01-01T00:00:00.000Z' WHERE id = 'third'",
                [],
            )
            .unwrap();
        let ids: Vec<String> = store
            .list_article_rows()
            .unwrap()
            .into_iter()
            .map(|r| r.id.0)
            .collect();
        assert_eq!(ids, ["second", "first", "third"]);
    }

    #[test]
    fn update_keeps_created_at() {
        let mut store = SqliteStore::in_memory().unwrap();
        let mut article = sample_article("a");
        store.insert_article(&article).unwrap();
        let before = store.list_article_rows().unwrap()[0].created_at.clone();

        article.title = "Revised".into();
        store.replace_article(&article).unwrap();
        let row = store.list_article_rows().unwrap().remove(0);
        assert_eq!(row.created_at, before);
        assert_eq!(row.title, "Revised");
    }

    #[test]
    fn subscriber_upsert_updates_instead_of_duplicating() {
        let mut store = SqliteStore::in_memory().unwrap();
        let first = store.upsert_subscriber("reader@example.com", None).unwrap();
        assert!(first.name.is_none());

        let second = store
            .upsert_subscriber("READER@example.com ", Some("Ada \"The Countess\""))
            .unwrap();
        assert_eq!(second.id, first.id);
        assert_eq!(second.name.as_deref(), Some("Ada \"The Countess\""));
        assert_eq!(second.subscribed_at, first.subscribed_at);

        let third = store.upsert_subscriber("reader@example.com", Some("  ")).unwrap();
        assert_eq!(third.name.as_deref(), Some("Ada \"The Countess\""));

        assert_eq!(store.list_subscribers().unwrap().len(), 1);
    }

    #[test]
    fn subscribers_newest_first_and_delete() {
        let mut store = SqliteStore::in_memory().unwrap();
        let a = store.upsert_subscriber("a@example.com", None).unwrap();
        let b = store.upsert_subscriber("b@example.com", None).unwrap();
        let emails: Vec<String> = store
            .list_subscribers()
            .unwrap()
            .into_iter()
            .map(|s| s.email)
            .collect();
        assert_eq!(emails, ["b@example.com", "a@example.com"]);

        store.delete_subscriber(a.id).unwrap();
        assert_eq!(store.list_subscribers().unwrap(), vec![b]);
        assert!(matches!(
            store.delete_subscriber(a.id),
            Err(StorageError::SubscriberNotFound(_))
        ));
    }

    #[test]
    fn admin_flag_persists_across_connections() {
        let path = std::env::temp_dir().join(format!(
            "grind_flag_{}_{}.db",
            std::process::id(),
            chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default()
        ));
        let path = path.to_string_lossy().to_string();
        {
            let mut store = SqliteStore::new(&path).unwrap();
            assert!(!store.admin_flag().unwrap());
            store.set_admin_flag(true).unwrap();
        }
        let mut store = SqliteStore::new(&path).unwrap();
        assert!(store.admin_flag().unwrap());
        store.set_admin_flag(false).unwrap();
        assert!(!store.admin_flag().unwrap());
        drop(store);
        let _ = std::fs::remove_file(&path);
    }
}
