//! Flat row shapes mirroring the relational schema.
//!
//! These are the storage-side view of the content model: one [`ArticleRow`]
//! per article and one [`BlockRow`] per content block, with nullable
//! variant-specific columns and an explicit `block_order`.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use grind_core::ArticleId;

/// Scalar columns of the `articles` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRow {
    pub id: ArticleId,
    pub title: String,
    pub subtitle: String,
    pub author: String,
    pub publish_date: String,
    pub hero_image: String,
    /// Assigned by the store on first insert; never changed by updates.
    pub created_at: String,
}

/// One row of the `content_blocks` table.
///
/// `block_type` stays a raw string: rows written by other clients may carry
/// tags this build does not know.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockRow {
    pub article_id: ArticleId,
    pub id: String,
    pub block_type: String,
    pub content: Option<String>,
    pub src: Option<String>,
    pub caption: Option<String>,
    pub title: Option<String>,
    pub company: Option<String>,
    pub logo_src: Option<String>,
    pub link: Option<String>,
    pub block_order: i64,
}

/// Whether a save created a new article or replaced an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveOutcome {
    Inserted,
    Updated,
}

/// Current UTC time in the format the SQLite schema uses for defaults
/// (`2024-05-01T12:00:00.000Z`).
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
