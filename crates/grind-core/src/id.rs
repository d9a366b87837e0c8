//! Identifier newtypes for articles, blocks and subscribers.
//!
//! Article and block ids are opaque strings: articles seeded from fixtures use
//! human-readable slugs, generated ones are time-derived, and block ids are
//! UUIDs. Distinct newtypes keep a `BlockId` from being passed where an
//! `ArticleId` is expected.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable article identifier, assigned once at creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArticleId(pub String);

/// Block identifier, unique within one article's block sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(pub String);

/// Store-assigned subscriber identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubscriberId(pub i64);

impl ArticleId {
    /// Derives a new article id from the creation time.
    ///
    /// A short random suffix separates drafts created within the same
    /// millisecond.
    pub fn generate(now: DateTime<Utc>) -> Self {
        let suffix = Uuid::new_v4().simple().to_string();
        ArticleId(format!(
            "grind-article-{}-{}",
            now.timestamp_millis(),
            &suffix[..6]
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl BlockId {
    /// Returns a fresh random block id (UUID v4).
    pub fn generate() -> Self {
        BlockId(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ArticleId {
    fn from(s: &str) -> Self {
        ArticleId(s.to_string())
    }
}

impl From<&str> for BlockId {
    fn from(s: &str) -> Self {
        BlockId(s.to_string())
    }
}

impl fmt::Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
