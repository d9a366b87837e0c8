//! The article aggregate and the subscriber record.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::block::ContentBlock;
use crate::error::CoreError;
use crate::id::{ArticleId, BlockId, SubscriberId};

/// An article: display metadata plus an ordered block sequence.
///
/// `publish_date` is an opaque display string ("October 12, 2023"), never
/// parsed. `content` order is the reading order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: ArticleId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub publish_date: String,
    #[serde(default)]
    pub hero_image: String,
    #[serde(default)]
    pub content: Vec<ContentBlock>,
}

impl Article {
    /// A blank article with only an id.
    pub fn new(id: ArticleId) -> Self {
        Article {
            id,
            title: String::new(),
            subtitle: String::new(),
            author: String::new(),
            publish_date: String::new(),
            hero_image: String::new(),
            content: Vec::new(),
        }
    }

    /// The template a new draft starts from: time-derived id, the given
    /// byline, and today's date in long form.
    pub fn draft(author: &str, now: DateTime<Utc>) -> Self {
        let mut article = Article::new(ArticleId::generate(now));
        article.author = author.to_string();
        article.publish_date = display_date(now);
        article
    }

    pub fn block(&self, id: &BlockId) -> Option<&ContentBlock> {
        self.content.iter().find(|b| b.id() == id)
    }

    pub fn position_of(&self, id: &BlockId) -> Option<usize> {
        self.content.iter().position(|b| b.id() == id)
    }

    /// Returns the first block id that occurs more than once, if any.
    pub fn duplicate_block_id(&self) -> Option<&BlockId> {
        let mut seen = std::collections::HashSet::new();
        self.content.iter().map(ContentBlock::id).find(|id| !seen.insert(*id))
    }
}

/// Formats a date the way articles display it, e.g. "October 12, 2023".
pub fn display_date(now: DateTime<Utc>) -> String {
    now.format("%B %-d, %Y").to_string()
}

/// The scalar article fields an editor may set by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ArticleField {
    Title,
    Subtitle,
    Author,
    PublishDate,
    HeroImage,
}

impl ArticleField {
    pub fn as_str(self) -> &'static str {
        match self {
            ArticleField::Title => "title",
            ArticleField::Subtitle => "subtitle",
            ArticleField::Author => "author",
            ArticleField::PublishDate => "publishDate",
            ArticleField::HeroImage => "heroImage",
        }
    }
}

impl fmt::Display for ArticleField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArticleField {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "title" => Ok(ArticleField::Title),
            "subtitle" => Ok(ArticleField::Subtitle),
            "author" => Ok(ArticleField::Author),
            "publishDate" => Ok(ArticleField::PublishDate),
            "heroImage" => Ok(ArticleField::HeroImage),
            other => Err(CoreError::UnknownArticleField {
                name: other.to_string(),
            }),
        }
    }
}

/// A newsletter subscriber. Email is the natural key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscriber {
    pub id: SubscriberId,
    pub name: Option<String>,
    pub email: String,
    pub subscribed_at: String,
}

/// Canonical form of an email key: trimmed and lower-cased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
