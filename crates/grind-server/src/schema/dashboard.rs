//! Admin dashboard view types.
//!
//! The dashboard shows article summaries rather than full block sequences,
//! plus the complete subscriber list.

use grind_core::{Article, ArticleId, Subscriber};
use serde::Serialize;

/// One row of the dashboard's article table.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleSummaryView {
    pub id: ArticleId,
    pub title: String,
    pub author: String,
    pub publish_date: String,
    /// Number of content blocks in the article.
    pub block_count: usize,
}

impl From<&Article> for ArticleSummaryView {
    fn from(article: &Article) -> Self {
        ArticleSummaryView {
            id: article.id.clone(),
            title: article.title.clone(),
            author: article.author.clone(),
            publish_date: article.publish_date.clone(),
            block_count: article.content.len(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub article_count: usize,
    pub subscriber_count: usize,
    pub articles: Vec<ArticleSummaryView>,
    pub subscribers: Vec<Subscriber>,
    /// Editor sessions currently open.
    pub open_sessions: usize,
    /// Whether text generation has an API key.
    pub text_generation_enabled: bool,
}
