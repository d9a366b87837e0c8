//! Article listing types.

use grind_core::Article;
use serde::Serialize;

/// Response for listing all published articles.
#[derive(Debug, Clone, Serialize)]
pub struct ArticleListResponse {
    /// Most recently created first.
    pub articles: Vec<Article>,
}
