//! Content model for Grind Stories: blocks, articles, subscribers and the
//! editor session that mutates an article before it is persisted.

pub mod article;
pub mod block;
pub mod editor;
pub mod error;
pub mod id;

// Re-export commonly used types
pub use article::{display_date, normalize_email, Article, ArticleField, Subscriber};
pub use block::{create_block, BlockPatch, BlockType, ContentBlock};
pub use editor::{EditCommand, EditOutcome, EditorSession};
pub use error::CoreError;
pub use id::{ArticleId, BlockId, SubscriberId};
