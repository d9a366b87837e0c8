//! Persistence for Grind Stories articles, subscribers and the admin flag.
//!
//! Provides the [`ContentStore`] trait defining the storage contract that all
//! backends implement, plus the [`InMemoryStore`] and [`SqliteStore`] as
//! first-class backends.
//!
//! # Architecture
//!
//! Articles are stored relationally: one row per article and one row per
//! content block, ordered by an explicit `block_order`. The [`convert`]
//! module flattens and rebuilds block sequences; the backends only deal in
//! rows plus the whole-article writes that must stay atomic.
//!
//! # Modules
//!
//! - [`error`]: StorageError enum with all failure modes
//! - [`types`]: ArticleRow, BlockRow, SaveOutcome
//! - [`traits`]: ContentStore trait definition
//! - [`convert`]: block serializer and deserializer
//! - [`memory`]: InMemoryStore implementation
//! - [`schema`]: migrations and connection setup
//! - [`sqlite`]: SqliteStore implementation

pub mod convert;
pub mod error;
pub mod memory;
pub mod schema;
pub mod sqlite;
pub mod traits;
pub mod types;

// Re-export key types for ergonomic use.
pub use convert::{assemble_articles, deserialize_blocks, serialize_blocks};
pub use error::StorageError;
pub use memory::InMemoryStore;
pub use sqlite::SqliteStore;
pub use traits::ContentStore;
pub use types::{now_timestamp, ArticleRow, BlockRow, SaveOutcome};
