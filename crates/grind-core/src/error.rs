//! Core error types for grind-core.
//!
//! Uses `thiserror` for structured, matchable error variants covering the
//! failure modes of the content model: tags and field names arriving as
//! free text from callers.

use thiserror::Error;

/// Core errors produced by the grind-core crate.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// A block type tag outside the closed set.
    #[error("unknown block type: '{tag}'")]
    UnknownBlockType { tag: String },

    /// An article field name that is not editable.
    #[error("unknown article field: '{name}'")]
    UnknownArticleField { name: String },
}
