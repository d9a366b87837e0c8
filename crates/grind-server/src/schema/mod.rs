//! API schema types for request/response definitions.
//!
//! Each sub-module defines the request and response types for a specific
//! API domain. Types use serde derives for JSON serialization/deserialization
//! with camelCase field names, matching the content model's wire format.

pub mod articles;
pub mod auth;
pub mod dashboard;
pub mod generate;
pub mod sessions;
pub mod subscribers;
