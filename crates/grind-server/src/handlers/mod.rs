//! HTTP handler modules for the Grind Stories API.
//!
//! Each sub-module implements thin handlers that parse requests, check the
//! admin gate where required, delegate to [`ContentService`] or the session
//! registry, and return JSON responses. No business logic lives in handlers.
//!
//! [`ContentService`]: crate::service::ContentService

pub mod articles;
pub mod auth;
pub mod dashboard;
pub mod generate;
pub mod sessions;
pub mod subscribers;
