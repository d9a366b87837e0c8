//! HTTP/JSON API server for the Grind Stories newsletter.
//!
//! Serves published articles and the public subscribe form, and gives the
//! single administrator editor sessions, text generation, and the subscriber
//! export. This crate contains the server framework, API schema types, error
//! handling, and route definitions.

pub mod auth;
pub mod config;
pub mod error;
pub mod export;
pub mod handlers;
pub mod router;
pub mod schema;
pub mod service;
pub mod sessions;
pub mod state;
pub mod text_gen;
