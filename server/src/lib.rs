//! Frenzy restaurant discovery server
//!
//! - `core` - CLI, configuration, storage, shutdown and the application runner
//! - `data` - SQLite service, schema and repositories
//! - `domain` - restaurant filtering, search and seed import
//! - `api` - axum routes and server

pub mod api;
mod app;
pub mod core;
pub mod data;
pub mod domain;
pub mod utils;
