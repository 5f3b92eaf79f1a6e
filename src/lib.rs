//! Athenaeum Library Catalog Server
//!
//! A Rust implementation of a library catalog server, providing a REST JSON
//! API for browsing books and authors and managing loans of physical copies.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
