//! Tokendesk - Service Token Tracking Server
//!
//! A Rust REST API server for tracking service tokens: client and agent
//! records, charges and payments, completion reporting and CSV export.

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
