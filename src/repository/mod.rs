//! Repository layer for database operations
//!
//! The single storage seam of the service: handlers and services never touch
//! SQL directly, so the backing store can be swapped behind this layer.

pub mod tokens;

use sqlx::{Pool, Postgres};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub tokens: tokens::TokensRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            tokens: tokens::TokensRepository::new(pool.clone()),
            pool,
        }
    }
}
