//! API handlers for Tokendesk REST endpoints

pub mod export;
pub mod health;
pub mod openapi;
pub mod reports;
pub mod tokens;
