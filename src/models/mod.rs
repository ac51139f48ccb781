//! Domain models

pub mod token;
pub mod wire;

pub use token::{
    BulkOperation, BulkRequest, ComputedAmounts, Token, TokenFilter, TokenInput, TokenStatus,
};
