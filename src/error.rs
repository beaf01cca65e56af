//! Error types for merkle_commit

use thiserror::Error;

/// Result type alias for merkle_commit operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in merkle_commit operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Leaf index {index} out of range for tree with {leaf_count} leaves")]
    IndexOutOfRange { index: i64, leaf_count: usize },

    #[error("Invalid digest: {0}")]
    InvalidDigest(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),
}
