//! Unified error type for store synchronization.

use thiserror::Error;

/// Top-level error for vector store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Network / transport failures from the HTTP client.
    #[error("store transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-success HTTP status with the captured response body.
    #[error("store returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Invalid or unsupported configuration.
    #[error("store config error: {0}")]
    Config(String),
}

impl StoreError {
    /// Transient failures worth retrying: network errors, 5xx, rate limits.
    pub fn is_transient(&self) -> bool {
        match self {
            StoreError::Transport(_) => true,
            StoreError::Status { status, .. } => *status >= 500 || *status == 429,
            StoreError::Config(_) => false,
        }
    }
}
