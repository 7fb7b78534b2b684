use thiserror::Error;

/// Errors from the embedding service.
#[derive(Debug, Error)]
pub enum EmbedError {
    /// Network / transport failures from the HTTP client.
    #[error("embedding transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-success HTTP status that is not the oversize rejection.
    #[error("embedding service returned {status}: {body}")]
    Status { status: u16, body: String },
}
