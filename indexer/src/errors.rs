use embed_client::EmbedError;
use thiserror::Error;
use vector_store::StoreError;

/// Errors surfaced by the indexing pipeline.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("embedding error: {0}")]
    Embed(#[from] EmbedError),
}

pub type Result<T> = std::result::Result<T, IndexError>;
