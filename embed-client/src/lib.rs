//! Embedding service client.
//!
//! One call embeds one chunk of text. The model-side "input too large"
//! rejection is a normal outcome here (`Ok(None)`), handled upstream by
//! re-splitting the chunk; every other failure is an error. This layer
//! never retries: oversize failures are remedied by splitting, not
//! repetition.

mod error;
mod ollama;

pub use error::EmbedError;
pub use ollama::{OllamaEmbedder, is_input_too_large};

use async_trait::async_trait;

/// Provider interface for embedding generation.
///
/// Implement this trait to plug in another embedding backend; the
/// pipeline only ever talks to the trait.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed one chunk of text.
    ///
    /// Returns `Ok(None)` when the input exceeded the model's size limit
    /// (the caller splits and retries) or when the service produced no
    /// usable vector; returns `Err` for every other failure.
    async fn embed(&self, text: &str) -> Result<Option<Vec<f32>>, EmbedError>;
}
