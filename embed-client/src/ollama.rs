//! Ollama-compatible embedding backend.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::{EmbedError, Embedder};

#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    #[serde(default)]
    embedding: Vec<f32>,
}

/// Recognize the model-side oversize rejection in an error body.
pub fn is_input_too_large(body: &str) -> bool {
    let body = body.to_ascii_lowercase();
    body.contains("too large") || body.contains("input length")
}

/// Embedding client for an Ollama-style `/api/embeddings` endpoint.
///
/// The HTTP client is passed in so callers share one connection pool and
/// tests can point it at a fake server.
#[derive(Clone)]
pub struct OllamaEmbedder {
    http: reqwest::Client,
    url: String,
    model: String,
}

impl OllamaEmbedder {
    pub fn new(http: reqwest::Client, base_url: &str, model: impl Into<String>) -> Self {
        Self {
            http,
            url: format!("{}/api/embeddings", base_url.trim_end_matches('/')),
            model: model.into(),
        }
    }
}

#[async_trait]
impl Embedder for OllamaEmbedder {
    async fn embed(&self, text: &str) -> Result<Option<Vec<f32>>, EmbedError> {
        trace!("POST {} ({} bytes)", self.url, text.len());

        let req = EmbedRequest {
            model: &self.model,
            prompt: text,
        };
        let resp = self.http.post(&self.url).json(&req).send().await?;

        let status = resp.status();
        if status != StatusCode::OK {
            let body = resp
                .text()
                .await
                .unwrap_or_else(|_| "<failed to read body>".into());
            if is_input_too_large(&body) {
                debug!("embedding input rejected as too large ({status})");
                return Ok(None);
            }
            return Err(EmbedError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: EmbedResponse = resp.json().await?;
        if parsed.embedding.is_empty() {
            debug!("embedding service returned no vector");
            return Ok(None);
        }
        Ok(Some(parsed.embedding))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oversize_signatures_match() {
        assert!(is_input_too_large("input is too large for this model"));
        assert!(is_input_too_large(
            "{\"error\":\"Input length exceeds the context window\"}"
        ));
        assert!(is_input_too_large("PROMPT TOO LARGE"));
    }

    #[test]
    fn other_bodies_do_not_match() {
        assert!(!is_input_too_large("model not found"));
        assert!(!is_input_too_large("internal server error"));
        assert!(!is_input_too_large(""));
    }
}
