//! Pipeline configuration.
//!
//! All environment overrides are collected once at the process boundary
//! via [`IndexSettings::from_env`]; the pipeline itself only ever sees
//! the resolved values and never reads the environment.

/// Tunables for one indexing pipeline.
#[derive(Clone, Debug)]
pub struct IndexSettings {
    /// Embedding service base URL.
    pub embedding_url: String,
    /// Embedding model name.
    pub embed_model: String,
    /// Window height in lines for file chunking.
    pub max_chunk_lines: usize,
    /// Lines shared between consecutive windows.
    pub overlap_lines: usize,
    /// Files above this byte size are skipped outright.
    pub max_file_bytes: u64,
    /// Vector store REST endpoint.
    pub vector_store_url: String,
    /// Vector dimensionality of the collection.
    pub vector_size: usize,
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self {
            embedding_url: "http://localhost:11434".into(),
            embed_model: "nomic-embed-text".into(),
            max_chunk_lines: 500,
            overlap_lines: 50,
            max_file_bytes: 1024 * 1024,
            vector_store_url: "http://localhost:6333".into(),
            vector_size: 768,
        }
    }
}

impl IndexSettings {
    /// Apply environment overrides on top of the defaults.
    pub fn from_env() -> Self {
        let mut s = Self::default();
        if let Ok(v) = std::env::var("EMBEDDING_URL") {
            s.embedding_url = v;
        }
        if let Ok(v) = std::env::var("EMBED_MODEL") {
            s.embed_model = v;
        }
        if let Some(v) = env_parse("MAX_CHUNK_LINES") {
            s.max_chunk_lines = v;
        }
        if let Some(v) = env_parse("OVERLAP_LINES") {
            s.overlap_lines = v;
        }
        if let Some(v) = env_parse("MAX_FILE_BYTES") {
            s.max_file_bytes = v;
        }
        if let Ok(v) = std::env::var("VECTOR_STORE_URL") {
            s.vector_store_url = v;
        }
        if let Some(v) = env_parse("VECTOR_SIZE") {
            s.vector_size = v;
        }
        s
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}
