//! Store connection and collection configuration.

use crate::errors::StoreError;

/// Configuration for one synchronized collection.
///
/// The distance metric is always cosine; one collection holds one
/// project's points at a single dimensionality.
#[derive(Clone, Debug)]
pub struct StoreConfig {
    /// Qdrant REST endpoint, e.g. `http://localhost:6333`.
    pub url: String,
    /// Target collection name.
    pub collection: String,
    /// Dimensionality of stored vectors.
    pub vector_size: usize,
}

impl StoreConfig {
    pub fn new(url: impl Into<String>, collection: impl Into<String>, vector_size: usize) -> Self {
        Self {
            url: url.into(),
            collection: collection.into(),
            vector_size,
        }
    }

    /// Validates config values.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.url.trim().is_empty() {
            return Err(StoreError::Config("url is empty".into()));
        }
        if self.collection.trim().is_empty() {
            return Err(StoreError::Config("collection is empty".into()));
        }
        if self.vector_size == 0 {
            return Err(StoreError::Config("vector_size must be > 0".into()));
        }
        Ok(())
    }
}
