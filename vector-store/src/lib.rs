//! Vector store synchronization over the Qdrant REST API.
//!
//! This crate keeps the store-facing concerns in one place:
//! - Collection lifecycle (optional reset, creation, payload indexes).
//! - Point upsert / delete-by-path / hash lookup / path enumeration.
//! - Retry with exponential backoff for transient failures.
//!
//! The rest of the pipeline depends on the [`PointStore`] trait, not on
//! the HTTP client, so tests can substitute an in-memory store.

mod backoff;
mod client;
mod config;
mod errors;
mod points;

pub use backoff::{BackoffPolicy, retry_with_backoff};
pub use client::{CollectionStatus, QdrantSync};
pub use config::StoreConfig;
pub use errors::StoreError;
pub use points::{Point, PointPayload, point_id};

use std::collections::BTreeSet;

use async_trait::async_trait;

/// Store operations required by the indexing pipeline.
///
/// [`QdrantSync`] is the production implementation.
#[async_trait]
pub trait PointStore: Send + Sync {
    /// Make sure the target collection exists, optionally dropping it first.
    async fn ensure_collection(&self, reset: bool) -> Result<(), StoreError>;

    /// Write a batch of points; a no-op on empty input.
    async fn upsert_points(&self, points: &[Point]) -> Result<(), StoreError>;

    /// Delete every point whose payload path matches.
    async fn delete_by_path(&self, path: &str) -> Result<(), StoreError>;

    /// Stored content hash for a path, if any point for it exists.
    async fn get_file_hash(&self, path: &str) -> Result<Option<String>, StoreError>;

    /// The distinct set of paths currently present in the collection.
    async fn list_all_paths(&self) -> Result<BTreeSet<String>, StoreError>;
}
