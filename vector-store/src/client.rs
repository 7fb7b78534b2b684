//! REST client for the vector store.
//!
//! Concentrates every HTTP interaction with Qdrant behind a minimal API,
//! keeping the rest of the pipeline decoupled from the wire format. Each
//! operation rebuilds its request per attempt and goes through the
//! retrying wrapper in [`crate::backoff`].

use std::collections::BTreeSet;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use crate::PointStore;
use crate::backoff::{BackoffPolicy, retry_with_backoff};
use crate::config::StoreConfig;
use crate::errors::StoreError;
use crate::points::Point;

/// Fields receiving a payload index at collection creation.
///
/// Keyword indexes serve exact-match filters; text indexes serve
/// free-form symbol lookups.
const PAYLOAD_INDEXES: &[(&str, &str)] = &[
    ("path", "keyword"),
    ("lang", "keyword"),
    ("file_hash", "keyword"),
    ("symbol_names", "text"),
    ("symbol_kinds", "keyword"),
    ("symbol_references", "text"),
    ("unity_tags", "keyword"),
];

/// Page size used when scrolling the full collection.
const SCROLL_PAGE: usize = 256;

/// A collection name with its current point count.
#[derive(Clone, Debug, Serialize)]
pub struct CollectionStatus {
    pub name: String,
    pub points: u64,
}

/// Synchronization client for one collection.
///
/// The HTTP client is passed in so callers share one connection pool and
/// tests can point it at a fake server.
pub struct QdrantSync {
    http: reqwest::Client,
    cfg: StoreConfig,
    policy: BackoffPolicy,
}

impl QdrantSync {
    /// Creates a new client from the given configuration.
    ///
    /// # Errors
    /// Returns `StoreError::Config` for an invalid configuration.
    pub fn new(http: reqwest::Client, cfg: StoreConfig) -> Result<Self, StoreError> {
        cfg.validate()?;
        Ok(Self {
            http,
            cfg,
            policy: BackoffPolicy::standard(),
        })
    }

    fn base(&self) -> &str {
        self.cfg.url.trim_end_matches('/')
    }

    fn collection_url(&self, rest: &str) -> String {
        format!("{}/collections/{}{rest}", self.base(), self.cfg.collection)
    }

    /// One retried request; non-success statuses carry the response body.
    async fn call(
        &self,
        label: &str,
        build: impl Fn() -> reqwest::RequestBuilder,
    ) -> Result<Value, StoreError> {
        retry_with_backoff(&self.policy, label, || {
            let req = build();
            async move {
                let resp = req.send().await?;
                let status = resp.status();
                if !status.is_success() {
                    let body = resp
                        .text()
                        .await
                        .unwrap_or_else(|_| "<failed to read body>".into());
                    return Err(StoreError::Status {
                        status: status.as_u16(),
                        body,
                    });
                }
                Ok(resp.json::<Value>().await?)
            }
        })
        .await
    }

    async fn collection_names(&self) -> Result<Vec<String>, StoreError> {
        let url = format!("{}/collections", self.base());
        let v = self.call("list_collections", || self.http.get(&url)).await?;
        let names = v["result"]["collections"]
            .as_array()
            .map(|arr| {
                arr.iter()
                    .filter_map(|c| c["name"].as_str().map(str::to_owned))
                    .collect()
            })
            .unwrap_or_default();
        Ok(names)
    }

    /// Create the fixed payload indexes, best-effort.
    ///
    /// Search still works without an index, only slower, so a failure
    /// here is logged and swallowed.
    async fn create_payload_indexes(&self) {
        for (field, schema) in PAYLOAD_INDEXES {
            let body = json!({ "field_name": field, "field_schema": schema });
            let result = self
                .call("create_payload_index", || {
                    self.http.put(self.collection_url("/index")).json(&body)
                })
                .await;
            if let Err(err) = result {
                warn!("payload index '{field}' not created: {err}");
            }
        }
    }

    /// Make sure the target collection exists.
    ///
    /// With `reset`, the collection is dropped first (best-effort). A
    /// missing collection is created with the configured vector size and
    /// cosine distance, then indexed.
    pub async fn ensure_collection(&self, reset: bool) -> Result<(), StoreError> {
        if reset {
            // Best-effort drop; a missing collection is not an error here.
            if let Err(err) = self
                .call("delete_collection", || {
                    self.http.delete(self.collection_url(""))
                })
                .await
            {
                debug!("collection drop skipped: {err}");
            }
        }

        if self
            .collection_names()
            .await?
            .iter()
            .any(|n| n == &self.cfg.collection)
        {
            debug!("collection '{}' already exists", self.cfg.collection);
            return Ok(());
        }

        info!(
            "creating collection '{}' (size={}, distance=Cosine)",
            self.cfg.collection, self.cfg.vector_size
        );
        let body = json!({
            "vectors": { "size": self.cfg.vector_size, "distance": "Cosine" }
        });
        self.call("create_collection", || {
            self.http.put(self.collection_url("")).json(&body)
        })
        .await?;

        self.create_payload_indexes().await;
        Ok(())
    }

    /// Upsert a batch of points in one write, waiting for visibility.
    pub async fn upsert_points(&self, points: &[Point]) -> Result<(), StoreError> {
        if points.is_empty() {
            debug!("no points provided for upsert");
            return Ok(());
        }
        info!(
            "upserting {} points into '{}'",
            points.len(),
            self.cfg.collection
        );
        let body = json!({ "points": points });
        self.call("upsert_points", || {
            self.http
                .put(self.collection_url("/points?wait=true"))
                .json(&body)
        })
        .await?;
        Ok(())
    }

    /// Delete every point whose payload path matches.
    pub async fn delete_by_path(&self, path: &str) -> Result<(), StoreError> {
        debug!("deleting points for '{path}'");
        let body = json!({ "filter": path_filter(path) });
        self.call("delete_by_path", || {
            self.http
                .post(self.collection_url("/points/delete?wait=true"))
                .json(&body)
        })
        .await?;
        Ok(())
    }

    /// Stored content hash for a path: a single-row, payload-only lookup.
    pub async fn get_file_hash(&self, path: &str) -> Result<Option<String>, StoreError> {
        let body = json!({
            "filter": path_filter(path),
            "limit": 1,
            "with_payload": { "include": ["file_hash"] },
            "with_vector": false,
        });
        let v = self
            .call("get_file_hash", || {
                self.http
                    .post(self.collection_url("/points/scroll"))
                    .json(&body)
            })
            .await?;
        Ok(v["result"]["points"][0]["payload"]["file_hash"]
            .as_str()
            .map(str::to_owned))
    }

    /// The distinct set of paths currently present in the collection,
    /// accumulated over a paginated scroll.
    pub async fn list_all_paths(&self) -> Result<BTreeSet<String>, StoreError> {
        let mut paths = BTreeSet::new();
        let mut offset: Option<Value> = None;

        loop {
            let mut body = json!({
                "limit": SCROLL_PAGE,
                "with_payload": { "include": ["path"] },
                "with_vector": false,
            });
            if let Some(cursor) = &offset {
                body["offset"] = cursor.clone();
            }
            let v = self
                .call("list_all_paths", || {
                    self.http
                        .post(self.collection_url("/points/scroll"))
                        .json(&body)
                })
                .await?;

            if let Some(points) = v["result"]["points"].as_array() {
                for p in points {
                    if let Some(path) = p["payload"]["path"].as_str() {
                        paths.insert(path.to_owned());
                    }
                }
            }

            match &v["result"]["next_page_offset"] {
                Value::Null => break,
                cursor => offset = Some(cursor.clone()),
            }
        }

        debug!(
            "collection '{}' holds {} distinct paths",
            self.cfg.collection,
            paths.len()
        );
        Ok(paths)
    }

    /// Enumerate all collections with their point counts.
    ///
    /// A count failure yields 0 for that collection rather than an abort.
    pub async fn list_collections_extended(&self) -> Result<Vec<CollectionStatus>, StoreError> {
        let names = self.collection_names().await?;
        let mut out = Vec::with_capacity(names.len());
        for name in names {
            let url = format!("{}/collections/{name}/points/count", self.base());
            let body = json!({ "exact": true });
            let points = match self
                .call("count_points", || self.http.post(&url).json(&body))
                .await
            {
                Ok(v) => v["result"]["count"].as_u64().unwrap_or(0),
                Err(err) => {
                    warn!("point count for '{name}' failed: {err}");
                    0
                }
            };
            out.push(CollectionStatus { name, points });
        }
        Ok(out)
    }
}

#[async_trait]
impl PointStore for QdrantSync {
    async fn ensure_collection(&self, reset: bool) -> Result<(), StoreError> {
        QdrantSync::ensure_collection(self, reset).await
    }

    async fn upsert_points(&self, points: &[Point]) -> Result<(), StoreError> {
        QdrantSync::upsert_points(self, points).await
    }

    async fn delete_by_path(&self, path: &str) -> Result<(), StoreError> {
        QdrantSync::delete_by_path(self, path).await
    }

    async fn get_file_hash(&self, path: &str) -> Result<Option<String>, StoreError> {
        QdrantSync::get_file_hash(self, path).await
    }

    async fn list_all_paths(&self) -> Result<BTreeSet<String>, StoreError> {
        QdrantSync::list_all_paths(self).await
    }
}

/// Filter matching every point of one payload path.
fn path_filter(path: &str) -> Value {
    json!({ "must": [ { "key": "path", "match": { "value": path } } ] })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_filter_shape() {
        let f = path_filter("Assets/Player.cs");
        assert_eq!(f["must"][0]["key"], "path");
        assert_eq!(f["must"][0]["match"]["value"], "Assets/Player.cs");
    }

    #[test]
    fn rejects_invalid_config() {
        let result = QdrantSync::new(
            reqwest::Client::new(),
            StoreConfig::new("http://localhost:6333", "", 768),
        );
        assert!(matches!(result, Err(StoreError::Config(_))));
    }

    #[test]
    fn every_indexed_field_has_a_schema() {
        for (field, schema) in PAYLOAD_INDEXES {
            assert!(!field.is_empty());
            assert!(matches!(*schema, "keyword" | "text"));
        }
    }
}
