//! Full-pass and single-file index orchestration.

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use code_chunker::chunk_lines;
use embed_client::Embedder;
use indicatif::{ProgressBar, ProgressStyle};
use services::hash::sha1_hex;
use tracing::{debug, info, warn};
use vector_store::{Point, PointPayload, PointStore, point_id};

use crate::change::{self, FileChange};
use crate::embed::embed_chunks;
use crate::errors::Result;
use crate::outcome::{FileOutcome, PassSummary, SkipReason};
use crate::settings::IndexSettings;

/// Optional per-file metadata from the symbol-extraction side, carried
/// opaquely into every point payload of the file.
#[derive(Clone, Debug, Default)]
pub struct FileMeta {
    pub lang: String,
    pub symbol_names: Vec<String>,
    pub symbol_kinds: Vec<String>,
    pub unity_tags: Vec<String>,
}

/// One file selected for indexing: project-relative path plus its
/// current on-disk byte size. Content is read fresh when the file is
/// actually processed.
#[derive(Clone, Debug)]
pub struct CandidateFile {
    pub path: String,
    pub size: u64,
    pub meta: FileMeta,
}

/// Drives files through change detection, chunking, embedding, and the
/// store.
///
/// One instance owns one collection and is its single writer; running
/// two indexers against the same collection is unsupported.
pub struct Indexer {
    settings: IndexSettings,
    store: Arc<dyn PointStore>,
    embedder: Arc<dyn Embedder>,
}

impl Indexer {
    pub fn new(
        settings: IndexSettings,
        store: Arc<dyn PointStore>,
        embedder: Arc<dyn Embedder>,
    ) -> Self {
        Self {
            settings,
            store,
            embedder,
        }
    }

    pub fn settings(&self) -> &IndexSettings {
        &self.settings
    }

    /// Run a full synchronization pass.
    ///
    /// Ensures the collection, purges points for paths that vanished
    /// from the candidate set, then processes every candidate strictly
    /// sequentially. A failing file is logged and counted; it never
    /// aborts the pass.
    pub async fn full_pass(
        &self,
        root: &Path,
        candidates: &[CandidateFile],
        reset: bool,
    ) -> Result<PassSummary> {
        self.store.ensure_collection(reset).await?;

        let current: BTreeSet<&str> = candidates.iter().map(|c| c.path.as_str()).collect();
        let mut summary = PassSummary::default();

        for stale in self.store.list_all_paths().await? {
            if !current.contains(stale.as_str()) {
                info!("purging points for removed file '{stale}'");
                self.store.delete_by_path(&stale).await?;
                summary.purged_paths += 1;
            }
        }

        let pb = ProgressBar::new(candidates.len() as u64);
        pb.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({eta})",
            )
            .unwrap()
            .progress_chars("##-"),
        );

        for file in candidates {
            match self.index_one(root, file).await {
                Ok(outcome) => {
                    match (outcome.indexed, outcome.reason) {
                        (true, _) => {
                            info!("'{}': indexed {} chunks", file.path, outcome.chunks.unwrap_or(0))
                        }
                        (false, Some(SkipReason::TooLarge)) => {
                            info!("'{}': skipped, too large", file.path)
                        }
                        _ => debug!("'{}': unchanged", file.path),
                    }
                    summary.record(&outcome);
                }
                Err(err) => {
                    warn!("indexing '{}' failed: {err}", file.path);
                    summary.failed += 1;
                }
            }
            pb.inc(1);
        }
        pb.finish_and_clear();

        info!(
            "pass complete: {} indexed, {} unchanged, {} too large, {} failed, {} purged",
            summary.indexed,
            summary.unchanged,
            summary.too_large,
            summary.failed,
            summary.purged_paths
        );
        Ok(summary)
    }

    /// Push one file through the pipeline (the incremental entry point).
    ///
    /// State machine: over the byte cap -> skipped before any I/O or
    /// store call; unchanged hash -> no-op; new or modified -> chunk,
    /// embed with adaptive splitting, upsert.
    pub async fn index_one(&self, root: &Path, file: &CandidateFile) -> Result<FileOutcome> {
        if file.size > self.settings.max_file_bytes {
            debug!(
                "skipping '{}': {} bytes over the {} cap",
                file.path, file.size, self.settings.max_file_bytes
            );
            return Ok(FileOutcome::too_large());
        }

        let text = tokio::fs::read_to_string(root.join(&file.path)).await?;
        let file_hash = sha1_hex(&text);

        if change::classify(self.store.as_ref(), &file.path, &file_hash).await?
            == FileChange::Unchanged
        {
            return Ok(FileOutcome::unchanged());
        }

        let chunks = chunk_lines(
            &text,
            self.settings.max_chunk_lines,
            self.settings.overlap_lines,
        );
        let embedded =
            embed_chunks(self.embedder.as_ref(), chunks, self.settings.overlap_lines).await?;

        let points: Vec<Point> = embedded
            .into_iter()
            .map(|(chunk, vector)| Point {
                id: point_id(&file.path, chunk.start_line, chunk.end_line),
                vector,
                payload: PointPayload {
                    path: file.path.clone(),
                    lang: file.meta.lang.clone(),
                    start_line: chunk.start_line,
                    end_line: chunk.end_line,
                    text: chunk.text,
                    file_hash: file_hash.clone(),
                    symbol_names: file.meta.symbol_names.clone(),
                    symbol_kinds: file.meta.symbol_kinds.clone(),
                    unity_tags: file.meta.unity_tags.clone(),
                },
            })
            .collect();

        let count = points.len();
        self.store.upsert_points(&points).await?;
        debug!("'{}' indexed with {count} chunks", file.path);
        Ok(FileOutcome::indexed(count))
    }
}
