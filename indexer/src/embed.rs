//! Adaptive embedding loop.
//!
//! Chunks drain from an explicit FIFO work-queue rather than recursing:
//! when the model rejects a chunk for size, its two halves go back on the
//! *front* of the queue, so they are retried before the remaining
//! originals and the output keeps file order. Memory stays bounded and
//! the draining order is testable.

use std::collections::VecDeque;

use code_chunker::{Chunk, split_oversized};
use embed_client::{EmbedError, Embedder};
use tracing::debug;

/// Embed `chunks` in order, splitting oversized ones until they fit.
///
/// A rejected chunk at or below the minimum split size is dropped; an
/// unembeddable micro-fragment must not fail the whole file. Any non-size
/// failure aborts the file.
pub async fn embed_chunks(
    embedder: &dyn Embedder,
    chunks: Vec<Chunk>,
    overlap: usize,
) -> Result<Vec<(Chunk, Vec<f32>)>, EmbedError> {
    let mut queue: VecDeque<Chunk> = chunks.into();
    let mut out = Vec::new();

    while let Some(chunk) = queue.pop_front() {
        match embedder.embed(&chunk.text).await? {
            Some(vector) => out.push((chunk, vector)),
            None => match split_oversized(&chunk, overlap) {
                Some((left, right)) => {
                    debug!(
                        "re-splitting oversized chunk {}-{} into {}-{} / {}-{}",
                        chunk.start_line,
                        chunk.end_line,
                        left.start_line,
                        left.end_line,
                        right.start_line,
                        right.end_line
                    );
                    queue.push_front(right);
                    queue.push_front(left);
                }
                None => {
                    debug!(
                        "dropping unembeddable chunk {}-{}",
                        chunk.start_line, chunk.end_line
                    );
                }
            },
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use code_chunker::chunk_lines;

    use super::*;

    /// Rejects chunks above a line budget as oversized.
    struct LineCapEmbedder {
        max_lines: usize,
    }

    #[async_trait]
    impl Embedder for LineCapEmbedder {
        async fn embed(&self, text: &str) -> Result<Option<Vec<f32>>, EmbedError> {
            if text.lines().count() > self.max_lines {
                Ok(None)
            } else {
                Ok(Some(vec![1.0]))
            }
        }
    }

    struct FailingEmbedder;

    #[async_trait]
    impl Embedder for FailingEmbedder {
        async fn embed(&self, _text: &str) -> Result<Option<Vec<f32>>, EmbedError> {
            Err(EmbedError::Status {
                status: 500,
                body: "model crashed".into(),
            })
        }
    }

    fn numbered_lines(n: usize) -> String {
        (1..=n).map(|i| format!("line {i}\n")).collect()
    }

    #[tokio::test]
    async fn split_halves_run_before_remaining_originals() {
        // 25 lines in windows of 20/overlap 3 -> chunks 1-20 and 18-25.
        let chunks = chunk_lines(&numbered_lines(25), 20, 3);
        assert_eq!(chunks.len(), 2);

        let embedder = LineCapEmbedder { max_lines: 10 };
        let embedded = embed_chunks(&embedder, chunks, 3).await.unwrap();

        // 1-20 is rejected and bisected into 1-10 and 8-20; the right
        // half is still over budget and, at 13 lines, is dropped.
        let spans: Vec<(usize, usize)> = embedded
            .iter()
            .map(|(c, _)| (c.start_line, c.end_line))
            .collect();
        assert_eq!(spans, vec![(1, 10), (18, 25)]);
    }

    #[tokio::test]
    async fn oversized_chunks_recurse_until_they_fit() {
        let chunks = chunk_lines(&numbered_lines(100), 100, 10);
        let embedder = LineCapEmbedder { max_lines: 30 };
        let embedded = embed_chunks(&embedder, chunks, 10).await.unwrap();

        assert!(!embedded.is_empty());
        for (chunk, _) in &embedded {
            assert!(chunk.line_count() <= 30);
        }
        // The embedded spans still cover the whole file.
        assert_eq!(embedded.first().unwrap().0.start_line, 1);
        assert_eq!(embedded.last().unwrap().0.end_line, 100);
    }

    #[tokio::test]
    async fn non_size_failure_aborts() {
        let chunks = chunk_lines(&numbered_lines(10), 5, 1);
        let result = embed_chunks(&FailingEmbedder, chunks, 1).await;
        assert!(matches!(result, Err(EmbedError::Status { status: 500, .. })));
    }
}
