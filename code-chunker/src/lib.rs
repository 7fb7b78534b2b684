//! Line-window chunking for embedding input.
//!
//! Goals:
//! - Produce stable, overlapping line windows with correct file-level spans.
//! - Preserve source bytes exactly (windows are built over `split_inclusive`,
//!   so line terminators survive).
//! - Support bisection of windows the embedding model rejects for size,
//!   down to a floor below which a fragment is considered unrecoverable.
//!
//! This module is language-agnostic and does no I/O.

use tracing::{debug, trace};

/// Windows at or below this many lines are never split further.
pub const MIN_SPLIT_LINES: usize = 15;

/// One overlap-bearing line-range slice of a file.
///
/// `start_line`/`end_line` are 1-based and inclusive; `text` holds the
/// exact source bytes of those lines.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Chunk {
    pub start_line: usize,
    pub end_line: usize,
    pub text: String,
}

impl Chunk {
    /// Number of source lines covered by this chunk.
    pub fn line_count(&self) -> usize {
        self.end_line - self.start_line + 1
    }
}

/// Split `text` into overlapping windows of at most `max_lines` lines.
///
/// Consecutive windows share `overlap` lines: the next window starts at
/// `max(prev_end - overlap, prev_start + 1)` (0-based), which guarantees
/// forward progress even when `overlap >= max_lines`. The final window
/// always ends at end-of-file.
///
/// Invalid inputs (empty text, `max_lines == 0`) return an empty vector.
pub fn chunk_lines(text: &str, max_lines: usize, overlap: usize) -> Vec<Chunk> {
    if text.is_empty() || max_lines == 0 {
        trace!("chunk_lines: empty text or zero max_lines; nothing to do");
        return Vec::new();
    }

    let lines: Vec<&str> = text.split_inclusive('\n').collect();
    let total = lines.len();

    let mut out = Vec::new();
    let mut start = 0usize;

    loop {
        let end = (start + max_lines).min(total);
        out.push(Chunk {
            start_line: start + 1,
            end_line: end,
            text: lines[start..end].concat(),
        });
        if end == total {
            break;
        }
        start = end.saturating_sub(overlap).max(start + 1);
    }

    debug!(
        "chunk_lines: {} lines -> {} windows (max_lines={}, overlap={})",
        total,
        out.len(),
        max_lines,
        overlap
    );
    out
}

/// Bisect a chunk the embedding model rejected for size.
///
/// The halves share `min(overlap, lines / 4)` lines and their union covers
/// the original range. Returns `None` for chunks at or below
/// [`MIN_SPLIT_LINES`]; such fragments are unrecoverable.
pub fn split_oversized(chunk: &Chunk, overlap: usize) -> Option<(Chunk, Chunk)> {
    let lines: Vec<&str> = chunk.text.split_inclusive('\n').collect();
    let total = lines.len();
    if total <= MIN_SPLIT_LINES {
        return None;
    }

    let mid = total / 2;
    let shared = overlap.min(total / 4);

    let left = Chunk {
        start_line: chunk.start_line,
        end_line: chunk.start_line + mid - 1,
        text: lines[..mid].concat(),
    };
    let right = Chunk {
        start_line: chunk.start_line + mid - shared,
        end_line: chunk.end_line,
        text: lines[mid - shared..].concat(),
    };

    trace!(
        "split_oversized: {}-{} -> {}-{} / {}-{} (shared={})",
        chunk.start_line,
        chunk.end_line,
        left.start_line,
        left.end_line,
        right.start_line,
        right.end_line,
        shared
    );
    Some((left, right))
}
