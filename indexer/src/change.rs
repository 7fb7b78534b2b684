//! Content-hash change detection against the store.

use tracing::debug;
use vector_store::{PointStore, StoreError};

/// How a file's current content relates to what the store holds.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FileChange {
    /// Stored hash matches; nothing to do.
    Unchanged,
    /// No points exist for this path yet.
    New,
    /// Stored hash differs; the stale points have already been deleted.
    Modified,
}

/// Classify `path` by comparing `new_hash` against the stored file hash.
///
/// When the hashes differ the stale points are deleted here, before the
/// caller re-indexes, so a path never holds two content versions at once.
///
/// # Errors
/// Store errors propagate once the store's own retry budget is exhausted.
pub async fn classify(
    store: &dyn PointStore,
    path: &str,
    new_hash: &str,
) -> Result<FileChange, StoreError> {
    match store.get_file_hash(path).await? {
        Some(stored) if stored == new_hash => {
            debug!("'{path}' unchanged");
            Ok(FileChange::Unchanged)
        }
        Some(_) => {
            debug!("'{path}' modified; dropping stale points");
            store.delete_by_path(path).await?;
            Ok(FileChange::Modified)
        }
        None => {
            debug!("'{path}' is new");
            Ok(FileChange::New)
        }
    }
}
