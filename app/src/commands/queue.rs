//! URL queue file maintenance.

use crate::error::CommandError;
use harvest_store::UrlQueue;
use std::path::Path;

/// Append the non-blank lines of `input` to the queue file, each prefixed
/// with `prefix`.
///
/// Returns the queue after the change.
pub fn paste_into_queue(
    queue_path: &Path,
    input: &Path,
    prefix: &str,
) -> Result<UrlQueue, CommandError> {
    let mut queue = open_queue(queue_path)?;
    let text = std::fs::read_to_string(input)?;

    let added = queue.paste(&text, prefix);
    queue.save(queue_path)?;

    tracing::info!(added, total = queue.len(), "pasted urls into queue");
    Ok(queue)
}

/// Remove repeated entries from the queue file.
///
/// Returns the number of entries removed.
pub fn dedup_queue(queue_path: &Path) -> Result<usize, CommandError> {
    let mut queue = open_queue(queue_path)?;
    let removed = queue.dedup();
    queue.save(queue_path)?;
    Ok(removed)
}

/// Read the queue file; a missing file is an empty queue.
pub fn open_queue(queue_path: &Path) -> Result<UrlQueue, CommandError> {
    let mut queue = UrlQueue::new();
    if queue_path.exists() {
        queue.load(queue_path)?;
    }
    Ok(queue)
}
