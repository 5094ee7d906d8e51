//! Ordered list of URLs to visit, with a cursor for previous/next.

use crate::error::Result;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::debug;

/// URL work queue.
///
/// The cursor starts before the first entry; [`UrlQueue::next`] moves onto
/// it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlQueue {
    urls: Vec<String>,
    cursor: Option<usize>,
}

impl UrlQueue {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one entry per non-blank line of `text`, each trimmed and
    /// prefixed with `prefix`. Returns the number of entries added.
    pub fn paste(&mut self, text: &str, prefix: &str) -> usize {
        let before = self.urls.len();
        self.urls.extend(
            text.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(|line| format!("{prefix}{line}")),
        );
        self.urls.len() - before
    }

    /// Append entries not already queued. Returns the number added.
    pub fn extend_unique<I, S>(&mut self, urls: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen: HashSet<String> = self.urls.iter().cloned().collect();
        let before = self.urls.len();
        for url in urls {
            let url = url.into();
            if seen.insert(url.clone()) {
                self.urls.push(url);
            }
        }
        self.urls.len() - before
    }

    /// Remove repeated entries, keeping first occurrences. Returns the
    /// number removed.
    ///
    /// The cursor stays on the same URL.
    pub fn dedup(&mut self) -> usize {
        let current = self.current().map(str::to_string);
        let before = self.urls.len();

        let mut seen = HashSet::new();
        self.urls.retain(|url| seen.insert(url.clone()));

        self.cursor = current.and_then(|url| self.urls.iter().position(|u| *u == url));
        before - self.urls.len()
    }

    /// Move to the next entry and return it; `None` at the end.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<&str> {
        let next = self.cursor.map_or(0, |i| i + 1);
        if next >= self.urls.len() {
            return None;
        }
        self.cursor = Some(next);
        self.current()
    }

    /// Move to the previous entry and return it; `None` at the start.
    pub fn prev(&mut self) -> Option<&str> {
        let prev = self.cursor?.checked_sub(1)?;
        self.cursor = Some(prev);
        self.current()
    }

    /// Entry under the cursor.
    #[must_use]
    pub fn current(&self) -> Option<&str> {
        self.cursor
            .and_then(|i| self.urls.get(i))
            .map(String::as_str)
    }

    /// All entries in order.
    #[must_use]
    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.urls.len()
    }

    /// Whether the queue is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    /// Remove every entry and reset the cursor.
    pub fn clear(&mut self) {
        self.urls.clear();
        self.cursor = None;
    }

    /// Write one entry per line to `path`.
    pub fn save(&self, path: &Path) -> Result<()> {
        let mut contents = self.urls.join("\n");
        if !contents.is_empty() {
            contents.push('\n');
        }
        fs::write(path, contents)?;

        debug!(path = %path.display(), count = self.urls.len(), "saved url queue");
        Ok(())
    }

    /// Append the non-blank lines of `path`. Returns the number added.
    pub fn load(&mut self, path: &Path) -> Result<usize> {
        let contents = fs::read_to_string(path)?;
        let added = self.paste(&contents, "");

        debug!(path = %path.display(), added, "loaded url queue");
        Ok(added)
    }
}
