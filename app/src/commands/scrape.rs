//! Email scraping over saved pages.
//!
//! Pages are read and parsed concurrently, bounded by
//! `scraping.concurrent_pages`, then applied to the store one page at a
//! time in the order they were given.

use crate::error::CommandError;
use crate::state::AppState;
use harvest_extract::extract_emails;
use harvest_store::{CounterSnapshot, RecordMeta};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, warn};

/// Input for [`scrape`].
#[derive(Debug, Clone, Default)]
pub struct ScrapeRequest {
    /// Saved HTML pages
    pub files: Vec<PathBuf>,
    /// Site label used as the journal when `journal` is not given
    pub site: Option<String>,
    /// Journal recorded on every record
    pub journal: Option<String>,
    /// Topic recorded on every record
    pub topic: Option<String>,
    /// Source URL recorded on every record (defaults to the file path)
    pub source_url: Option<String>,
}

/// Outcome for one page.
#[derive(Debug, Clone, Serialize)]
pub struct PageResult {
    /// Page file
    pub file: PathBuf,
    /// Addresses found on the page
    pub found: usize,
    /// Addresses not seen before
    pub added: Vec<String>,
}

/// Outcome of a scrape run.
#[derive(Debug, Clone, Serialize)]
pub struct ScrapeSummary {
    /// Pages processed, in input order
    pub pages: Vec<PageResult>,
    /// Pages that could not be read, with the reason
    pub failed: Vec<(PathBuf, String)>,
    /// Counter values after the run
    pub counters: CounterSnapshot,
}

impl ScrapeSummary {
    /// Total number of new addresses.
    #[must_use]
    pub fn added(&self) -> usize {
        self.pages.iter().map(|page| page.added.len()).sum()
    }
}

/// Extract emails from every page and append them to the store.
///
/// Unreadable pages are reported in [`ScrapeSummary::failed`] and do not
/// stop the run. The history is persisted once all pages are applied.
pub async fn scrape(
    state: &AppState,
    request: ScrapeRequest,
) -> Result<ScrapeSummary, CommandError> {
    if request.files.is_empty() {
        return Err(CommandError::new("NO_INPUT", "No page files given"));
    }

    let site_label = match request.site.as_deref() {
        Some(label) => Some(state.resolve_site(Some(label))?.label),
        None => None,
    };
    let journal = request.journal.clone().or(site_label).unwrap_or_default();
    let topic = request.topic.clone().unwrap_or_default();

    let extracted = extract_pages(&request.files, state.config.scraping.concurrent_pages).await;

    let mut pages = Vec::new();
    let mut failed = Vec::new();

    for (file, result) in request.files.iter().zip(extracted) {
        let emails = match result {
            Ok(emails) => emails,
            Err(reason) => {
                warn!(file = %file.display(), error = %reason, "skipping unreadable page");
                failed.push((file.clone(), reason));
                continue;
            }
        };

        let source_url = request
            .source_url
            .clone()
            .unwrap_or_else(|| file.display().to_string());
        let meta = RecordMeta::new()
            .with_journal(journal.clone())
            .with_topic(topic.clone())
            .with_source_url(source_url);

        let found = emails.len();
        let added = state.store.add_records(emails, &meta);
        state.record_page(added.len());

        pages.push(PageResult {
            file: file.clone(),
            found,
            added: added.into_iter().map(|record| record.email).collect(),
        });
    }

    state.persist()?;

    let summary = ScrapeSummary {
        pages,
        failed,
        counters: state.counters(),
    };

    info!(
        pages = summary.pages.len(),
        failed = summary.failed.len(),
        added = summary.added(),
        "scrape finished"
    );

    Ok(summary)
}

/// Read and parse pages concurrently; results come back in input order.
async fn extract_pages(files: &[PathBuf], concurrency: usize) -> Vec<Result<Vec<String>, String>> {
    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut tasks = JoinSet::new();

    for (index, file) in files.iter().cloned().enumerate() {
        let semaphore = Arc::clone(&semaphore);
        tasks.spawn(async move {
            let _permit = semaphore.acquire_owned().await;
            let result = match tokio::fs::read_to_string(&file).await {
                Ok(html) => tokio::task::spawn_blocking(move || extract_emails(&html))
                    .await
                    .map_err(|e| format!("extraction task failed: {e}")),
                Err(e) => Err(e.to_string()),
            };
            (index, result)
        });
    }

    let mut results: Vec<Result<Vec<String>, String>> = files
        .iter()
        .map(|_| Err("page was not processed".to_string()))
        .collect();

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, result)) => results[index] = result,
            Err(e) => tracing::error!(error = %e, "page task panicked"),
        }
    }

    results
}
