//! Same-site link collection from a saved page.

use crate::error::CommandError;
use crate::state::AppState;
use harvest_extract::LinkCollector;
use harvest_store::UrlQueue;
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

/// Input for [`collect_links`].
#[derive(Debug, Clone, Default)]
pub struct LinksRequest {
    /// Saved HTML page
    pub file: PathBuf,
    /// Site whose hosts are allowed (defaults to `scraping.default_site`)
    pub site: Option<String>,
    /// URL the page was loaded from (defaults to the site's base URL)
    pub base_url: Option<String>,
    /// Maximum number of links (defaults to `scraping.link_limit`)
    pub limit: Option<usize>,
    /// Queue file the links are appended to
    pub queue: Option<PathBuf>,
}

/// Outcome of a link collection.
#[derive(Debug, Clone, Serialize)]
pub struct LinksSummary {
    /// Site the links were filtered for
    pub site: String,
    /// Collected links in document order
    pub links: Vec<String>,
    /// Links newly appended to the queue file
    pub queued: usize,
}

/// Collect same-site links from a page and optionally queue them.
pub fn collect_links(state: &AppState, request: &LinksRequest) -> Result<LinksSummary, CommandError> {
    let site = state.resolve_site(request.site.as_deref())?;
    let limit = request.limit.unwrap_or(state.config.scraping.link_limit);
    let base_url = request.base_url.as_deref().unwrap_or(&site.base_url);

    let html = std::fs::read_to_string(&request.file)?;
    let links = LinkCollector::new(site.allowed_hosts(), limit)?
        .with_base_url(base_url)
        .collect(&html);

    let queued = match &request.queue {
        Some(path) => {
            let mut queue = UrlQueue::new();
            if path.exists() {
                queue.load(path)?;
            }
            let added = queue.extend_unique(links.iter().cloned());
            queue.save(path)?;
            added
        }
        None => 0,
    };

    info!(
        site = %site.label,
        links = links.len(),
        queued,
        "collected links"
    );

    Ok(LinksSummary {
        site: site.label,
        links,
        queued,
    })
}
