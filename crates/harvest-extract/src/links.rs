//! Same-site link collection.
//!
//! Anchors are read in document order, canonicalized with
//! [`normalize_url`], filtered against an allow-list of hosts and
//! deduplicated until the caller's limit is reached.

use crate::error::{ExtractError, Result};
use crate::normalize::{canonical_host, normalize_url};
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use std::collections::HashSet;
use tracing::{debug, trace};
use url::Url;

static ANCHOR_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("valid anchor selector"));

/// Whether `url`'s host is one of `allowed_hosts` or a subdomain of one.
///
/// Both sides are lower-cased with a leading `www.` removed. Matching is
/// dot-bounded: `sub.example.com` matches `example.com`, `evilexample.com`
/// does not.
pub fn same_host<I, S>(url: &str, allowed_hosts: I) -> bool
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let Some(host) = host_of(url) else {
        return false;
    };

    allowed_hosts
        .into_iter()
        .filter_map(|allowed| allowed_host(allowed.as_ref()))
        .any(|allowed| host_matches(&host, &allowed))
}

/// Collect up to `limit` distinct normalized same-site links from `html`.
///
/// # Errors
/// Returns [`ExtractError::InvalidArgument`] when `limit` is zero.
pub fn collect_links<I, S>(html: &str, allowed_hosts: I, limit: usize) -> Result<Vec<String>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    Ok(LinkCollector::new(allowed_hosts, limit)?.collect(html))
}

/// Reusable link collector bound to an allow-list and a limit.
#[derive(Debug, Clone)]
pub struct LinkCollector {
    allowed_hosts: Vec<String>,
    limit: usize,
    base_url: Option<Url>,
}

impl LinkCollector {
    /// Create a collector.
    ///
    /// Allowed hosts are canonicalized once here; blank entries are ignored.
    ///
    /// # Errors
    /// Returns [`ExtractError::InvalidArgument`] when `limit` is zero.
    pub fn new<I, S>(allowed_hosts: I, limit: usize) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if limit == 0 {
            return Err(ExtractError::InvalidArgument {
                name: "limit",
                reason: "link limit must be at least 1".to_string(),
            });
        }

        let mut seen = HashSet::new();
        let allowed_hosts = allowed_hosts
            .into_iter()
            .filter_map(|host| allowed_host(host.as_ref()))
            .filter(|host| seen.insert(host.clone()))
            .collect();

        Ok(Self {
            allowed_hosts,
            limit,
            base_url: None,
        })
    }

    /// Resolve relative hrefs against the URL the page was loaded from.
    ///
    /// An unparseable base is ignored and hrefs are used as written.
    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        match Url::parse(base_url.trim()) {
            Ok(base) => self.base_url = Some(base),
            Err(e) => debug!(base_url, error = %e, "ignoring unparseable base url"),
        }
        self
    }

    /// The canonical allow-list this collector filters against.
    #[must_use]
    pub fn allowed_hosts(&self) -> &[String] {
        &self.allowed_hosts
    }

    /// Maximum number of links returned per page.
    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Whether an already-normalized URL passes the host filter.
    #[must_use]
    pub fn matches(&self, url: &str) -> bool {
        host_of(url).is_some_and(|host| {
            self.allowed_hosts
                .iter()
                .any(|allowed| host_matches(&host, allowed))
        })
    }

    /// Collect the first `limit` qualifying links of `html` in document order.
    ///
    /// Markup without anchors, or garbage that parses to nothing, yields an
    /// empty list.
    #[must_use]
    pub fn collect(&self, html: &str) -> Vec<String> {
        let document = Html::parse_document(html);
        let mut seen = HashSet::new();
        let mut links = Vec::new();

        for element in document.select(&ANCHOR_SELECTOR) {
            let Some(href) = element.value().attr("href").map(str::trim) else {
                continue;
            };
            if href.is_empty() {
                continue;
            }

            let normalized = normalize_url(&self.resolve(href));
            if !self.matches(&normalized) {
                trace!(url = %normalized, "skipping off-site link");
                continue;
            }

            if seen.insert(normalized.clone()) {
                links.push(normalized);
                if links.len() >= self.limit {
                    break;
                }
            }
        }

        debug!(
            count = links.len(),
            limit = self.limit,
            "collected same-site links"
        );

        links
    }

    fn resolve(&self, href: &str) -> String {
        match &self.base_url {
            Some(base) => base
                .join(href)
                .map(String::from)
                .unwrap_or_else(|_| href.to_string()),
            None => href.to_string(),
        }
    }
}

fn host_of(url: &str) -> Option<String> {
    let parsed = Url::parse(url.trim()).ok()?;
    let host = parsed.host_str()?;
    let host = canonical_host(host.trim_end_matches('.'));
    (!host.is_empty()).then_some(host)
}

fn allowed_host(host: &str) -> Option<String> {
    let host = canonical_host(host.trim().trim_end_matches('.'));
    (!host.is_empty()).then_some(host)
}

fn host_matches(host: &str, allowed: &str) -> bool {
    host == allowed
        || host
            .strip_suffix(allowed)
            .is_some_and(|prefix| prefix.ends_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_host_exact_and_subdomain() {
        assert!(same_host("https://example.com/x", ["example.com"]));
        assert!(same_host("https://sub.example.com/x", ["example.com"]));
        assert!(same_host("https://www.example.com/x", ["example.com"]));
        assert!(same_host("https://example.com/x", ["www.example.com"]));
    }

    #[test]
    fn test_same_host_rejects_suffix_collision() {
        assert!(!same_host("https://evilexample.com", ["example.com"]));
        assert!(!same_host("https://evil.com", ["example.com"]));
        assert!(!same_host("https://example.com.evil.net", ["example.com"]));
    }

    #[test]
    fn test_same_host_is_case_insensitive() {
        assert!(same_host("https://Journals.PLOS.org/plosone", ["plos.org"]));
        assert!(same_host("https://plos.org", ["PLOS.ORG"]));
    }

    #[test]
    fn test_same_host_without_host() {
        assert!(!same_host("mailto:a@example.com", ["example.com"]));
        assert!(!same_host("not a url", ["example.com"]));
        assert!(!same_host("https://example.com", Vec::<String>::new()));
        assert!(!same_host("https://example.com", [""]));
    }

    #[test]
    fn test_www_only_stripped_as_prefix() {
        assert!(!same_host("https://wwwexample.com", ["example.com"]));
        assert!(same_host("https://awww.example.org", ["awww.example.org"]));
    }

    #[test]
    fn test_zero_limit_is_invalid() {
        let err = collect_links("<a href='https://example.com'>x</a>", ["example.com"], 0)
            .expect_err("zero limit rejected");
        assert!(matches!(err, ExtractError::InvalidArgument { name: "limit", .. }));
    }

    #[test]
    fn test_collect_filters_normalizes_and_dedups() {
        let html = r#"
            <a href="https://www.example.com/a?utm_source=x">A</a>
            <a href="https://example.com/a#top">A again</a>
            <a href="https://other.org/b">Other</a>
            <a href="https://sub.example.com/c/">C</a>
            <a href="mailto:x@example.com">Mail</a>
            <a>no href</a>
        "#;

        let links = collect_links(html, ["example.com"], 10).expect("collect");
        assert_eq!(
            links,
            vec!["https://example.com/a", "https://sub.example.com/c"]
        );
    }

    #[test]
    fn test_collect_stops_at_limit() {
        let html: String = (0..50)
            .map(|i| format!("<a href=\"https://example.com/article/{i}\">{i}</a>"))
            .collect();

        let links = collect_links(&html, ["example.com"], 10).expect("collect");
        assert_eq!(links.len(), 10);
        assert_eq!(links[0], "https://example.com/article/0");
        assert_eq!(links[9], "https://example.com/article/9");
    }

    #[test]
    fn test_duplicates_do_not_count_toward_limit() {
        let html = r#"
            <a href="https://example.com/1">1</a>
            <a href="https://example.com/1/">1</a>
            <a href="https://www.example.com/1">1</a>
            <a href="https://example.com/2">2</a>
        "#;

        let links = collect_links(html, ["example.com"], 2).expect("collect");
        assert_eq!(links, vec!["https://example.com/1", "https://example.com/2"]);
    }

    #[test]
    fn test_relative_links_resolved_against_base() {
        let html = r#"
            <a href="/journal/issue-3">Issue</a>
            <a href="../about">About</a>
            <a href="https://elsewhere.net/">Off-site</a>
        "#;

        let collector = LinkCollector::new(["example.com"], 5)
            .expect("collector")
            .with_base_url("https://www.example.com/journal/current/");
        assert_eq!(
            collector.collect(html),
            vec![
                "https://example.com/journal/issue-3",
                "https://example.com/journal/about"
            ]
        );
    }

    #[test]
    fn test_garbage_html_yields_nothing() {
        let links = collect_links("<<<>>> not html at all", ["example.com"], 3).expect("collect");
        assert!(links.is_empty());
        let links = collect_links("", ["example.com"], 3).expect("collect");
        assert!(links.is_empty());
    }
}
