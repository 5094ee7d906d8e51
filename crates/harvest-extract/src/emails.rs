//! Email discovery over rendered page markup.
//!
//! Addresses declared in `mailto:` anchors come first, followed by
//! addresses found in the page's visible text. Everything is lower-cased
//! and deduplicated keeping the first occurrence.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Node, Selector};
use std::collections::HashSet;
use tracing::debug;

const EMAIL_PATTERN: &str = r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[A-Za-z]{2,}";

const MAILTO_PREFIX: &str = "mailto:";

/// Elements whose text is code or inert markup rather than page text.
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "template"];

static EMAIL_SEARCH: Lazy<Regex> = Lazy::new(|| Regex::new(EMAIL_PATTERN).expect("valid regex"));

static EMAIL_EXACT: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!("^(?:{EMAIL_PATTERN})$")).expect("valid regex"));

static ANCHOR_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("valid anchor selector"));

/// Extract unique, lower-cased email addresses from `html`.
///
/// `mailto:` sources take precedence in the ordering. Markup with no
/// addresses, including empty or garbage input, yields an empty list.
#[must_use]
pub fn extract_emails(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);

    let declared = mailto_addresses(&document);
    let text = visible_text(&document);
    let found = EMAIL_SEARCH.find_iter(&text).map(|m| m.as_str().to_string());

    let declared_count = declared.len();
    let emails = dedup_lowercase(declared.into_iter().chain(found));

    debug!(
        count = emails.len(),
        mailto = declared_count,
        "extracted emails"
    );

    emails
}

/// Whether `candidate` is a complete email address, with nothing around it.
#[must_use]
pub fn is_valid_email(candidate: &str) -> bool {
    EMAIL_EXACT.is_match(candidate)
}

fn mailto_addresses(document: &Html) -> Vec<String> {
    document
        .select(&ANCHOR_SELECTOR)
        .filter_map(|anchor| anchor.value().attr("href"))
        .filter_map(mailto_target)
        .filter(|address| is_valid_email(address))
        .map(str::to_string)
        .collect()
}

/// The address part of a `mailto:` href, without mail-client parameters.
fn mailto_target(href: &str) -> Option<&str> {
    let href = href.trim();
    let prefix = href.get(..MAILTO_PREFIX.len())?;
    if !prefix.eq_ignore_ascii_case(MAILTO_PREFIX) {
        return None;
    }

    let rest = &href[MAILTO_PREFIX.len()..];
    let address = rest.split('?').next().unwrap_or_default().trim();
    (!address.is_empty()).then_some(address)
}

/// Text nodes outside hidden elements, joined with single spaces.
fn visible_text(document: &Html) -> String {
    let mut chunks: Vec<&str> = Vec::new();

    for node in document.tree.root().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };

        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|element| HIDDEN_ELEMENTS.contains(&element.name()))
        });
        if hidden {
            continue;
        }

        let text = text.trim();
        if !text.is_empty() {
            chunks.push(text);
        }
    }

    chunks.join(" ")
}

fn dedup_lowercase<I>(emails: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    emails
        .into_iter()
        .map(|email| email.to_lowercase())
        .filter(|email| seen.insert(email.clone()))
        .collect()
}
