//! URL canonicalization.
//!
//! [`normalize_url`] turns any string into a comparable form: lower-case
//! scheme (default `https`) and host, one leading `www.` removed, dot
//! segments and repeated slashes collapsed, tracking query parameters and
//! the fragment dropped, and no trailing slash except on the bare root.
//!
//! Strings with a usable authority go through [`url::Url`]. Everything
//! else is reassembled piecewise so that garbage input still yields a
//! stable string instead of an error.

use url::{form_urlencoded, Url};

/// Query keys dropped in addition to every `utm_*` key.
const TRACKER_KEYS: &[&str] = &[
    "fbclid", "gclid", "dclid", "gbraid", "wbraid", "msclkid", "yclid", "mc_cid", "mc_eid",
];

const TRACKER_PREFIX: &str = "utm_";

const WWW_PREFIX: &str = "www.";

const DEFAULT_SCHEME: &str = "https";

/// Schemes written as `scheme://authority/path` even when the authority is empty.
const NETLOC_SCHEMES: &[&str] = &["http", "https", "ftp", "ws", "wss", "file"];

/// Canonicalize `raw` into a tracker-free, comparable URL string.
///
/// Never fails: input that cannot be parsed as a URL is reassembled on a
/// best-effort basis. Applying the function to its own output returns the
/// same string.
#[must_use]
pub fn normalize_url(raw: &str) -> String {
    let parts = UrlParts::split(raw.trim());

    if parts.has_authority() {
        if let Ok(url) = Url::parse(&parts.to_parseable()) {
            return canonicalize(url);
        }
        tracing::trace!(url = raw, "url did not parse, using best-effort form");
    }

    parts.reassemble()
}

/// Whether a query key carries marketing attribution only.
#[must_use]
pub fn is_tracker_key(key: &str) -> bool {
    let key = key.to_ascii_lowercase();
    key.starts_with(TRACKER_PREFIX) || TRACKER_KEYS.contains(&key.as_str())
}

/// Lower-case a host and remove exactly one leading `www.`.
#[must_use]
pub fn canonical_host(host: &str) -> String {
    let host = host.to_lowercase();
    match host.strip_prefix(WWW_PREFIX) {
        Some(stripped) if !stripped.is_empty() => stripped.to_string(),
        _ => host,
    }
}

/// Authority with its host in canonical form; userinfo and port are kept.
fn canonical_authority(authority: &str) -> String {
    match authority.rsplit_once('@') {
        Some((userinfo, host)) => format!("{userinfo}@{}", canonical_host(host)),
        None => canonical_host(authority),
    }
}

/// Finish a parsed URL whose host was canonicalized before parsing.
fn canonicalize(mut url: Url) -> String {
    url.set_fragment(None);

    if !url.cannot_be_a_base() {
        let path = if url.path().is_empty() {
            "/".to_string()
        } else {
            collapse_path(url.path())
        };
        url.set_path(&path);
    }

    match url.query().map(strip_trackers) {
        Some(query) if !query.is_empty() => url.set_query(Some(&query)),
        _ => url.set_query(None),
    }

    let root = url.path() == "/";
    let mut normalized = String::from(url);
    if !root && normalized.ends_with('/') {
        normalized.pop();
    }
    normalized
}

/// Re-encode a query string without tracker pairs, keeping the order of the rest.
fn strip_trackers(query: &str) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        if !is_tracker_key(&key) {
            serializer.append_pair(&key, &value);
        }
    }
    serializer.finish()
}

/// POSIX-style path normalization without filesystem access.
///
/// Removes `.` and empty segments, resolves `..` against the preceding
/// segment, and never leaves a trailing slash.
fn collapse_path(path: &str) -> String {
    let absolute = path.starts_with('/');
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.last().is_some_and(|last| *last != "..") {
                    segments.pop();
                } else if !absolute {
                    segments.push("..");
                }
            }
            other => segments.push(other),
        }
    }

    let joined = segments.join("/");
    if absolute {
        format!("/{joined}")
    } else if joined.is_empty() {
        ".".to_string()
    } else {
        joined
    }
}

/// Raw components of a URL-ish string, split the way `urlsplit` does.
#[derive(Debug, Default, PartialEq, Eq)]
struct UrlParts<'a> {
    scheme: Option<&'a str>,
    authority: Option<&'a str>,
    path: &'a str,
    query: Option<&'a str>,
}

impl<'a> UrlParts<'a> {
    fn split(input: &'a str) -> Self {
        let without_fragment = input.split('#').next().unwrap_or_default();
        let (rest, query) = match without_fragment.split_once('?') {
            Some((rest, query)) => (rest, Some(query)),
            None => (without_fragment, None),
        };

        let (scheme, rest) = match scheme_end(rest) {
            Some(end) => (Some(&rest[..end]), &rest[end + 1..]),
            None => (None, rest),
        };

        let (authority, path) = if let Some(after) = rest.strip_prefix("//") {
            let end = after.find('/').unwrap_or(after.len());
            (Some(&after[..end]), &after[end..])
        } else if scheme.is_none() && !rest.is_empty() && !rest.starts_with('/') {
            // Host-first input such as "www.example.com/page".
            let end = rest.find('/').unwrap_or(rest.len());
            (Some(&rest[..end]), &rest[end..])
        } else {
            (None, rest)
        };

        Self {
            scheme,
            authority,
            path,
            query,
        }
    }

    fn has_authority(&self) -> bool {
        self.authority.is_some_and(|a| !a.is_empty())
    }

    fn scheme(&self) -> String {
        self.scheme
            .map(str::to_ascii_lowercase)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_SCHEME.to_string())
    }

    /// Parser input with the host already canonical, so the parser's own
    /// host rewriting (IPv4 forms, IDNA) sees the same host on every pass.
    fn to_parseable(&self) -> String {
        let mut out = format!(
            "{}://{}{}",
            self.scheme(),
            self.authority.map(canonical_authority).unwrap_or_default(),
            self.path
        );
        if let Some(query) = self.query {
            out.push('?');
            out.push_str(query);
        }
        out
    }

    /// Piecewise canonical form for strings the URL parser rejects.
    fn reassemble(&self) -> String {
        let scheme = self.scheme();
        let host = self.authority.map(canonical_authority).unwrap_or_default();
        let with_netloc = self.authority.is_some() || NETLOC_SCHEMES.contains(&scheme.as_str());

        let path = if with_netloc {
            absolute_path(self.path)
        } else {
            opaque_path(self.path)
        };

        let mut out = format!("{scheme}:");
        if with_netloc {
            out.push_str("//");
            out.push_str(&host);
        }
        out.push_str(&path);

        if let Some(query) = self.query.map(strip_trackers).filter(|q| !q.is_empty()) {
            out.push('?');
            out.push_str(&query);
        }
        out
    }
}

/// Collapsed absolute path that ends in neither whitespace nor a slash,
/// except for the bare root.
fn absolute_path(path: &str) -> String {
    let mut current = collapse_path(&format!("/{path}"));
    loop {
        let trimmed = current.trim_end();
        if trimmed.len() == current.len() {
            return current;
        }
        current = collapse_path(trimmed);
    }
}

/// Opaque paths (`mailto:`, `tel:`) are kept as written apart from trailing
/// slashes and whitespace.
fn opaque_path(path: &str) -> String {
    let trimmed = path.trim_end_matches(|c: char| c == '/' || c.is_whitespace());
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Byte index of the `:` ending a scheme, if `input` starts with one.
///
/// `host:port` prefixes and dotted names are treated as authorities.
fn scheme_end(input: &str) -> Option<usize> {
    let colon = input.find(':')?;
    let candidate = &input[..colon];
    let mut chars = candidate.chars();

    let starts_alpha = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
    let valid_rest = chars.all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '-');
    let port_follows = input[colon + 1..]
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit());

    (starts_alpha && valid_rest && !port_follows).then_some(colon)
}
