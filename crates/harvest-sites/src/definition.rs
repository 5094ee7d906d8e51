//! Site and rule definition types.
//!
//! A rule groups the publisher sites a user targets together. Rule files
//! are TOML:
//!
//! ```toml
//! label = "Medicine"
//!
//! [[sites]]
//! label = "Cureus"
//! hosts = ["cureus.com"]
//! base_url = "https://www.cureus.com/"
//! search_url_template = "https://www.cureus.com/articles?q={query}"
//! ```

use crate::error::{Result, SiteError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use url::{form_urlencoded, Url};

/// Placeholder replaced by the encoded search terms.
pub const QUERY_PLACEHOLDER: &str = "{query}";

/// One publisher site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteDefinition {
    /// Display label, unique within a rule
    pub label: String,

    /// Hosts whose pages belong to the site (subdomains included)
    pub hosts: Vec<String>,

    /// Landing page
    pub base_url: String,

    /// Search page with a `{query}` placeholder
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_url_template: Option<String>,
}

impl SiteDefinition {
    /// Create a site without a search template.
    pub fn new<I, S>(label: impl Into<String>, hosts: I, base_url: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            label: label.into(),
            hosts: hosts.into_iter().map(Into::into).collect(),
            base_url: base_url.into(),
            search_url_template: None,
        }
    }

    /// Set the search URL template.
    #[must_use]
    pub fn with_search_url_template(mut self, template: impl Into<String>) -> Self {
        self.search_url_template = Some(template.into());
        self
    }

    /// Get the site label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Lower-cased, trimmed, deduplicated hosts for link filtering.
    #[must_use]
    pub fn allowed_hosts(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.hosts
            .iter()
            .map(|host| host.trim().to_lowercase())
            .filter(|host| !host.is_empty())
            .filter(|host| seen.insert(host.clone()))
            .collect()
    }

    /// Search page for `query`, if the site has a template.
    #[must_use]
    pub fn search_url(&self, query: &str) -> Option<String> {
        let template = self.search_url_template.as_deref()?;
        let encoded: String = form_urlencoded::byte_serialize(query.trim().as_bytes()).collect();
        Some(template.replace(QUERY_PLACEHOLDER, &encoded))
    }

    /// Validate label, hosts and base URL.
    pub fn validate(&self) -> Result<()> {
        if self.label.trim().is_empty() {
            return Err(self.invalid("site label cannot be empty"));
        }

        if self.allowed_hosts().is_empty() {
            return Err(self.invalid("at least one host is required"));
        }

        let base = Url::parse(&self.base_url)
            .map_err(|e| self.invalid(&format!("base_url is not a valid URL: {e}")))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(self.invalid("base_url must use http or https"));
        }

        if let Some(template) = &self.search_url_template {
            if !template.contains(QUERY_PLACEHOLDER) {
                return Err(self.invalid("search_url_template must contain {query}"));
            }
        }

        Ok(())
    }

    fn invalid(&self, reason: &str) -> SiteError {
        SiteError::ValidationError {
            label: self.label.clone(),
            reason: reason.to_string(),
        }
    }
}

/// A named group of sites.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleDefinition {
    /// Rule label
    pub label: String,

    /// Sites in display order
    #[serde(default)]
    pub sites: Vec<SiteDefinition>,
}

impl RuleDefinition {
    /// Create a rule.
    pub fn new(label: impl Into<String>, sites: Vec<SiteDefinition>) -> Self {
        Self {
            label: label.into(),
            sites,
        }
    }

    /// Get the rule label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Look up a site of this rule by label.
    #[must_use]
    pub fn site(&self, label: &str) -> Option<&SiteDefinition> {
        self.sites.iter().find(|site| site.label == label)
    }

    /// Validate the rule and every site in it.
    pub fn validate(&self) -> Result<()> {
        if self.label.trim().is_empty() {
            return Err(SiteError::ValidationError {
                label: self.label.clone(),
                reason: "rule label cannot be empty".to_string(),
            });
        }

        if self.sites.is_empty() {
            return Err(SiteError::ValidationError {
                label: self.label.clone(),
                reason: "rule must contain at least one site".to_string(),
            });
        }

        let mut labels = HashSet::new();
        for site in &self.sites {
            site.validate()?;
            if !labels.insert(site.label.as_str()) {
                return Err(SiteError::ValidationError {
                    label: self.label.clone(),
                    reason: format!("duplicate site label '{}'", site.label),
                });
            }
        }

        Ok(())
    }
}
