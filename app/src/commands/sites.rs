//! Site catalogue listing.

use crate::error::CommandError;
use crate::state::AppState;
use harvest_sites::{RuleDefinition, SiteDefinition};
use serde::Serialize;

/// A site as shown to the user.
#[derive(Debug, Clone, Serialize)]
pub struct SiteSummary {
    /// Site label
    pub label: String,
    /// Normalized allowed hosts
    pub hosts: Vec<String>,
    /// Landing page
    pub base_url: String,
    /// Whether the site has a search URL template
    pub searchable: bool,
}

impl From<&SiteDefinition> for SiteSummary {
    fn from(site: &SiteDefinition) -> Self {
        SiteSummary {
            label: site.label.clone(),
            hosts: site.allowed_hosts(),
            base_url: site.base_url.clone(),
            searchable: site.search_url_template.is_some(),
        }
    }
}

/// A rule and its sites.
#[derive(Debug, Clone, Serialize)]
pub struct RuleSummary {
    /// Rule label
    pub label: String,
    /// Sites in catalogue order
    pub sites: Vec<SiteSummary>,
}

impl From<&RuleDefinition> for RuleSummary {
    fn from(rule: &RuleDefinition) -> Self {
        RuleSummary {
            label: rule.label.clone(),
            sites: rule.sites.iter().map(SiteSummary::from).collect(),
        }
    }
}

/// List the rule labelled `rule`, or `scraping.default_rule`, or every rule
/// when neither is set.
pub fn list_sites(state: &AppState, rule: Option<&str>) -> Result<Vec<RuleSummary>, CommandError> {
    match rule.or(state.config.scraping.default_rule.as_deref()) {
        Some(label) => Ok(vec![RuleSummary::from(&state.sites.rule(label)?)]),
        None => Ok(state.sites.rules().iter().map(RuleSummary::from).collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use harvest_core::AppConfig;
    use tempfile::TempDir;

    #[test]
    fn test_list_builtin_sites() {
        let dir = TempDir::new().expect("create temp dir");
        let state = AppState::with_records_path(AppConfig::default(), dir.path().join("r.csv"))
            .expect("state");

        let rules = list_sites(&state, None).expect("list sites");
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].label, "Publishers");
        assert_eq!(rules[0].sites.len(), 11);
        assert_eq!(rules[0].sites[9].hosts, vec!["pubs.acs.org", "acs.org"]);
        assert!(!rules[0].sites[0].searchable);
    }

    #[test]
    fn test_list_single_rule() {
        let dir = TempDir::new().expect("create temp dir");
        let mut config = AppConfig::default();
        config.scraping.default_rule = Some("Publishers".to_string());
        let state =
            AppState::with_records_path(config, dir.path().join("r.csv")).expect("state");

        assert_eq!(list_sites(&state, None).expect("default rule").len(), 1);
        let err = list_sites(&state, Some("Nope")).expect_err("unknown rule");
        assert_eq!(err.code, "RULE_NOT_FOUND");
    }
}
