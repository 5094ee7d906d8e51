//! In-memory rule registry with site lookups.

use crate::{
    builtin::builtin_rules,
    definition::{RuleDefinition, SiteDefinition},
    error::{Result, SiteError},
    loader::SiteLoader,
};
use std::sync::{Arc, RwLock};
use tracing::{debug, info};

/// Thread-safe cache of site rules.
///
/// Rules keep their insertion order; inserting a rule whose label already
/// exists replaces it in place.
#[derive(Clone, Debug)]
pub struct SiteRegistry {
    rules: Arc<RwLock<Vec<RuleDefinition>>>,
}

impl SiteRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rules: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Create a registry holding the built-in publisher catalogue.
    #[must_use]
    pub fn builtin() -> Self {
        let registry = Self::new();
        {
            let mut rules = registry
                .rules
                .write()
                .expect("acquire write lock on rules");
            rules.extend(builtin_rules());
        }
        registry
    }

    /// Create a registry holding only the rules found by `loader`.
    pub fn load_from(loader: &SiteLoader) -> Result<Self> {
        let registry = Self::new();
        registry.merge_from(loader)?;
        Ok(registry)
    }

    /// Add every rule found by `loader`, replacing rules with the same label.
    ///
    /// Returns the number of rules merged.
    pub fn merge_from(&self, loader: &SiteLoader) -> Result<usize> {
        let loaded = loader.load_all()?;
        let count = loaded.len();

        let mut rules = self.rules.write().expect("acquire write lock on rules");
        for rule in loaded {
            Self::upsert(&mut rules, rule);
        }

        info!(
            merged = count,
            total = rules.len(),
            dir = %loader.rules_dir().display(),
            "merged site rules"
        );

        Ok(count)
    }

    /// Add or replace a rule after validating it.
    pub fn insert(&self, rule: RuleDefinition) -> Result<()> {
        rule.validate()?;

        let mut rules = self.rules.write().expect("acquire write lock on rules");
        let label = rule.label.clone();
        Self::upsert(&mut rules, rule);

        debug!(rule = %label, "inserted site rule");
        Ok(())
    }

    /// All rules in order.
    #[must_use]
    pub fn rules(&self) -> Vec<RuleDefinition> {
        self.rules
            .read()
            .expect("acquire read lock on rules")
            .clone()
    }

    /// Get a rule by label.
    pub fn rule(&self, label: &str) -> Result<RuleDefinition> {
        let rules = self.rules.read().expect("acquire read lock on rules");

        rules
            .iter()
            .find(|rule| rule.label == label)
            .cloned()
            .ok_or_else(|| SiteError::RuleNotFound {
                label: label.to_string(),
            })
    }

    /// Sites of the rule labelled `label`.
    pub fn sites_for_rule(&self, label: &str) -> Result<Vec<SiteDefinition>> {
        Ok(self.rule(label)?.sites)
    }

    /// First site labelled `label`, searching rules in order.
    pub fn site(&self, label: &str) -> Result<SiteDefinition> {
        let rules = self.rules.read().expect("acquire read lock on rules");

        rules
            .iter()
            .find_map(|rule| rule.site(label))
            .cloned()
            .ok_or_else(|| SiteError::SiteNotFound {
                label: label.to_string(),
            })
    }

    /// Number of rules.
    #[must_use]
    pub fn count(&self) -> usize {
        self.rules.read().expect("acquire read lock on rules").len()
    }

    /// Whether a rule with `label` exists.
    #[must_use]
    pub fn contains(&self, label: &str) -> bool {
        self.rules
            .read()
            .expect("acquire read lock on rules")
            .iter()
            .any(|rule| rule.label == label)
    }

    fn upsert(rules: &mut Vec<RuleDefinition>, rule: RuleDefinition) {
        match rules.iter_mut().find(|existing| existing.label == rule.label) {
            Some(existing) => *existing = rule,
            None => rules.push(rule),
        }
    }
}

impl Default for SiteRegistry {
    fn default() -> Self {
        Self::new()
    }
}
