//! Publisher sites shipped with the application.

use crate::definition::{RuleDefinition, SiteDefinition};

/// Label of the built-in rule.
pub const PUBLISHERS_RULE: &str = "Publishers";

/// The built-in rules.
#[must_use]
pub fn builtin_rules() -> Vec<RuleDefinition> {
    vec![RuleDefinition::new(PUBLISHERS_RULE, publisher_sites())]
}

fn publisher_sites() -> Vec<SiteDefinition> {
    vec![
        SiteDefinition::new(
            "ScienceDirect",
            ["sciencedirect.com"],
            "https://www.sciencedirect.com/",
        ),
        SiteDefinition::new("Springer", ["springer.com"], "https://link.springer.com/"),
        SiteDefinition::new("Wiley", ["wiley.com"], "https://onlinelibrary.wiley.com/"),
        SiteDefinition::new(
            "Taylor & Francis",
            ["tandfonline.com"],
            "https://www.tandfonline.com/",
        ),
        SiteDefinition::new("PLOS ONE", ["plos.org"], "https://journals.plos.org/plosone/"),
        SiteDefinition::new("SAGE Journals", ["sagepub.com"], "https://journals.sagepub.com/"),
        SiteDefinition::new(
            "Oxford Academic",
            ["oup.com", "academic.oup.com"],
            "https://academic.oup.com/",
        ),
        SiteDefinition::new(
            "Research Square",
            ["researchsquare.com"],
            "https://www.researchsquare.com/",
        ),
        SiteDefinition::new("Hindawi", ["hindawi.com"], "https://www.hindawi.com/"),
        SiteDefinition::new(
            "ACS Publications",
            ["pubs.acs.org", "acs.org"],
            "https://pubs.acs.org/",
        ),
        SiteDefinition::new("Cureus", ["cureus.com"], "https://www.cureus.com/"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_rules_are_valid() {
        for rule in builtin_rules() {
            rule.validate().expect("builtin rule is valid");
        }
    }

    #[test]
    fn test_publishers_rule() {
        let rules = builtin_rules();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].label(), PUBLISHERS_RULE);
        assert_eq!(rules[0].sites.len(), 11);

        let oxford = rules[0].site("Oxford Academic").expect("oxford site");
        assert_eq!(oxford.allowed_hosts(), vec!["oup.com", "academic.oup.com"]);
    }
}
