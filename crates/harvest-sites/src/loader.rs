//! Site rule loading from TOML files.
//!
//! Every `*.toml` file below the rules directory holds one
//! [`RuleDefinition`].

use crate::{
    definition::RuleDefinition,
    error::{Result, SiteError},
};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Loader for rule files in a directory tree.
#[derive(Debug, Clone)]
pub struct SiteLoader {
    rules_dir: PathBuf,
}

impl SiteLoader {
    /// Create a loader for `rules_dir`.
    ///
    /// # Errors
    /// Returns [`SiteError::DirectoryNotFound`] if the path is not a directory.
    pub fn new(rules_dir: impl Into<PathBuf>) -> Result<Self> {
        let rules_dir = rules_dir.into();

        if !rules_dir.is_dir() {
            return Err(SiteError::DirectoryNotFound {
                path: rules_dir.display().to_string(),
            });
        }

        Ok(Self { rules_dir })
    }

    /// Directory this loader reads.
    #[must_use]
    pub fn rules_dir(&self) -> &Path {
        &self.rules_dir
    }

    /// Load and validate every rule file, recursing into subdirectories.
    ///
    /// Files that fail to parse or validate are logged and skipped.
    ///
    /// # Errors
    /// Returns error if a directory can't be read.
    pub fn load_all(&self) -> Result<Vec<RuleDefinition>> {
        let mut rules = Vec::new();

        Self::walk_and_load_recursive(&self.rules_dir, &mut rules)?;

        info!(
            count = rules.len(),
            dir = %self.rules_dir.display(),
            "loaded site rules"
        );

        Ok(rules)
    }

    /// Load and validate a single rule file.
    pub fn load_file(path: &Path) -> Result<RuleDefinition> {
        let rule = Self::load_from_path(path)?;
        rule.validate()?;

        debug!(
            path = %path.display(),
            rule = %rule.label(),
            sites = rule.sites.len(),
            "loaded site rule"
        );

        Ok(rule)
    }

    fn walk_and_load_recursive(dir: &Path, rules: &mut Vec<RuleDefinition>) -> Result<()> {
        let mut entries = std::fs::read_dir(dir)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<std::io::Result<Vec<_>>>()?;
        entries.sort();

        for path in entries {
            if path.is_dir() {
                Self::walk_and_load_recursive(&path, rules)?;
            } else if path.extension().and_then(|s| s.to_str()) == Some("toml") {
                match Self::load_file(&path) {
                    Ok(rule) => rules.push(rule),
                    Err(e) => {
                        warn!(
                            path = %path.display(),
                            error = %e,
                            "skipping invalid site rule"
                        );
                    }
                }
            }
        }

        Ok(())
    }

    fn load_from_path(path: &Path) -> Result<RuleDefinition> {
        let contents = std::fs::read_to_string(path).map_err(|e| SiteError::LoadError {
            path: path.display().to_string(),
            source: Box::new(e),
        })?;

        toml::from_str(&contents).map_err(|e| SiteError::ParseError {
            path: path.display().to_string(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_rule_file(dir: &Path, name: &str, label: &str) -> PathBuf {
        std::fs::create_dir_all(dir).expect("create rule dir");
        let path = dir.join(name);

        let content = format!(
            r#"
label = "{label}"

[[sites]]
label = "Example Journal"
hosts = ["journal.example.org"]
base_url = "https://journal.example.org/"
search_url_template = "https://journal.example.org/search?q={{query}}"
"#
        );

        std::fs::write(&path, content).expect("write rule file");
        path
    }

    #[test]
    fn test_loader_new_with_existing_dir() {
        let temp_dir = TempDir::new().expect("create temp dir");
        assert!(SiteLoader::new(temp_dir.path()).is_ok());
    }

    #[test]
    fn test_loader_new_with_missing_dir() {
        let err = SiteLoader::new("/nonexistent/path/to/rules").expect_err("missing dir");
        assert!(matches!(err, SiteError::DirectoryNotFound { .. }));
    }

    #[test]
    fn test_load_file() {
        let temp_dir = TempDir::new().expect("create temp dir");
        let path = write_rule_file(temp_dir.path(), "medicine.toml", "Medicine");

        let rule = SiteLoader::load_file(&path).expect("load rule");
        assert_eq!(rule.label(), "Medicine");
        assert_eq!(
            rule.sites[0].search_url("x y"),
            Some("https://journal.example.org/search?q=x+y".to_string())
        );
    }

    #[test]
    fn test_load_all_recurses() {
        let temp_dir = TempDir::new().expect("create temp dir");
        write_rule_file(temp_dir.path(), "a.toml", "A");
        write_rule_file(&temp_dir.path().join("nested").join("deeper"), "b.toml", "B");
        std::fs::write(temp_dir.path().join("notes.txt"), "ignored").expect("write notes");

        let loader = SiteLoader::new(temp_dir.path()).expect("create loader");
        let rules = loader.load_all().expect("load all");

        let labels: Vec<_> = rules.iter().map(RuleDefinition::label).collect();
        assert_eq!(labels, vec!["A", "B"]);
    }

    #[test]
    fn test_load_all_skips_invalid() {
        let temp_dir = TempDir::new().expect("create temp dir");
        write_rule_file(temp_dir.path(), "valid.toml", "Valid");

        std::fs::write(temp_dir.path().join("broken.toml"), "label = [[[").expect("write broken");
        std::fs::write(
            temp_dir.path().join("empty-rule.toml"),
            "label = \"No sites\"\n",
        )
        .expect("write empty rule");

        let loader = SiteLoader::new(temp_dir.path()).expect("create loader");
        let rules = loader.load_all().expect("load all");

        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].label(), "Valid");
    }
}
