//! Configuration management for Harvest.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides.

use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main application configuration.
///
/// This is loaded from `~/.config/harvest/config.toml` (or platform equivalent).
/// If the file doesn't exist, default values are used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Link collection and page scraping settings
    pub scraping: ScrapingConfig,
    /// URL work queue settings
    pub queue: QueueConfig,
    /// Export settings
    pub export: ExportConfig,
    /// Site catalogue settings
    pub sites: SitesConfig,
    /// Record persistence settings
    pub storage: StorageConfig,
}

impl AppConfig {
    /// Load configuration from disk, falling back to defaults if not found.
    ///
    /// # Errors
    /// Returns error if:
    /// - Config directory cannot be determined
    /// - File exists but cannot be read
    /// - File contents are not valid TOML
    pub fn load() -> ConfigResult<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit path, falling back to defaults
    /// if the file does not exist.
    pub fn load_from(config_path: &Path) -> ConfigResult<Self> {
        if config_path.exists() {
            tracing::debug!("Loading config from {}", config_path.display());
            let contents = fs::read_to_string(config_path)?;
            let config: Self = toml::from_str(&contents)?;
            config.validate()?;
            Ok(config)
        } else {
            tracing::debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration from `config_path` (or the default location) with
    /// environment variable overrides applied.
    ///
    /// Supports the following environment variables:
    /// - `HARVEST_LINK_LIMIT`: Override the link collection limit
    /// - `HARVEST_CONCURRENT_PAGES`: Override how many pages are scraped at once
    /// - `HARVEST_SITES_DIR`: Override the extra site definitions directory
    pub fn load_with_env(config_path: Option<&Path>) -> ConfigResult<Self> {
        let mut config = match config_path {
            Some(path) => Self::load_from(path)?,
            None => Self::load()?,
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a key lookup (normally the process environment).
    ///
    /// Values that fail to parse are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("HARVEST_LINK_LIMIT") {
            if let Ok(limit) = val.parse() {
                self.scraping.link_limit = limit;
                tracing::debug!("Override scraping.link_limit from env: {}", limit);
            }
        }

        if let Some(val) = lookup("HARVEST_CONCURRENT_PAGES") {
            if let Ok(pages) = val.parse() {
                self.scraping.concurrent_pages = pages;
                tracing::debug!("Override scraping.concurrent_pages from env: {}", pages);
            }
        }

        if let Some(val) = lookup("HARVEST_SITES_DIR") {
            if !val.trim().is_empty() {
                tracing::debug!("Override sites.definitions_dir from env: {}", val);
                self.sites.definitions_dir = Some(PathBuf::from(val));
            }
        }
    }

    /// Check value constraints that serde defaults cannot express.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.scraping.link_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "scraping.link_limit".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        if self.scraping.concurrent_pages == 0 {
            return Err(ConfigError::InvalidValue {
                field: "scraping.concurrent_pages".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        if self.export.csv_file_name.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "export.csv_file_name".to_string(),
                reason: "must not be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/harvest/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        Ok(project_dirs()?.config_dir().join("config.toml"))
    }

    /// Get the data directory path.
    ///
    /// Uses XDG base directories: `~/.local/share/harvest`
    pub fn data_dir() -> ConfigResult<PathBuf> {
        Ok(project_dirs()?.data_dir().to_path_buf())
    }

    /// Resolve where the record history is persisted between sessions.
    pub fn records_path(&self) -> ConfigResult<PathBuf> {
        match &self.storage.records_file {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::data_dir()?.join("records.csv")),
        }
    }

    /// Resolve the default CSV export path.
    pub fn export_path(&self) -> ConfigResult<PathBuf> {
        let dir = match &self.export.directory {
            Some(dir) => dir.clone(),
            None => Self::data_dir()?,
        };
        Ok(dir.join(&self.export.csv_file_name))
    }
}

fn project_dirs() -> ConfigResult<ProjectDirs> {
    ProjectDirs::from("com", "harvest", "harvest").ok_or(ConfigError::NoConfigDir)
}

/// Link collection and scraping settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapingConfig {
    /// Maximum number of links gathered from one page (at least 1)
    pub link_limit: usize,
    /// Number of saved pages processed at once
    pub concurrent_pages: usize,
    /// Rule selected when none is given
    pub default_rule: Option<String>,
    /// Site selected when none is given
    pub default_site: Option<String>,
}

impl Default for ScrapingConfig {
    fn default() -> Self {
        Self {
            link_limit: 10,
            concurrent_pages: 4,
            default_rule: None,
            default_site: None,
        }
    }
}

/// URL work queue settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    /// Text prepended to every pasted line
    pub url_prefix: String,
}

/// Export settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory for exports (defaults to the data directory)
    pub directory: Option<PathBuf>,
    /// File name used for CSV exports
    pub csv_file_name: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            directory: None,
            csv_file_name: "emails.csv".to_string(),
        }
    }
}

/// Site catalogue settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SitesConfig {
    /// Directory of additional TOML rule files merged over the built-in catalogue
    pub definitions_dir: Option<PathBuf>,
}

/// Record persistence settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// CSV file holding the full record history (defaults to `<data_dir>/records.csv`)
    pub records_file: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.scraping.link_limit, 10);
        assert_eq!(config.scraping.concurrent_pages, 4);
        assert!(config.scraping.default_site.is_none());
        assert!(config.queue.url_prefix.is_empty());
        assert_eq!(config.export.csv_file_name, "emails.csv");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("[scraping]"));
        assert!(toml_str.contains("[export]"));

        let parsed: AppConfig = toml::from_str(&toml_str).expect("parse serialized config");
        assert_eq!(parsed.scraping.link_limit, config.scraping.link_limit);
    }

    #[test]
    fn test_config_load_from_file() {
        let tmp = TempDir::new().expect("create temp dir");
        let config_path = tmp.path().join("config.toml");

        let mut config = AppConfig::default();
        config.scraping.link_limit = 25;
        config.queue.url_prefix = "https://example.com/".to_string();

        let contents = toml::to_string_pretty(&config).expect("serialize config");
        fs::write(&config_path, contents).expect("write config file");

        let loaded = AppConfig::load_from(&config_path).expect("load config");
        assert_eq!(loaded.scraping.link_limit, 25);
        assert_eq!(loaded.queue.url_prefix, "https://example.com/");
    }

    #[test]
    fn test_load_with_env_from_explicit_path() {
        let tmp = TempDir::new().expect("create temp dir");
        let config_path = tmp.path().join("config.toml");
        fs::write(&config_path, "[export]\ncsv_file_name = \"leads.csv\"\n")
            .expect("write config file");

        let loaded = AppConfig::load_with_env(Some(&config_path)).expect("load config");
        assert_eq!(loaded.export.csv_file_name, "leads.csv");
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let tmp = TempDir::new().expect("create temp dir");
        let loaded = AppConfig::load_from(&tmp.path().join("absent.toml")).expect("load defaults");
        assert_eq!(loaded.scraping.link_limit, 10);
    }

    #[test]
    fn test_zero_link_limit_rejected() {
        let tmp = TempDir::new().expect("create temp dir");
        let config_path = tmp.path().join("config.toml");
        fs::write(&config_path, "[scraping]\nlink_limit = 0\n").expect("write config file");

        let result = AppConfig::load_from(&config_path);
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("HARVEST_LINK_LIMIT", "50"),
            ("HARVEST_CONCURRENT_PAGES", "not-a-number"),
            ("HARVEST_SITES_DIR", "/tmp/sites"),
        ]);

        let mut config = AppConfig::default();
        config.apply_overrides(|key| env.get(key).map(ToString::to_string));

        assert_eq!(config.scraping.link_limit, 50);
        assert_eq!(config.scraping.concurrent_pages, 4);
        assert_eq!(
            config.sites.definitions_dir,
            Some(PathBuf::from("/tmp/sites"))
        );
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[scraping]
link_limit = 3

[storage]
records_file = "/tmp/records.csv"
"#;

        let config: AppConfig = toml::from_str(toml_str).expect("parse partial config");
        assert_eq!(config.scraping.link_limit, 3);
        assert_eq!(config.scraping.concurrent_pages, 4);
        assert_eq!(
            config.records_path().expect("records path"),
            PathBuf::from("/tmp/records.csv")
        );
    }
}
