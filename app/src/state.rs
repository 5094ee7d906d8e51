//! Application state management.

use crate::error::CommandError;
use harvest_core::AppConfig;
use harvest_sites::{SiteDefinition, SiteLoader, SiteRegistry};
use harvest_store::{export_csv, import_csv, CounterSnapshot, Counters, RecordStore};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{info, warn};

/// State shared by every command of one session.
pub struct AppState {
    /// Effective configuration
    pub config: AppConfig,

    /// Built-in sites merged with the user's rule files
    pub sites: SiteRegistry,

    /// Record history, restored from and persisted to `records_path`
    pub store: RecordStore,

    /// Session and daily counters
    pub counters: Mutex<Counters>,

    records_path: PathBuf,
}

impl AppState {
    /// Build state from `config`, persisting records at the configured path.
    pub fn new(config: AppConfig) -> Result<Self, CommandError> {
        let records_path = config.records_path()?;
        Self::with_records_path(config, records_path)
    }

    /// Build state that persists records at `records_path`.
    ///
    /// An existing records file is loaded so dedup carries over from
    /// earlier sessions.
    pub fn with_records_path(
        config: AppConfig,
        records_path: impl Into<PathBuf>,
    ) -> Result<Self, CommandError> {
        let records_path = records_path.into();
        let sites = load_sites(&config)?;

        let store = if records_path.exists() {
            RecordStore::from_records(import_csv(&records_path)?)
        } else {
            RecordStore::new()
        };

        info!(
            records = store.len(),
            unique = store.unique_count(),
            rules = sites.count(),
            path = %records_path.display(),
            "session state ready"
        );

        Ok(Self {
            config,
            sites,
            store,
            counters: Mutex::new(Counters::new()),
            records_path,
        })
    }

    /// Where the record history is persisted.
    pub fn records_path(&self) -> &Path {
        &self.records_path
    }

    /// Write the full history to the records file.
    pub fn persist(&self) -> Result<(), CommandError> {
        export_csv(&self.records_path, &self.store.records())?;
        Ok(())
    }

    /// Site named `label`, or the configured default site.
    pub fn resolve_site(&self, label: Option<&str>) -> Result<SiteDefinition, CommandError> {
        let label = label
            .or(self.config.scraping.default_site.as_deref())
            .ok_or_else(|| {
                CommandError::new(
                    "SITE_REQUIRED",
                    "No site given and no scraping.default_site configured",
                )
            })?;

        Ok(self.sites.site(label)?)
    }

    /// Count one processed page and the records it added.
    pub fn record_page(&self, added: usize) {
        let mut counters = self.counters.lock().expect("acquire counters lock");
        counters.record_page();
        counters.record_emails(added);
    }

    /// Current counter values.
    pub fn counters(&self) -> CounterSnapshot {
        self.counters
            .lock()
            .expect("acquire counters lock")
            .snapshot()
    }
}

fn load_sites(config: &AppConfig) -> Result<SiteRegistry, CommandError> {
    let registry = SiteRegistry::builtin();

    if let Some(dir) = &config.sites.definitions_dir {
        if dir.is_dir() {
            let loader = SiteLoader::new(dir)?;
            registry.merge_from(&loader)?;
        } else {
            warn!(dir = %dir.display(), "site rules directory not found, using built-in sites");
        }
    }

    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use harvest_store::RecordMeta;
    use tempfile::TempDir;

    #[test]
    fn test_state_restores_records() {
        let temp_dir = TempDir::new().expect("create temp dir");
        let path = temp_dir.path().join("records.csv");

        let state = AppState::with_records_path(AppConfig::default(), &path).expect("state");
        state.store.add_records(["a@x.com"], &RecordMeta::new());
        state.persist().expect("persist");

        let restored = AppState::with_records_path(AppConfig::default(), &path).expect("state");
        assert_eq!(restored.store.len(), 1);
        assert!(restored.store.contains_email("A@X.COM"));
    }

    #[test]
    fn test_resolve_site() {
        let temp_dir = TempDir::new().expect("create temp dir");
        let mut config = AppConfig::default();
        let state =
            AppState::with_records_path(config.clone(), temp_dir.path().join("r.csv")).expect("state");

        assert_eq!(
            state.resolve_site(Some("Wiley")).expect("wiley").label(),
            "Wiley"
        );
        let err = state.resolve_site(None).expect_err("no default");
        assert_eq!(err.code, "SITE_REQUIRED");

        config.scraping.default_site = Some("Cureus".to_string());
        let state =
            AppState::with_records_path(config, temp_dir.path().join("r.csv")).expect("state");
        assert_eq!(state.resolve_site(None).expect("default").label(), "Cureus");
    }

    #[test]
    fn test_missing_sites_dir_falls_back_to_builtin() {
        let temp_dir = TempDir::new().expect("create temp dir");
        let mut config = AppConfig::default();
        config.sites.definitions_dir = Some(temp_dir.path().join("missing"));

        let state =
            AppState::with_records_path(config, temp_dir.path().join("r.csv")).expect("state");
        assert_eq!(state.sites.count(), 1);
    }

    #[test]
    fn test_counters() {
        let temp_dir = TempDir::new().expect("create temp dir");
        let state = AppState::with_records_path(AppConfig::default(), temp_dir.path().join("r.csv"))
            .expect("state");

        state.record_page(3);
        state.record_page(0);

        let counters = state.counters();
        assert_eq!(counters.pages_session, 2);
        assert_eq!(counters.emails_session, 3);
    }
}
