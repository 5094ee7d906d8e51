//! Harvest Core - Foundation crate for the Harvest lead collector.
//!
//! This crate provides shared types, error handling and configuration
//! management that all other Harvest crates depend on.
//!
//! # Modules
//!
//! - [`error`] - Configuration and validation errors using thiserror
//! - [`config`] - TOML-based configuration with XDG paths
//! - [`types`] - Shared newtypes and enums (`RecordId`, `Timestamp`, `Verified`)
//!
//! # Example
//!
//! ```rust
//! use harvest_core::{AppConfig, RecordId};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::default();
//! config.validate()?;
//! assert_eq!(config.scraping.link_limit, 10);
//!
//! let id = RecordId::generate();
//! assert!(RecordId::new(id.as_str()).is_ok());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::{
    AppConfig, ExportConfig, QueueConfig, ScrapingConfig, SitesConfig, StorageConfig,
};
pub use error::{ConfigError, ConfigResult, ValidationError};
pub use types::{RecordId, Timestamp, Verified};
