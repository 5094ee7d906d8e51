//! Harvest Sites - the publisher site catalogue.
//!
//! A rule groups the sites a user targets; each site contributes the
//! hosts that the link collector accepts while crawling it.
//!
//! # Architecture
//!
//! - **Definition Types** ([`definition`]): rules, sites, validation and search URLs
//! - **Built-in Catalogue** ([`builtin`]): the publisher sites shipped with the application
//! - **Loader** ([`loader`]): TOML rule files from a user directory
//! - **Registry** ([`registry`]): thread-safe cache with lookups by label
//!
//! # Example
//!
//! ```rust
//! use harvest_sites::{SiteRegistry, PUBLISHERS_RULE};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = SiteRegistry::builtin();
//! let springer = registry.site("Springer")?;
//!
//! assert_eq!(springer.allowed_hosts(), vec!["springer.com"]);
//! assert_eq!(registry.sites_for_rule(PUBLISHERS_RULE)?.len(), 11);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod builtin;
pub mod definition;
pub mod error;
pub mod loader;
pub mod registry;

// Re-export commonly used types
pub use builtin::{builtin_rules, PUBLISHERS_RULE};
pub use definition::{RuleDefinition, SiteDefinition};
pub use error::{Result, SiteError};
pub use loader::SiteLoader;
pub use registry::SiteRegistry;
