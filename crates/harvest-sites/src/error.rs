//! Error types for the site catalogue.

use thiserror::Error;

/// Errors that can occur while loading or querying site rules.
#[derive(Error, Debug)]
pub enum SiteError {
    /// No rule with the given label
    #[error("site rule not found: {label}")]
    RuleNotFound {
        /// The rule label that was not found
        label: String,
    },

    /// No site with the given label in any rule
    #[error("site not found: {label}")]
    SiteNotFound {
        /// The site label that was not found
        label: String,
    },

    /// Failed to read a rule file
    #[error("failed to load site rule from {path}: {source}")]
    LoadError {
        /// Path to the rule file
        path: String,
        /// Underlying error
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Failed to parse rule TOML
    #[error("failed to parse site rule TOML in {path}: {source}")]
    ParseError {
        /// Path to the rule file
        path: String,
        /// TOML parse error
        #[source]
        source: toml::de::Error,
    },

    /// Rule or site failed validation
    #[error("invalid site definition {label}: {reason}")]
    ValidationError {
        /// Rule or site label being validated
        label: String,
        /// Reason for validation failure
        reason: String,
    },

    /// Rule directory not found
    #[error("site rules directory not found at {path}")]
    DirectoryNotFound {
        /// Expected directory path
        path: String,
    },

    /// I/O error while reading rule files
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for site catalogue operations.
pub type Result<T> = std::result::Result<T, SiteError>;
