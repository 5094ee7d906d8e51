//! Core error types for the Harvest application.
//!
//! Configuration failures and invalid values for the shared types in
//! [`crate::types`]. Each of the other crates carries its own error enum.

use thiserror::Error;

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to determine config directory path
    #[error("could not determine config directory (XDG base directories not available)")]
    NoConfigDir,

    /// Failed to parse TOML
    #[error("failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    /// I/O error reading the config file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration value
    #[error("invalid config value for {field}: {reason}")]
    InvalidValue {
        /// Field name
        field: String,
        /// Reason for invalidity
        reason: String,
    },
}

/// A value rejected by one of the shared types.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Not a lower-case UUID v4
    #[error("invalid record ID: must be a valid UUID v4, got '{0}'")]
    RecordId(String),

    /// Not one of `true`, `false` or `unknown`
    #[error("invalid verified state '{0}': expected true, false or unknown")]
    Verified(String),
}

/// Result type alias for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ConfigError::InvalidValue {
            field: "scraping.link_limit".to_string(),
            reason: "must be at least 1".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid config value for scraping.link_limit: must be at least 1"
        );

        let err = ValidationError::Verified("maybe".to_string());
        assert_eq!(
            err.to_string(),
            "invalid verified state 'maybe': expected true, false or unknown"
        );
    }

    #[test]
    fn test_config_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "test");
        let err: ConfigError = io_err.into();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
