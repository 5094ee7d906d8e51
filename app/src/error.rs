//! Error type returned by application commands.

use harvest_core::{ConfigError, ValidationError};
use harvest_extract::ExtractError;
use harvest_sites::SiteError;
use harvest_store::StoreError;
use serde::Serialize;
use std::fmt;

/// Serializable error for command results.
#[derive(Debug, Serialize)]
pub struct CommandError {
    /// Error code for programmatic handling (e.g., "SITE_NOT_FOUND")
    pub code: String,
    /// User-friendly error message
    pub message: String,
    /// Optional debugging context
    pub details: Option<serde_json::Value>,
}

impl CommandError {
    /// Create a new command error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Create a command error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details),
        }
    }
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for CommandError {}

impl From<SiteError> for CommandError {
    fn from(err: SiteError) -> Self {
        match err {
            SiteError::RuleNotFound { label } => Self::with_details(
                "RULE_NOT_FOUND",
                format!("No site rule named '{label}'"),
                serde_json::json!({ "label": label }),
            ),
            SiteError::SiteNotFound { label } => Self::with_details(
                "SITE_NOT_FOUND",
                format!("No site named '{label}'"),
                serde_json::json!({ "label": label }),
            ),
            SiteError::DirectoryNotFound { path } => Self::with_details(
                "SITES_DIR_NOT_FOUND",
                "Site rules directory does not exist",
                serde_json::json!({ "path": path }),
            ),
            other => Self::new("SITE_ERROR", other.to_string()),
        }
    }
}

impl From<StoreError> for CommandError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { id } => Self::with_details(
                "RECORD_NOT_FOUND",
                "Record does not exist",
                serde_json::json!({ "id": id }),
            ),
            StoreError::InvalidHeader { .. } | StoreError::Csv(_) => {
                Self::new("CSV_ERROR", format!("Invalid records file: {err}"))
            }
            StoreError::Xlsx(_) => Self::new("EXPORT_ERROR", err.to_string()),
            StoreError::Io(e) => e.into(),
        }
    }
}

impl From<ExtractError> for CommandError {
    fn from(err: ExtractError) -> Self {
        match err {
            ExtractError::InvalidArgument { name, reason } => Self::with_details(
                "INVALID_ARGUMENT",
                format!("Invalid {name}: {reason}"),
                serde_json::json!({ "argument": name }),
            ),
        }
    }
}

impl From<ConfigError> for CommandError {
    fn from(err: ConfigError) -> Self {
        Self::new("CONFIG_ERROR", format!("Configuration error: {err}"))
    }
}

impl From<ValidationError> for CommandError {
    fn from(err: ValidationError) -> Self {
        let value = match &err {
            ValidationError::RecordId(value) | ValidationError::Verified(value) => value.clone(),
        };
        Self::with_details(
            "INVALID_ARGUMENT",
            err.to_string(),
            serde_json::json!({ "value": value }),
        )
    }
}

/// Convert `std::io::Error` to `CommandError`.
impl From<std::io::Error> for CommandError {
    fn from(err: std::io::Error) -> Self {
        Self::new("FILESYSTEM_ERROR", format!("Filesystem error: {err}"))
    }
}
