//! Error types for extraction.

use thiserror::Error;

/// Conditions signalled by the extraction components.
///
/// Malformed HTML and unparseable URLs are not errors; they produce empty
/// or best-effort results.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    /// A caller-supplied argument is outside its allowed range.
    #[error("invalid argument {name}: {reason}")]
    InvalidArgument {
        /// Parameter name
        name: &'static str,
        /// Why the value was rejected
        reason: String,
    },
}

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractError>;
