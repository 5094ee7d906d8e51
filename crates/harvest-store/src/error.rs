//! Error types for the record store.

use thiserror::Error;

/// Errors raised by the record store and its file formats.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No record carries the given id
    #[error("record not found: {id}")]
    NotFound {
        /// The id that was looked up
        id: String,
    },

    /// The CSV header does not match the export column set
    #[error("unexpected CSV header: expected '{expected}', found '{found}'")]
    InvalidHeader {
        /// Header this crate writes
        expected: String,
        /// Header found in the file
        found: String,
    },

    /// Reading or writing CSV failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Building the XLSX workbook failed
    #[error("XLSX error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// I/O error while accessing an export or queue file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
