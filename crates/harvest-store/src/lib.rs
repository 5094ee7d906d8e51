//! Harvest Store - record history, counters and the URL work queue.
//!
//! [`RecordStore`] is the single owner of discovered email records. It
//! keeps every observation for audit and flags an address as a duplicate
//! when its lower-cased form was accepted before, across batches and,
//! through [`RecordStore::from_records`], across sessions.
//!
//! # Example
//!
//! ```rust
//! use harvest_store::{RecordMeta, RecordStore};
//!
//! let store = RecordStore::new();
//! let meta = RecordMeta::new().with_journal("PLOS ONE");
//!
//! let added = store.add_records(["a@x.com", "A@X.com"], &meta);
//! assert_eq!(added.len(), 1);
//! assert_eq!(store.len(), 2);
//! assert!(store.records()[1].duplicate);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod error;
pub mod export;
pub mod queue;
pub mod record;
pub mod stats;
pub mod store;

// Re-export commonly used types
pub use error::{Result, StoreError};
pub use export::{
    emails_text, export_csv, export_xlsx, import_csv, read_csv, write_csv, CSV_HEADER,
    XLSX_SHEET_NAME,
};
pub use queue::UrlQueue;
pub use record::{EmailRecord, RecordMeta};
pub use stats::{CounterSnapshot, Counters};
pub use store::RecordStore;
