//! Record history commands: listing, verification, export, clear and URL
//! normalization.

use crate::error::CommandError;
use crate::state::AppState;
use harvest_core::{RecordId, Verified};
use harvest_extract::normalize_url;
use harvest_store::{export_csv, export_xlsx, EmailRecord};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::info;

/// File format of an export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Comma-separated values
    #[default]
    Csv,
    /// Excel workbook
    Xlsx,
}

impl ExportFormat {
    /// Format implied by the extension of `path`, if it names one.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "csv" => Some(Self::Csv),
            "xlsx" => Some(Self::Xlsx),
            _ => None,
        }
    }

    /// File extension written for this format.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Xlsx => "xlsx",
        }
    }
}

/// Outcome of an export.
#[derive(Debug, Clone, Serialize)]
pub struct ExportSummary {
    /// File written
    pub path: PathBuf,
    /// Format written
    pub format: ExportFormat,
    /// Records written
    pub records: usize,
}

/// Write the full history to `path`, or the configured export location.
///
/// An explicit `format` wins; otherwise the extension of `path` decides,
/// falling back to CSV.
pub fn export_records(
    state: &AppState,
    path: Option<&Path>,
    format: Option<ExportFormat>,
) -> Result<ExportSummary, CommandError> {
    let format = format
        .or_else(|| path.and_then(ExportFormat::from_path))
        .unwrap_or_default();
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => state.config.export_path()?.with_extension(format.extension()),
    };

    let records = state.store.records();
    match format {
        ExportFormat::Csv => export_csv(&path, &records)?,
        ExportFormat::Xlsx => export_xlsx(&path, &records)?,
    }

    Ok(ExportSummary {
        path,
        format,
        records: records.len(),
    })
}

/// Records in the history, or only the first sighting of each address.
#[must_use]
pub fn list_records(state: &AppState, unique: bool) -> Vec<EmailRecord> {
    if unique {
        state.store.unique_records()
    } else {
        state.store.records()
    }
}

/// Outcome of a verification update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerifySummary {
    /// Record updated
    pub id: RecordId,
    /// New status
    pub verified: Verified,
}

/// Set the verification status of one record and save the history.
///
/// `verdict` is `true`, `false` or `unknown`.
pub fn verify_record(
    state: &AppState,
    id: &str,
    verdict: &str,
) -> Result<VerifySummary, CommandError> {
    let id = RecordId::from_str(id)?;
    let verified = Verified::from_str(verdict)?;

    state.store.set_verified(&id, verified)?;
    state.persist()?;

    info!(id = %id, verified = %verified, "updated verification");
    Ok(VerifySummary { id, verified })
}

/// Empty the store and its records file.
///
/// Returns the number of records removed.
pub fn clear_records(state: &AppState) -> Result<usize, CommandError> {
    let removed = state.store.len();
    state.store.clear();
    state.persist()?;

    info!(removed, path = %state.records_path().display(), "cleared records");
    Ok(removed)
}

/// A raw URL and its canonical form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedUrl {
    /// URL as given
    pub input: String,
    /// Canonical form
    pub normalized: String,
}

/// Canonicalize each URL.
#[must_use]
pub fn normalize_urls(urls: &[String]) -> Vec<NormalizedUrl> {
    urls.iter()
        .map(|input| NormalizedUrl {
            input: input.clone(),
            normalized: normalize_url(input),
        })
        .collect()
}
