//! CSV and XLSX export of record history, and CSV import.
//!
//! The column set and order are fixed:
//! `id,email,journal,topic,verified,duplicate,source_url,timestamp_utc`.
//! Reading back a CSV export yields the same records.
//!
//! Files are written to a temporary sibling and renamed over the target,
//! so an interrupted write never leaves a truncated history behind.

use crate::error::{Result, StoreError};
use crate::record::EmailRecord;
use rust_xlsxwriter::{Format, Workbook, XlsxError};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Worksheet holding the exported records.
pub const XLSX_SHEET_NAME: &str = "Emails";

/// Export columns, in order.
pub const CSV_HEADER: [&str; 8] = [
    "id",
    "email",
    "journal",
    "topic",
    "verified",
    "duplicate",
    "source_url",
    "timestamp_utc",
];

/// Write `records` as CSV, header first, even when there are no records.
pub fn write_csv<W: Write>(writer: W, records: &[EmailRecord]) -> Result<()> {
    let mut csv = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    csv.write_record(CSV_HEADER)?;
    for record in records {
        csv.serialize(record)?;
    }
    csv.flush()?;
    Ok(())
}

/// Read records written by [`write_csv`].
///
/// # Errors
/// Returns [`StoreError::InvalidHeader`] when the columns differ from
/// [`CSV_HEADER`], or a CSV error for a malformed row.
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<EmailRecord>> {
    let mut csv = csv::Reader::from_reader(reader);

    let headers = csv.headers()?;
    if !headers.iter().eq(CSV_HEADER) {
        return Err(StoreError::InvalidHeader {
            expected: CSV_HEADER.join(","),
            found: headers.iter().collect::<Vec<_>>().join(","),
        });
    }

    let records = csv
        .deserialize()
        .collect::<std::result::Result<Vec<EmailRecord>, csv::Error>>()?;
    Ok(records)
}

/// Write `records` to `path` as CSV, creating parent directories as needed.
pub fn export_csv(path: &Path, records: &[EmailRecord]) -> Result<()> {
    replace_file(path, |file| write_csv(BufWriter::new(file), records))?;

    info!(path = %path.display(), count = records.len(), "exported records");
    Ok(())
}

/// Write `records` to `path` as a single-sheet workbook with the CSV columns.
///
/// `verified` is written as text and `duplicate` as a boolean cell.
pub fn export_xlsx(path: &Path, records: &[EmailRecord]) -> Result<()> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    let sheet = workbook.add_worksheet();
    sheet.set_name(XLSX_SHEET_NAME)?;
    for (col, name) in (0u16..).zip(CSV_HEADER) {
        sheet.write_string_with_format(0, col, name, &header_format)?;
    }
    sheet.set_freeze_panes(1, 0)?;

    for (index, record) in records.iter().enumerate() {
        let row = u32::try_from(index + 1).map_err(|_| XlsxError::RowColumnLimitError)?;
        sheet.write_string(row, 0, record.id.as_str())?;
        sheet.write_string(row, 1, &record.email)?;
        sheet.write_string(row, 2, &record.journal)?;
        sheet.write_string(row, 3, &record.topic)?;
        sheet.write_string(row, 4, record.verified.as_str())?;
        sheet.write_boolean(row, 5, record.duplicate)?;
        sheet.write_string(row, 6, &record.source_url)?;
        sheet.write_string(row, 7, record.timestamp_utc.to_string())?;
    }

    replace_file(path, |file| Ok(workbook.save_to_writer(file)?))?;

    info!(path = %path.display(), count = records.len(), "exported records as xlsx");
    Ok(())
}

/// Replace `path` with what `write` produces.
///
/// The content goes to a temporary file in the same directory, which is
/// renamed over `path` only after `write` succeeds and the data is synced.
/// On any error the previous file is left as it was.
fn replace_file<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut File) -> Result<()>,
{
    let dir = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => {
            fs::create_dir_all(parent)?;
            parent
        }
        None => Path::new("."),
    };

    let mut staged = NamedTempFile::new_in(dir)?;
    write(staged.as_file_mut())?;
    staged.as_file().sync_all()?;
    staged.persist(path).map_err(|e| StoreError::Io(e.error))?;

    debug!(path = %path.display(), "replaced file");
    Ok(())
}

/// Read records from a CSV file at `path`.
pub fn import_csv(path: &Path) -> Result<Vec<EmailRecord>> {
    let file = File::open(path)?;
    let records = read_csv(BufReader::new(file))?;

    debug!(path = %path.display(), count = records.len(), "imported records");
    Ok(records)
}

/// Addresses of `records`, one per line.
#[must_use]
pub fn emails_text(records: &[EmailRecord]) -> String {
    records
        .iter()
        .map(|record| record.email.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordMeta;
    use crate::store::RecordStore;
    use harvest_core::Verified;

    fn sample_records() -> Vec<EmailRecord> {
        let store = RecordStore::new();
        let meta = RecordMeta::new()
            .with_journal("Journal, with \"quotes\"")
            .with_topic("")
            .with_source_url("https://example.com/a?b=1,2");
        let added = store.add_records(["a@x.com", "A@x.com", "b@x.com"], &meta);
        store
            .set_verified(&added[1].id, Verified::False)
            .expect("set verified");
        store.records()
    }

    #[test]
    fn test_header_written_for_empty_export() {
        let mut out = Vec::new();
        write_csv(&mut out, &[]).expect("write");
        let text = String::from_utf8(out).expect("utf8");
        assert_eq!(
            text.trim_end(),
            "id,email,journal,topic,verified,duplicate,source_url,timestamp_utc"
        );
    }

    #[test]
    fn test_export_is_lossless() {
        let records = sample_records();
        let mut out = Vec::new();
        write_csv(&mut out, &records).expect("write");

        let restored = read_csv(out.as_slice()).expect("read");
        assert_eq!(restored, records);
    }

    #[test]
    fn test_row_values() {
        let records = sample_records();
        let mut out = Vec::new();
        write_csv(&mut out, &records[..2]).expect("write");
        let text = String::from_utf8(out).expect("utf8");
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains(",a@x.com,\"Journal, with \"\"quotes\"\"\",,unknown,false,"));
        assert!(lines[2].contains(",A@x.com,"));
        assert!(lines[2].contains(",unknown,true,"));
    }

    #[test]
    fn test_rejects_foreign_header() {
        let err = read_csv("email,name\na@x.com,A\n".as_bytes()).expect_err("bad header");
        assert!(matches!(err, StoreError::InvalidHeader { .. }));
    }

    #[test]
    fn test_rejects_malformed_record_id() {
        let data = format!(
            "{}\nrow-7,a@x.com,J,T,unknown,false,https://x.com,2024-05-01T09:30:00Z\n",
            CSV_HEADER.join(",")
        );
        let err = read_csv(data.as_bytes()).expect_err("malformed id");
        assert!(matches!(err, StoreError::Csv(_)));
        assert!(err.to_string().contains("row-7"));
    }

    #[test]
    fn test_export_creates_parent_dirs() {
        let dir = tempfile::TempDir::new().expect("create temp dir");
        let path = dir.path().join("a").join("b").join("records.csv");

        export_csv(&path, &sample_records()).expect("export");
        assert_eq!(import_csv(&path).expect("import").len(), 3);
    }

    #[test]
    fn test_failed_write_keeps_previous_file() {
        let dir = tempfile::TempDir::new().expect("create temp dir");
        let path = dir.path().join("records.csv");
        let records = sample_records();
        export_csv(&path, &records).expect("export");

        let result = replace_file(&path, |file| {
            file.write_all(b"id,em")?;
            Err(StoreError::Io(std::io::Error::other("disk full")))
        });

        assert!(matches!(result, Err(StoreError::Io(_))));
        assert_eq!(import_csv(&path).expect("import"), records);

        let entries = fs::read_dir(dir.path()).expect("read dir").count();
        assert_eq!(entries, 1, "staged file left behind");
    }

    #[test]
    fn test_export_replaces_existing_file() {
        let dir = tempfile::TempDir::new().expect("create temp dir");
        let path = dir.path().join("records.csv");
        let records = sample_records();

        export_csv(&path, &records).expect("first export");
        export_csv(&path, &records[..1]).expect("second export");
        assert_eq!(import_csv(&path).expect("import"), records[..1].to_vec());
    }

    #[test]
    fn test_xlsx_export_writes_workbook() {
        let dir = tempfile::TempDir::new().expect("create temp dir");
        let path = dir.path().join("out").join("emails.xlsx");

        export_xlsx(&path, &sample_records()).expect("export xlsx");

        let bytes = fs::read(&path).expect("read workbook");
        assert!(bytes.starts_with(b"PK\x03\x04"), "not a zip container");
        assert_eq!(fs::read_dir(path.parent().expect("parent")).expect("read dir").count(), 1);
    }

    #[test]
    fn test_xlsx_export_of_empty_history() {
        let dir = tempfile::TempDir::new().expect("create temp dir");
        let path = dir.path().join("empty.xlsx");

        export_xlsx(&path, &[]).expect("export xlsx");
        assert!(path.metadata().expect("metadata").len() > 0);
    }

    #[test]
    fn test_emails_text() {
        let records = sample_records();
        assert_eq!(emails_text(&records), "a@x.com\nA@x.com\nb@x.com");
        assert_eq!(emails_text(&[]), "");
    }
}
