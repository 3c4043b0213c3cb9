//! Flat CSV persistence for book records

use crate::storage::record::{BookRecord, COLUMNS};
use crate::ShelfError;
use std::fs;
use std::path::Path;

/// Writes records to a CSV file, replacing whatever was there
///
/// The header row is always written, even for zero records, so an empty
/// crawl still leaves a well-formed file. Parent directories are created if
/// missing.
///
/// # Returns
///
/// The number of data rows written
pub fn write_records(path: &Path, records: &[BookRecord]) -> Result<usize, ShelfError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
            tracing::info!("Created output directory {}", parent.display());
        }
    }

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;

    writer.write_record(COLUMNS)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    Ok(records.len())
}

/// Reads every record from a CSV file written by [`write_records`]
///
/// Columns are matched by header name, so column order in the file does not
/// matter for reading. Any unreadable row fails the whole read.
pub fn read_records(path: &Path) -> Result<Vec<BookRecord>, ShelfError> {
    let mut reader = csv::Reader::from_path(path)?;

    let headers = reader.headers()?;
    for required in ["id", "title"] {
        if !headers.iter().any(|h| h == required) {
            return Err(ShelfError::Csv(csv::Error::from(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("missing required column '{}'", required),
            ))));
        }
    }

    let mut records = Vec::new();
    for row in reader.deserialize() {
        records.push(row?);
    }
    Ok(records)
}
