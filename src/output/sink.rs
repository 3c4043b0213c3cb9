//! Record sink: in-order accumulation and the final write

use crate::storage::{write_records, BookRecord};
use crate::ShelfError;
use std::collections::HashSet;
use std::path::Path;

/// Accumulates records in traversal order
///
/// Ids are unique: the first record with a given id is kept and later ones
/// are refused.
#[derive(Debug, Default)]
pub struct RecordSink {
    records: Vec<BookRecord>,
    seen_ids: HashSet<u32>,
}

impl RecordSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record unless its id was already taken
    ///
    /// # Returns
    ///
    /// `false` if the record was dropped as a duplicate
    pub fn push(&mut self, record: BookRecord) -> bool {
        if !self.seen_ids.insert(record.id) {
            return false;
        }
        self.records.push(record);
        true
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records accumulated so far, in traversal order
    pub fn records(&self) -> &[BookRecord] {
        &self.records
    }

    /// Writes every record to `path`, replacing any existing file
    ///
    /// Parent directories are created as needed.
    ///
    /// # Returns
    ///
    /// The number of records written
    pub fn finalize(self, path: &Path) -> Result<usize, ShelfError> {
        let count = write_records(path, &self.records)?;
        tracing::info!("Wrote {} records to {}", count, path.display());
        Ok(count)
    }
}
