//! Read-only in-memory book table
//!
//! A [`BookTable`] is built once at service startup from the record file and
//! never changes afterwards. Handlers share it behind an `Arc`.

use crate::state::TableState;
use crate::storage::csv_file::read_records;
use crate::storage::record::BookRecord;
use crate::{QueryError, QueryResult};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Search filters; at least one must be non-blank
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    /// Case-insensitive substring of the title
    pub title: Option<String>,

    /// Case-insensitive exact category name
    pub category: Option<String>,
}

impl SearchQuery {
    pub fn by_title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            category: None,
        }
    }

    pub fn by_category(category: impl Into<String>) -> Self {
        Self {
            title: None,
            category: Some(category.into()),
        }
    }

    /// Blank criteria count as absent
    fn normalized(&self) -> (Option<String>, Option<String>) {
        let clean = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_lowercase)
        };
        (clean(&self.title), clean(&self.category))
    }
}

/// Summary numbers for `shelfscan stats`
#[derive(Debug, Clone, PartialEq)]
pub struct TableStatistics {
    pub total_records: usize,
    pub loaded: bool,
    pub categories: usize,

    /// Index is the star count, 0 meaning unknown
    pub rating_histogram: [usize; 6],

    pub total_availability: u64,
    pub mean_availability: f64,
}

/// Immutable snapshot of the record file, indexed by id
#[derive(Debug, Clone)]
pub struct BookTable {
    records: Vec<BookRecord>,
    index: HashMap<u32, usize>,
    state: TableState,
    loaded: bool,
}

impl BookTable {
    /// A table that has not been loaded yet
    pub fn unloaded() -> Self {
        Self {
            records: Vec::new(),
            index: HashMap::new(),
            state: TableState::Unloaded,
            loaded: false,
        }
    }

    /// Builds a ready table from records in load order
    ///
    /// Repeated ids keep their first row.
    pub fn from_records(records: Vec<BookRecord>) -> Self {
        let mut kept = Vec::with_capacity(records.len());
        let mut index = HashMap::with_capacity(records.len());

        for record in records {
            if index.contains_key(&record.id) {
                tracing::warn!("Ignoring repeated book id {} ({})", record.id, record.title);
                continue;
            }
            index.insert(record.id, kept.len());
            kept.push(record);
        }

        Self {
            records: kept,
            index,
            state: TableState::Ready,
            loaded: true,
        }
    }

    /// Loads the record file
    ///
    /// Never fails: a missing or unreadable file yields an empty ready table
    /// that reports `is_loaded() == false`.
    pub fn load(path: &Path) -> Self {
        match read_records(path) {
            Ok(records) => {
                let table = Self::from_records(records);
                tracing::info!("Loaded {} books from {}", table.len(), path.display());
                table
            }
            Err(e) => {
                tracing::warn!(
                    "Could not load book data from {}: {}; serving an empty table",
                    path.display(),
                    e
                );
                Self {
                    state: TableState::Ready,
                    ..Self::unloaded()
                }
            }
        }
    }

    pub fn state(&self) -> TableState {
        self.state
    }

    /// Whether the record file was read successfully
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Every record in load order
    pub fn list_all(&self) -> &[BookRecord] {
        &self.records
    }

    /// Distinct categories in first-seen order, the empty category included
    pub fn list_categories(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .map(|r| r.category.as_str())
            .filter(|c| seen.insert(*c))
            .collect()
    }

    /// Records matching every given criterion, in load order
    pub fn search(&self, query: &SearchQuery) -> QueryResult<Vec<&BookRecord>> {
        let (title, category) = query.normalized();
        if title.is_none() && category.is_none() {
            return Err(QueryError::MissingCriteria);
        }

        Ok(self
            .records
            .iter()
            .filter(|r| {
                title
                    .as_deref()
                    .map_or(true, |t| r.title.to_lowercase().contains(t))
            })
            .filter(|r| {
                category
                    .as_deref()
                    .map_or(true, |c| r.category.to_lowercase() == c)
            })
            .collect())
    }

    /// The record with the given id
    pub fn get_by_id(&self, id: u32) -> QueryResult<&BookRecord> {
        if !self.loaded {
            return Err(QueryError::Unavailable);
        }
        self.index
            .get(&id)
            .map(|&i| &self.records[i])
            .ok_or(QueryError::NotFound(id))
    }

    pub fn stats(&self) -> TableStatistics {
        let mut rating_histogram = [0usize; 6];
        let mut total_availability = 0u64;

        for record in &self.records {
            let bucket = usize::from(record.rating.min(5));
            rating_histogram[bucket] += 1;
            total_availability += u64::from(record.availability);
        }

        let mean_availability = if self.records.is_empty() {
            0.0
        } else {
            total_availability as f64 / self.records.len() as f64
        };

        TableStatistics {
            total_records: self.records.len(),
            loaded: self.loaded,
            categories: self.list_categories().len(),
            rating_histogram,
            total_availability,
            mean_availability,
        }
    }
}
