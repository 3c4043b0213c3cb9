//! Storage for crawled book records
//!
//! The crawler writes a flat CSV file; the query service reads it back into
//! an immutable [`BookTable`].

mod csv_file;
mod record;
mod table;

pub use csv_file::{read_records, write_records};
pub use record::{BookRecord, COLUMNS};
pub use table::{BookTable, SearchQuery, TableStatistics};
