//! Crawl output: the record sink and run statistics

mod sink;
pub mod stats;

pub use sink::RecordSink;
pub use stats::{print_statistics, print_table_statistics, CrawlStatistics};
