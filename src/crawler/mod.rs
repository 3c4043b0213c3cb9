//! Crawler module for walking the catalog and extracting book records
//!
//! This module contains the crawl pipeline:
//! - HTTP fetching with a configured user agent
//! - Listing and detail page parsing
//! - Per-field extraction into records
//! - Sequential page walking and overall crawl coordination

mod coordinator;
mod extractor;
mod fetcher;
mod field;
mod parser;
mod walker;

pub use coordinator::{run_crawl, Coordinator, CrawlRun};
pub use extractor::{
    build_record, clean_price, parse_availability, parse_rating, Extraction, Extractor, Rejection,
};
pub use fetcher::{build_http_client, fetch_url, format_user_agent, FetchResult, TransportFailure};
pub use field::FieldOutcome;
pub use parser::{parse_detail_page, parse_listing_page, DetailPage, ListingEntry, ListingPage};
pub use walker::{PageWalker, WalkSettings};

use crate::config::Config;
use crate::output::CrawlStatistics;
use crate::ShelfError;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the HTTP client
/// 2. Walk every listing page from the start page
/// 3. Extract one record per listing entry
/// 4. Write the record file
///
/// # Returns
///
/// * `Ok(CrawlStatistics)` - The walk ended (finished or aborted) and the file was written
/// * `Err(ShelfError)` - Setup or the final write failed
pub async fn crawl(config: &Config) -> Result<CrawlStatistics, ShelfError> {
    run_crawl(config).await
}
