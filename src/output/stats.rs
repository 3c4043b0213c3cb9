//! Crawl and table statistics
//!
//! Counters are gathered while a crawl runs and printed once it ends. Table
//! statistics come from [`BookTable::stats`](crate::storage::BookTable::stats).

use crate::state::WalkState;
use crate::storage::TableStatistics;
use chrono::{DateTime, Utc};

/// Counters for one crawl run
#[derive(Debug, Clone)]
pub struct CrawlStatistics {
    /// Listing pages fetched successfully
    pub pages_walked: usize,

    /// Listing entries seen across all pages
    pub entries_seen: usize,

    /// Records written to the output file
    pub records_written: usize,

    /// Entries skipped for lack of an id or title
    pub rejected: usize,

    /// Records dropped because their id was already taken
    pub duplicates: usize,

    /// Detail pages that could not be fetched
    pub detail_failures: usize,

    /// How the walk ended
    pub walk_state: WalkState,

    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl CrawlStatistics {
    /// Fresh counters stamped with the current time
    pub fn start() -> Self {
        Self {
            pages_walked: 0,
            entries_seen: 0,
            records_written: 0,
            rejected: 0,
            duplicates: 0,
            detail_failures: 0,
            walk_state: WalkState::Walking,
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    /// Stamps the finish time and records the final walk state
    pub fn finish(&mut self, walk_state: WalkState) {
        self.walk_state = walk_state;
        self.finished_at = Some(Utc::now());
    }

    /// Whole seconds between start and finish, if finished
    pub fn duration_seconds(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds())
    }
}

/// Prints crawl statistics to stdout
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Run:");
    println!("  Started:  {}", stats.started_at.to_rfc3339());
    if let Some(finished) = stats.finished_at {
        println!("  Finished: {}", finished.to_rfc3339());
    }
    if let Some(secs) = stats.duration_seconds() {
        println!("  Duration: {}s", secs);
    }
    println!("  Walk:     {}", stats.walk_state);
    println!();

    println!("Pages:");
    println!("  Listing pages walked: {}", stats.pages_walked);
    println!("  Entries seen: {}", stats.entries_seen);
    println!();

    println!("Records:");
    println!("  Written: {}", stats.records_written);
    println!("  Rejected: {}", stats.rejected);
    println!("  Duplicate ids: {}", stats.duplicates);
    println!("  Detail page failures: {}", stats.detail_failures);
    println!();

    let yield_rate = if stats.entries_seen > 0 {
        (stats.records_written as f64 / stats.entries_seen as f64) * 100.0
    } else {
        0.0
    };
    println!(
        "Yield: {:.1}% ({} / {} entries recorded)",
        yield_rate, stats.records_written, stats.entries_seen
    );

    if stats.walk_state.is_aborted() {
        println!("\nThe walk stopped early; the output holds the records gathered before the failure.");
    }
}

/// Prints record-file statistics to stdout
pub fn print_table_statistics(stats: &TableStatistics) {
    println!("=== Book Table Statistics ===\n");

    if !stats.loaded {
        println!("No book data could be loaded.");
        return;
    }

    println!("Overview:");
    println!("  Books: {}", stats.total_records);
    println!("  Categories: {}", stats.categories);
    println!();

    println!("Ratings:");
    for (stars, count) in stats.rating_histogram.iter().enumerate().rev() {
        let label = if stars == 0 {
            "unrated".to_string()
        } else {
            format!("{} star", stars)
        };
        let percentage = if stats.total_records > 0 {
            (*count as f64 / stats.total_records as f64) * 100.0
        } else {
            0.0
        };
        println!("  {}: {} ({:.1}%)", label, count, percentage);
    }
    println!();

    println!(
        "Availability: {} copies in stock, {:.1} per book",
        stats.total_availability, stats.mean_availability
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_is_unfinished() {
        let stats = CrawlStatistics::start();

        assert_eq!(stats.walk_state, WalkState::Walking);
        assert!(stats.finished_at.is_none());
        assert!(stats.duration_seconds().is_none());
    }

    #[test]
    fn test_finish_records_state() {
        let mut stats = CrawlStatistics::start();
        stats.finish(WalkState::Aborted);

        assert_eq!(stats.walk_state, WalkState::Aborted);
        assert!(stats.finished_at.is_some());
        assert!(stats.duration_seconds().unwrap() >= 0);
    }
}
