//! Crawler coordinator - main crawl orchestration logic
//!
//! Drives the walk from the first listing page to the last, hands every
//! listing entry to the extractor, and collects the records in a sink that
//! is written out once the walk ends. All per-run data lives in a
//! [`CrawlRun`] owned by the loop; nothing is global.

use crate::config::Config;
use crate::crawler::extractor::Extractor;
use crate::crawler::fetcher::build_http_client;
use crate::crawler::parser::ListingPage;
use crate::crawler::walker::{PageWalker, WalkSettings};
use crate::output::{CrawlStatistics, RecordSink};
use crate::ShelfError;
use std::path::PathBuf;
use url::Url;

/// Accumulator threaded through one crawl
#[derive(Debug)]
pub struct CrawlRun {
    pub sink: RecordSink,
    pub stats: CrawlStatistics,
}

impl CrawlRun {
    fn new() -> Self {
        Self {
            sink: RecordSink::new(),
            stats: CrawlStatistics::start(),
        }
    }
}

/// Main crawler coordinator structure
pub struct Coordinator {
    walker: PageWalker,
    extractor: Extractor,
    start_url: Url,
    records_path: PathBuf,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - A validated configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to walk from the start page
    /// * `Err(ShelfError)` - The HTTP client or a configured URL was unusable
    pub fn new(config: &Config) -> Result<Self, ShelfError> {
        let client = build_http_client(&config.user_agent, &config.crawler)?;
        let settings = WalkSettings::from_config(&config.crawler)?;
        let site_root = Url::parse(&config.crawler.site_root)?;

        let start_url = settings.start_url.clone();
        let extractor = Extractor::new(client.clone(), settings.catalog_base.clone(), site_root);
        let walker = PageWalker::new(client, settings);

        Ok(Self {
            walker,
            extractor,
            start_url,
            records_path: PathBuf::from(&config.output.records_path),
        })
    }

    /// Runs the walk to completion and writes the record file
    ///
    /// An aborted walk is not an error: the records gathered before the
    /// failure are still written. Only a failed write is.
    pub async fn run(mut self) -> Result<CrawlStatistics, ShelfError> {
        tracing::info!("Starting crawl at {}", self.start_url);

        let mut run = CrawlRun::new();

        while let Some(page) = self.walker.next_page().await {
            self.process_page(&page, &mut run).await;

            tracing::info!(
                "Progress: {} pages walked, {} records kept",
                self.walker.pages_walked(),
                run.sink.len()
            );
        }

        let CrawlRun { sink, mut stats } = run;
        stats.pages_walked = self.walker.pages_walked();
        stats.records_written = sink.finalize(&self.records_path)?;
        stats.finish(self.walker.state());

        tracing::info!(
            "Crawl {}: {} records from {} pages in {}s",
            stats.walk_state,
            stats.records_written,
            stats.pages_walked,
            stats.duration_seconds().unwrap_or(0)
        );

        Ok(stats)
    }

    /// Extracts every entry of one listing page into the run
    async fn process_page(&self, page: &ListingPage, run: &mut CrawlRun) {
        for entry in &page.entries {
            run.stats.entries_seen += 1;

            let extraction = self.extractor.extract(entry).await;

            if let Some(failure) = &extraction.detail_failure {
                run.stats.detail_failures += 1;
                tracing::warn!(
                    "Detail page for {:?} unavailable: {}",
                    entry.detail_href.as_deref().unwrap_or(""),
                    failure
                );
            }

            match extraction.outcome {
                Ok(record) => {
                    let id = record.id;
                    if run.sink.push(record) {
                        tracing::debug!("Recorded book {}", id);
                    } else {
                        run.stats.duplicates += 1;
                        tracing::warn!("Dropping repeated book id {}", id);
                    }
                }
                Err(rejection) => {
                    run.stats.rejected += 1;
                    tracing::warn!("Skipping listing entry: {}", rejection);
                }
            }
        }
    }
}

/// Runs a complete crawl with the given configuration
///
/// # Example
///
/// ```no_run
/// use shelfscan::config::load_config;
/// use shelfscan::crawler::run_crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("shelfscan.toml"))?;
/// let stats = run_crawl(&config).await?;
/// println!("{} books", stats.records_written);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: &Config) -> Result<CrawlStatistics, ShelfError> {
    Coordinator::new(config)?.run().await
}
