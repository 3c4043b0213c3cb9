//! Sequential page walker
//!
//! The walker owns a single cursor. Each call to [`PageWalker::next_page`]
//! fetches the cursor page, parses its entries and advances the cursor to
//! the page's "next" link. A failed fetch or a page without a "next" link
//! ends the walk for good.

use crate::config::CrawlerConfig;
use crate::crawler::fetcher::fetch_url;
use crate::crawler::parser::{parse_listing_page, ListingPage};
use crate::state::WalkState;
use crate::ShelfError;
use rand::Rng;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Where the walk starts and how it is paced
#[derive(Debug, Clone)]
pub struct WalkSettings {
    /// First listing page
    pub start_url: Url,

    /// Base URL that "next" links resolve against
    pub catalog_base: Url,

    /// Fixed pause before every fetch after the first
    pub page_delay: Duration,

    /// Upper bound of the random extra pause (milliseconds)
    pub jitter_ms: u64,
}

impl WalkSettings {
    /// Builds walk settings from the crawler configuration
    pub fn from_config(config: &CrawlerConfig) -> Result<Self, ShelfError> {
        let catalog_base = Url::parse(&config.catalog_url)?;
        let start_url = catalog_base.join(config.start_page.trim())?;

        Ok(Self {
            start_url,
            catalog_base,
            page_delay: Duration::from_millis(config.page_delay_ms),
            jitter_ms: config.page_delay_jitter_ms,
        })
    }
}

/// Walks listing pages one at a time
///
/// Not restartable: once [`next_page`](Self::next_page) returns `None` it
/// keeps returning `None`. There is no page limit and no revisit detection;
/// the catalog's "next" chain is assumed to end.
pub struct PageWalker {
    client: Client,
    settings: WalkSettings,
    cursor: Option<Url>,
    state: WalkState,
    pages_walked: usize,
}

impl PageWalker {
    /// Creates a walker positioned at the start page
    pub fn new(client: Client, settings: WalkSettings) -> Self {
        let cursor = Some(settings.start_url.clone());
        Self {
            client,
            settings,
            cursor,
            state: WalkState::Walking,
            pages_walked: 0,
        }
    }

    /// Current walk state
    pub fn state(&self) -> WalkState {
        self.state
    }

    /// Number of listing pages fetched successfully
    pub fn pages_walked(&self) -> usize {
        self.pages_walked
    }

    /// Fetches and parses the next listing page
    ///
    /// # Returns
    ///
    /// * `Some(ListingPage)` - The page at the cursor
    /// * `None` - The walk is over, either finished or aborted (see [`state`](Self::state))
    pub async fn next_page(&mut self) -> Option<ListingPage> {
        let url = self.cursor.take()?;

        if self.pages_walked > 0 {
            self.pause().await;
        }

        tracing::info!("Fetching listing page {}: {}", self.pages_walked + 1, url);

        let body = match fetch_url(&self.client, url.as_str()).await.into_body() {
            Ok(body) => body,
            Err(failure) => {
                tracing::warn!(
                    "Stopping walk after {} pages: failed to fetch {}: {}",
                    self.pages_walked,
                    url,
                    failure
                );
                self.state = WalkState::Aborted;
                return None;
            }
        };

        self.pages_walked += 1;
        let page = parse_listing_page(&body, &self.settings.catalog_base);

        match &page.next_url {
            Some(next) => {
                tracing::debug!("Next listing page: {}", next);
                self.cursor = Some(next.clone());
            }
            None => {
                tracing::info!("No next link on {}, walk complete", url);
                self.state = WalkState::Finished;
            }
        }

        Some(page)
    }

    /// Sleeps the fixed page delay plus a small random jitter
    async fn pause(&self) {
        let jitter = if self.settings.jitter_ms > 0 {
            rand::rng().random_range(0..=self.settings.jitter_ms)
        } else {
            0
        };

        let pause = self.settings.page_delay + Duration::from_millis(jitter);
        if !pause.is_zero() {
            tokio::time::sleep(pause).await;
        }
    }
}
