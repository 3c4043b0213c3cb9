//! Field extraction: listing entry (+ detail page) to `BookRecord`
//!
//! Each field is read independently and degrades to its default on its own.
//! Only a missing id or title rejects the entry. Detail-page values take
//! precedence over listing values for the fields both pages carry.

use crate::crawler::field::FieldOutcome;
use crate::crawler::fetcher::{fetch_url, TransportFailure};
use crate::crawler::parser::{parse_detail_page, DetailPage, ListingEntry};
use crate::storage::BookRecord;
use crate::url::{extract_book_id, resolve_against_root, resolve_link};
use reqwest::Client;
use thiserror::Error;
use url::Url;

/// Mis-decoded prefix of the pound sign when UTF-8 `£` is read as Latin-1
const PRICE_ARTIFACT: char = 'Â';

/// Star-rating class tokens, in ascending order
const RATING_WORDS: [&str; 5] = ["One", "Two", "Three", "Four", "Five"];

/// Why a listing entry produced no record
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("no book id in detail link {href:?}")]
    MissingId { href: Option<String> },

    #[error("no title for book {id}")]
    MissingTitle { id: u32 },
}

/// Outcome of extracting one listing entry
#[derive(Debug)]
pub struct Extraction {
    /// The record, or why the entry was skipped
    pub outcome: Result<BookRecord, Rejection>,

    /// Set when the detail page could not be fetched
    pub detail_failure: Option<TransportFailure>,
}

/// Turns listing entries into records, fetching each detail page once
pub struct Extractor {
    client: Client,
    catalog_base: Url,
    site_root: Url,
}

impl Extractor {
    /// Creates an extractor
    ///
    /// # Arguments
    ///
    /// * `client` - HTTP client for detail-page fetches
    /// * `catalog_base` - Base URL that detail links resolve against
    /// * `site_root` - Root URL that image paths resolve against
    pub fn new(client: Client, catalog_base: Url, site_root: Url) -> Self {
        Self {
            client,
            catalog_base,
            site_root,
        }
    }

    /// Extracts one listing entry
    ///
    /// The entry's detail page is fetched at most once and shared by the
    /// title fallback and every detail-only field. A failed fetch is
    /// reported in [`Extraction::detail_failure`] and the record is built
    /// from listing fields alone.
    pub async fn extract(&self, entry: &ListingEntry) -> Extraction {
        if let FieldOutcome::Absent(reason) = book_id(entry) {
            tracing::debug!("Skipping entry without id: {}", reason);
            return Extraction {
                outcome: Err(Rejection::MissingId {
                    href: entry.detail_href.clone(),
                }),
                detail_failure: None,
            };
        }

        let detail = self.fetch_detail(entry).await;
        let detail_failure = detail.as_ref().err().cloned();

        Extraction {
            outcome: build_record(entry, detail.as_ref().ok(), &self.site_root),
            detail_failure,
        }
    }

    async fn fetch_detail(&self, entry: &ListingEntry) -> Result<DetailPage, TransportFailure> {
        let url = entry
            .detail_href
            .as_deref()
            .and_then(|href| resolve_link(href, &self.catalog_base))
            .ok_or_else(|| TransportFailure("unresolvable detail link".to_string()))?;

        let body = fetch_url(&self.client, url.as_str()).await.into_body()?;
        Ok(parse_detail_page(&body))
    }
}

/// Assembles a record from a listing entry and its optional detail page
///
/// This is where every absent field takes its default. Returns a
/// [`Rejection`] when id or title cannot be determined.
pub fn build_record(
    entry: &ListingEntry,
    detail: Option<&DetailPage>,
    site_root: &Url,
) -> Result<BookRecord, Rejection> {
    let id = book_id(entry).found().ok_or_else(|| Rejection::MissingId {
        href: entry.detail_href.clone(),
    })?;

    let title = title_field(entry, detail)
        .found()
        .ok_or(Rejection::MissingTitle { id })?;

    let price = from_detail(detail, |d| clean_price(d.price_text.as_deref()))
        .or_else(|| clean_price(entry.price_text.as_deref()));

    let availability = from_detail(detail, |d| {
        parse_availability(d.availability_text.as_deref())
    })
    .or_else(|| parse_availability(entry.availability_text.as_deref()));

    let rating = from_detail(detail, |d| parse_rating(d.rating_token.as_deref()))
        .or_else(|| parse_rating(entry.rating_token.as_deref()));

    let category = from_detail(detail, |d| {
        FieldOutcome::from_option(d.category.clone(), "breadcrumb has no category link")
    });

    let image_url = from_detail(detail, |d| image_field(d.image_src.as_deref(), site_root))
        .or_else(|| image_field(entry.image_src.as_deref(), site_root));

    for (name, reason) in [
        ("price", price.reason()),
        ("availability", availability.reason()),
        ("rating", rating.reason()),
        ("category", category.reason()),
        ("image_url", image_url.reason()),
    ] {
        if let Some(reason) = reason {
            tracing::debug!("Book {}: {} defaulted ({})", id, name, reason);
        }
    }

    Ok(BookRecord {
        id,
        title,
        category: category.unwrap_or_default(),
        price: price.unwrap_or_default(),
        rating: rating.unwrap_or_default(),
        availability: availability.unwrap_or_default(),
        image_url: image_url.map(String::from).unwrap_or_default(),
    })
}

fn from_detail<T>(
    detail: Option<&DetailPage>,
    read: impl FnOnce(&DetailPage) -> FieldOutcome<T>,
) -> FieldOutcome<T> {
    match detail {
        Some(page) => read(page),
        None => FieldOutcome::Absent("detail page unavailable"),
    }
}

fn book_id(entry: &ListingEntry) -> FieldOutcome<u32> {
    match entry.detail_href.as_deref() {
        Some(href) => {
            FieldOutcome::from_option(extract_book_id(href), "no numeric id in detail link")
        }
        None => FieldOutcome::Absent("entry has no detail link"),
    }
}

/// Listing anchor title first, detail heading second
fn title_field(entry: &ListingEntry, detail: Option<&DetailPage>) -> FieldOutcome<String> {
    FieldOutcome::from_option(entry.anchor_title.clone(), "no anchor title").or_else(|| {
        from_detail(detail, |d| {
            FieldOutcome::from_option(d.heading.clone(), "no heading")
        })
    })
}

/// Strips the mis-decoded currency glyph; the rest is kept verbatim
///
/// ```
/// use shelfscan::crawler::clean_price;
///
/// assert_eq!(clean_price(Some("Â£51.77")).found().as_deref(), Some("£51.77"));
/// ```
pub fn clean_price(text: Option<&str>) -> FieldOutcome<String> {
    let Some(text) = text else {
        return FieldOutcome::Absent("no price element");
    };

    let cleaned: String = text.chars().filter(|c| *c != PRICE_ARTIFACT).collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        FieldOutcome::Absent("empty price text")
    } else {
        FieldOutcome::Found(cleaned.to_string())
    }
}

/// Concatenates the digits of the availability text
///
/// ```
/// use shelfscan::crawler::parse_availability;
///
/// assert_eq!(parse_availability(Some("In stock (23 available)")).unwrap_or_default(), 23);
/// assert_eq!(parse_availability(Some("In stock")).unwrap_or_default(), 0);
/// ```
pub fn parse_availability(text: Option<&str>) -> FieldOutcome<u32> {
    let Some(text) = text else {
        return FieldOutcome::Absent("no availability element");
    };

    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return FieldOutcome::Absent("no digits in availability text");
    }

    FieldOutcome::from_option(digits.parse().ok(), "availability count out of range")
}

/// Maps a star-rating word to 1..=5
///
/// ```
/// use shelfscan::crawler::parse_rating;
///
/// assert_eq!(parse_rating(Some("Four")).unwrap_or_default(), 4);
/// assert_eq!(parse_rating(Some("Zero")).unwrap_or_default(), 0);
/// ```
pub fn parse_rating(token: Option<&str>) -> FieldOutcome<u8> {
    let Some(token) = token else {
        return FieldOutcome::Absent("no rating element");
    };

    let position = RATING_WORDS.iter().position(|word| *word == token);
    FieldOutcome::from_option(position.map(|i| i as u8 + 1), "unknown rating token")
}

fn image_field(src: Option<&str>, site_root: &Url) -> FieldOutcome<Url> {
    match src {
        Some(src) => FieldOutcome::from_option(
            resolve_against_root(src, site_root),
            "unresolvable image path",
        ),
        None => FieldOutcome::Absent("no image element"),
    }
}
