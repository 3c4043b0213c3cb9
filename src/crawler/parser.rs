//! HTML parser for catalog listing and detail pages
//!
//! This module turns raw markup into owned, plain-data views of the two page
//! kinds the crawler visits. No normalization happens here: each marker is
//! reported verbatim (trimmed) or as `None` when the element is missing. The
//! extractor decides what an absent marker means for the record.

use crate::url::resolve_link;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// One book's summary block on a listing page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingEntry {
    /// Raw href of the detail-page link (`h3 > a`)
    pub detail_href: Option<String>,

    /// The link's `title` attribute, which carries the untruncated title
    pub anchor_title: Option<String>,

    /// Text of `p.price_color`
    pub price_text: Option<String>,

    /// Text of `p.availability`
    pub availability_text: Option<String>,

    /// Secondary class token of `p.star-rating` (e.g. "Three")
    pub rating_token: Option<String>,

    /// `src` of the thumbnail image
    pub image_src: Option<String>,
}

/// A parsed listing page
#[derive(Debug, Clone, Default)]
pub struct ListingPage {
    /// Entries in page order
    pub entries: Vec<ListingEntry>,

    /// Absolute URL of the next listing page, if the page links to one
    pub next_url: Option<Url>,
}

/// Fields read from a book's detail page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailPage {
    /// Text of the main `h1`
    pub heading: Option<String>,

    /// Text of the first `p.price_color`
    pub price_text: Option<String>,

    /// Text of the first `p.availability`
    pub availability_text: Option<String>,

    /// Secondary class token of the first `p.star-rating`
    pub rating_token: Option<String>,

    /// Text of the third breadcrumb link
    pub category: Option<String>,

    /// `src` of the primary product image
    pub image_src: Option<String>,
}

/// Parses a listing page
///
/// # Arguments
///
/// * `html` - The page markup
/// * `catalog_base` - Base URL that the "next" link is resolved against
///
/// # Example
///
/// ```
/// use shelfscan::crawler::parse_listing_page;
/// use url::Url;
///
/// let html = r#"<ol><li><article class="product_pod">
///     <h3><a href="sharp-objects_997/index.html" title="Sharp Objects">Sharp...</a></h3>
/// </article></li></ol>
/// <ul class="pager"><li class="next"><a href="page-2.html">next</a></li></ul>"#;
/// let base = Url::parse("https://books.toscrape.com/catalogue/").unwrap();
/// let page = parse_listing_page(html, &base);
/// assert_eq!(page.entries.len(), 1);
/// assert_eq!(page.next_url.unwrap().as_str(), "https://books.toscrape.com/catalogue/page-2.html");
/// ```
pub fn parse_listing_page(html: &str, catalog_base: &Url) -> ListingPage {
    let document = Html::parse_document(html);

    let entries = match Selector::parse("article.product_pod") {
        Ok(selector) => document.select(&selector).map(parse_listing_entry).collect(),
        Err(_) => Vec::new(),
    };

    let next_url = first_attr(document.root_element(), "li.next a", "href")
        .and_then(|href| resolve_link(&href, catalog_base));

    ListingPage { entries, next_url }
}

/// Reads every marker of a single `article.product_pod`
fn parse_listing_entry(article: ElementRef<'_>) -> ListingEntry {
    ListingEntry {
        detail_href: first_attr(article, "h3 a", "href"),
        anchor_title: first_attr(article, "h3 a", "title"),
        price_text: first_text(article, "p.price_color"),
        availability_text: first_text(article, "p.availability"),
        rating_token: rating_token(article),
        image_src: first_attr(article, "div.image_container img", "src")
            .or_else(|| first_attr(article, "img", "src")),
    }
}

/// Parses a book's detail page
pub fn parse_detail_page(html: &str) -> DetailPage {
    let document = Html::parse_document(html);
    let root = document.root_element();

    DetailPage {
        heading: first_text(root, "div.product_main h1").or_else(|| first_text(root, "h1")),
        price_text: first_text(root, "p.price_color"),
        availability_text: first_text(root, "p.availability"),
        rating_token: rating_token(root),
        category: breadcrumb_category(root),
        image_src: first_attr(root, "div.item.active img", "src")
            .or_else(|| first_attr(root, "#product_gallery img", "src")),
    }
}

/// Third link of `ul.breadcrumb` (Home > Books > Category > Title)
fn breadcrumb_category(root: ElementRef<'_>) -> Option<String> {
    let breadcrumb = Selector::parse("ul.breadcrumb").ok()?;
    let link = Selector::parse("a").ok()?;

    let list = root.select(&breadcrumb).next()?;
    list.select(&link)
        .nth(2)
        .map(element_text)
        .filter(|s| !s.is_empty())
}

/// The class token beside `star-rating`, e.g. `Three` in `class="star-rating Three"`
fn rating_token(scope: ElementRef<'_>) -> Option<String> {
    let selector = Selector::parse("p.star-rating").ok()?;
    let element = scope.select(&selector).next()?;

    element
        .value()
        .attr("class")?
        .split_whitespace()
        .find(|token| *token != "star-rating")
        .map(str::to_string)
}

/// Trimmed text of the first element matching `css`
fn first_text(scope: ElementRef<'_>, css: &str) -> Option<String> {
    let selector = Selector::parse(css).ok()?;
    scope
        .select(&selector)
        .next()
        .map(element_text)
        .filter(|s| !s.is_empty())
}

/// Trimmed attribute of the first element matching `css` that carries it
fn first_attr(scope: ElementRef<'_>, css: &str, attr: &str) -> Option<String> {
    let selector = Selector::parse(css).ok()?;
    scope
        .select(&selector)
        .find_map(|element| element.value().attr(attr))
        .map(|value| value.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
