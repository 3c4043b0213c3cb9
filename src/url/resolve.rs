use url::Url;

/// Resolves a link href against a base URL
///
/// Returns None if the link should be ignored:
/// - empty or fragment-only hrefs
/// - javascript:, mailto:, tel: and data: schemes
/// - hrefs that fail to resolve
/// - non-HTTP(S) URLs after resolution
///
/// # Examples
///
/// ```
/// use shelfscan::url::resolve_link;
/// use url::Url;
///
/// let base = Url::parse("https://books.toscrape.com/catalogue/").unwrap();
/// let next = resolve_link("page-2.html", &base).unwrap();
/// assert_eq!(next.as_str(), "https://books.toscrape.com/catalogue/page-2.html");
/// ```
pub fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    let absolute_url = base_url.join(href).ok()?;
    match absolute_url.scheme() {
        "http" | "https" => Some(absolute_url),
        _ => None,
    }
}

/// Resolves an asset path against the site root
///
/// Catalog pages reference images with paths relative to their own
/// location (`../../media/...` on detail pages, `../media/...` on listing
/// pages). Every leading `../` and `./` is dropped so the remainder always
/// lands under the site root regardless of which page it came from.
/// Absolute http(s) URLs are returned unchanged.
///
/// # Examples
///
/// ```
/// use shelfscan::url::resolve_against_root;
/// use url::Url;
///
/// let root = Url::parse("https://books.toscrape.com/").unwrap();
/// let img = resolve_against_root("../../media/cache/fe/72/cover.jpg", &root).unwrap();
/// assert_eq!(img.as_str(), "https://books.toscrape.com/media/cache/fe/72/cover.jpg");
/// ```
pub fn resolve_against_root(src: &str, site_root: &Url) -> Option<Url> {
    let src = src.trim();
    if src.is_empty() {
        return None;
    }

    if let Ok(absolute) = Url::parse(src) {
        return matches!(absolute.scheme(), "http" | "https").then_some(absolute);
    }

    let mut rest = src;
    loop {
        if let Some(stripped) = rest.strip_prefix("../") {
            rest = stripped;
        } else if let Some(stripped) = rest.strip_prefix("./") {
            rest = stripped;
        } else {
            break;
        }
    }

    site_root.join(rest.trim_start_matches('/')).ok()
}
