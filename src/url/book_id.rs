use url::Url;

/// Extracts a book's source-assigned id from its detail-page link
///
/// Detail pages live at paths like `a-light-in-the-attic_1000/index.html`
/// or `book_7.html`. The id is the numeric token after the last `_` in the
/// nearest path segment that carries one, with any file extension removed.
/// Segments are scanned from the end so a trailing `index.html` is skipped.
///
/// # Examples
///
/// ```
/// use shelfscan::url::extract_book_id;
///
/// assert_eq!(extract_book_id("a-light-in-the-attic_1000/index.html"), Some(1000));
/// assert_eq!(extract_book_id("book_7.html"), Some(7));
/// assert_eq!(extract_book_id("page-2.html"), None);
/// ```
pub fn extract_book_id(href: &str) -> Option<u32> {
    let href = href.trim();

    // Only the path is searched; hosts like 127.0.0.1 must never match
    let path = match Url::parse(href) {
        Ok(url) => url.path().to_string(),
        Err(_) => href
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .to_string(),
    };

    path.split('/')
        .rev()
        .filter(|segment| !segment.is_empty())
        .find_map(segment_id)
}

/// Parses the id token out of a single path segment
fn segment_id(segment: &str) -> Option<u32> {
    let stem = segment.split('.').next().unwrap_or(segment);
    let token = stem.rsplit('_').next().unwrap_or(stem);

    if token.is_empty() || !token.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    token.parse().ok()
}
