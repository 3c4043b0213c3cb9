//! Integration tests for the crawler
//!
//! These tests use wiremock to stand up a fake catalog and run the full
//! walk, extraction and write cycle end-to-end.

use shelfscan::config::{Config, CrawlerConfig, OutputConfig, ServerConfig, UserAgentConfig};
use shelfscan::crawler::{crawl, Coordinator};
use shelfscan::state::WalkState;
use shelfscan::storage::read_records;
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointed at the mock catalog
fn create_test_config(base_url: &str, records_path: &Path) -> Config {
    Config {
        crawler: CrawlerConfig {
            catalog_url: format!("{}/catalogue/", base_url),
            start_page: "page-1.html".to_string(),
            site_root: format!("{}/", base_url),
            page_delay_ms: 0,
            page_delay_jitter_ms: 0,
            request_timeout_secs: 5,
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
            contact_email: "test@example.com".to_string(),
        },
        output: OutputConfig {
            records_path: records_path.display().to_string(),
        },
        server: ServerConfig::default(),
    }
}

/// One `article.product_pod` block
fn listing_entry(slug: &str, title: &str, rating: &str, price: &str) -> String {
    format!(
        r#"<li><article class="product_pod">
  <div class="image_container"><a href="{slug}/index.html"><img src="../media/cache/thumbs/{slug}.jpg" class="thumbnail"></a></div>
  <p class="star-rating {rating}"><i class="icon-star"></i></p>
  <h3><a href="{slug}/index.html" title="{title}">{title}</a></h3>
  <div class="product_price">
    <p class="price_color">{price}</p>
    <p class="instock availability"><i class="icon-ok"></i> In stock</p>
  </div>
</article></li>"#
    )
}

fn listing_page(entries: &[String], next: Option<&str>) -> String {
    let pager = match next {
        Some(href) => format!(r#"<ul class="pager"><li class="next"><a href="{}">next</a></li></ul>"#, href),
        None => String::new(),
    };
    format!(
        "<html><body><ol class=\"row\">{}</ol>{}</body></html>",
        entries.concat(),
        pager
    )
}

fn detail_page(title: &str, category: &str, available: u32, slug: &str) -> String {
    format!(
        r#"<html><body>
<ul class="breadcrumb">
  <li><a href="../../index.html">Home</a></li>
  <li><a href="../category/books_1/index.html">Books</a></li>
  <li><a href="../category/books/x_2/index.html">{category}</a></li>
  <li class="active">{title}</li>
</ul>
<div id="product_gallery"><div class="carousel-inner"><div class="item active">
  <img src="../../media/cache/full/{slug}.jpg" alt="{title}">
</div></div></div>
<div class="col-sm-6 product_main">
  <h1>{title}</h1>
  <p class="price_color">Â£51.77</p>
  <p class="instock availability"><i class="icon-ok"></i> In stock ({available} available)</p>
  <p class="star-rating Three"><i class="icon-star"></i></p>
</div>
</body></html>"#
    )
}

async fn mount_html(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .mount(server)
        .await;
}

async fn mount_status(server: &MockServer, route: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_crawl_two_pages() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let dir = TempDir::new().unwrap();
    let records_path = dir.path().join("data").join("books.csv");

    mount_html(
        &mock_server,
        "/catalogue/page-1.html",
        listing_page(
            &[
                listing_entry("a-light-in-the-attic_1000", "A Light in the Attic", "Three", "Â£51.77"),
                listing_entry("tipping-the-velvet_999", "Tipping the Velvet", "One", "Â£53.74"),
            ],
            Some("page-2.html"),
        ),
    )
    .await;
    mount_html(
        &mock_server,
        "/catalogue/page-2.html",
        listing_page(
            &[listing_entry("sharp-objects_997", "Sharp Objects", "Four", "Â£47.82")],
            None,
        ),
    )
    .await;
    mount_html(
        &mock_server,
        "/catalogue/a-light-in-the-attic_1000/index.html",
        detail_page("A Light in the Attic", "Poetry", 22, "attic"),
    )
    .await;
    mount_html(
        &mock_server,
        "/catalogue/tipping-the-velvet_999/index.html",
        detail_page("Tipping the Velvet", "Historical Fiction", 20, "velvet"),
    )
    .await;
    mount_html(
        &mock_server,
        "/catalogue/sharp-objects_997/index.html",
        detail_page("Sharp Objects", "Mystery", 20, "sharp"),
    )
    .await;

    let config = create_test_config(&base_url, &records_path);
    let stats = Coordinator::new(&config)
        .expect("Failed to create coordinator")
        .run()
        .await
        .expect("Crawl failed");

    assert_eq!(stats.walk_state, WalkState::Finished);
    assert_eq!(stats.pages_walked, 2);
    assert_eq!(stats.entries_seen, 3);
    assert_eq!(stats.records_written, 3);
    assert_eq!(stats.rejected, 0);
    assert_eq!(stats.detail_failures, 0);
    assert!(stats.finished_at.is_some());

    let content = std::fs::read_to_string(&records_path).unwrap();
    assert_eq!(
        content.lines().next(),
        Some("id,title,category,price,rating,availability,image_url")
    );

    let records = read_records(&records_path).unwrap();
    let ids: Vec<u32> = records.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![1000, 999, 997]);

    let first = &records[0];
    assert_eq!(first.title, "A Light in the Attic");
    assert_eq!(first.category, "Poetry");
    assert_eq!(first.price, "£51.77");
    assert_eq!(first.rating, 3);
    assert_eq!(first.availability, 22);
    assert_eq!(
        first.image_url,
        format!("{}/media/cache/full/attic.jpg", base_url)
    );

    assert_eq!(records[1].category, "Historical Fiction");
    assert_eq!(records[2].category, "Mystery");
}

#[tokio::test]
async fn test_listing_failure_keeps_partial_results() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let dir = TempDir::new().unwrap();
    let records_path = dir.path().join("books.csv");

    mount_html(
        &mock_server,
        "/catalogue/page-1.html",
        listing_page(
            &[listing_entry("sharp-objects_997", "Sharp Objects", "Four", "Â£47.82")],
            Some("page-2.html"),
        ),
    )
    .await;
    mount_status(&mock_server, "/catalogue/page-2.html", 500).await;
    mount_html(
        &mock_server,
        "/catalogue/sharp-objects_997/index.html",
        detail_page("Sharp Objects", "Mystery", 20, "sharp"),
    )
    .await;

    let config = create_test_config(&base_url, &records_path);
    let stats = crawl(&config).await.expect("Crawl failed");

    assert_eq!(stats.walk_state, WalkState::Aborted);
    assert_eq!(stats.pages_walked, 1);
    assert_eq!(stats.records_written, 1);

    let records = read_records(&records_path).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, 997);
}

#[tokio::test]
async fn test_unreachable_first_page_writes_empty_file() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let dir = TempDir::new().unwrap();
    let records_path = dir.path().join("books.csv");

    mount_status(&mock_server, "/catalogue/page-1.html", 503).await;

    let config = create_test_config(&base_url, &records_path);
    let stats = crawl(&config).await.expect("Crawl failed");

    assert_eq!(stats.walk_state, WalkState::Aborted);
    assert_eq!(stats.pages_walked, 0);
    assert_eq!(stats.records_written, 0);
    assert_eq!(
        std::fs::read_to_string(&records_path).unwrap(),
        "id,title,category,price,rating,availability,image_url\n"
    );
}

#[tokio::test]
async fn test_detail_failure_falls_back_to_listing() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let dir = TempDir::new().unwrap();
    let records_path = dir.path().join("books.csv");

    mount_html(
        &mock_server,
        "/catalogue/page-1.html",
        listing_page(
            &[listing_entry("soumission_998", "Soumission", "One", "Â£50.10")],
            None,
        ),
    )
    .await;
    mount_status(&mock_server, "/catalogue/soumission_998/index.html", 404).await;

    let config = create_test_config(&base_url, &records_path);
    let stats = crawl(&config).await.expect("Crawl failed");

    assert_eq!(stats.walk_state, WalkState::Finished);
    assert_eq!(stats.detail_failures, 1);
    assert_eq!(stats.records_written, 1);

    let records = read_records(&records_path).unwrap();
    let record = &records[0];
    assert_eq!(record.id, 998);
    assert_eq!(record.title, "Soumission");
    assert_eq!(record.category, "");
    assert_eq!(record.price, "£50.10");
    assert_eq!(record.rating, 1);
    assert_eq!(record.availability, 0);
    assert_eq!(
        record.image_url,
        format!("{}/media/cache/thumbs/soumission_998.jpg", base_url)
    );
}

#[tokio::test]
async fn test_repeated_and_unidentified_entries() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let dir = TempDir::new().unwrap();
    let records_path = dir.path().join("books.csv");

    mount_html(
        &mock_server,
        "/catalogue/page-1.html",
        listing_page(
            &[
                listing_entry("sharp-objects_997", "Sharp Objects", "Four", "Â£47.82"),
                listing_entry("mystery-book", "No Id Here", "Two", "Â£10.00"),
                listing_entry("sharp-objects_997", "Sharp Objects", "Four", "Â£47.82"),
            ],
            None,
        ),
    )
    .await;
    mount_html(
        &mock_server,
        "/catalogue/sharp-objects_997/index.html",
        detail_page("Sharp Objects", "Mystery", 20, "sharp"),
    )
    .await;

    let config = create_test_config(&base_url, &records_path);
    let stats = crawl(&config).await.expect("Crawl failed");

    assert_eq!(stats.entries_seen, 3);
    assert_eq!(stats.rejected, 1);
    assert_eq!(stats.duplicates, 1);
    assert_eq!(stats.records_written, 1);

    let records = read_records(&records_path).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, 997);
}

#[tokio::test]
async fn test_requests_carry_user_agent() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let dir = TempDir::new().unwrap();
    let records_path = dir.path().join("books.csv");

    Mock::given(method("GET"))
        .and(path("/catalogue/page-1.html"))
        .and(header(
            "user-agent",
            "TestBot/1.0.0 (+https://example.com/contact; test@example.com)",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(&[], None)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base_url, &records_path);
    let stats = crawl(&config).await.expect("Crawl failed");

    assert_eq!(stats.walk_state, WalkState::Finished);
    assert_eq!(stats.pages_walked, 1);
    assert_eq!(stats.entries_seen, 0);
}
