//! Integration tests for the book API
//!
//! Requests are driven through the router with `tower::ServiceExt::oneshot`,
//! so no socket is bound.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use shelfscan::server::{router, NO_DATA_MESSAGE, NO_MATCH_MESSAGE};
use shelfscan::storage::{write_records, BookRecord, BookTable};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

fn book(id: u32, title: &str, category: &str) -> BookRecord {
    BookRecord {
        id,
        title: title.to_string(),
        category: category.to_string(),
        price: "£51.77".to_string(),
        rating: 3,
        availability: 22,
        image_url: format!("https://books.toscrape.com/media/{}.jpg", id),
    }
}

fn sample_table() -> Arc<BookTable> {
    Arc::new(BookTable::from_records(vec![
        book(1000, "A Light in the Attic", "Poetry"),
        book(999, "Tipping the Velvet", "Historical Fiction"),
        book(997, "Sharp Objects", "Mystery"),
        book(996, "The Dirty Little Secrets", "Mystery"),
    ]))
}

fn missing_table() -> Arc<BookTable> {
    let dir = TempDir::new().unwrap();
    Arc::new(BookTable::load(&dir.path().join("books.csv")))
}

async fn get(table: Arc<BookTable>, uri: &str) -> (StatusCode, Value) {
    let response = router(table)
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap();
    (status, body)
}

#[tokio::test]
async fn test_root_and_health() {
    let (status, body) = get(sample_table(), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].is_string());

    let (status, body) = get(sample_table(), "/api/v1/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_list_books() {
    let (status, body) = get(sample_table(), "/api/v1/books").await;
    assert_eq!(status, StatusCode::OK);

    let books = body.as_array().unwrap();
    assert_eq!(books.len(), 4);
    assert_eq!(
        books[0],
        json!({
            "id": 1000,
            "title": "A Light in the Attic",
            "category": "Poetry",
            "price": "£51.77",
            "rating": 3,
            "availability": 22,
            "image_url": "https://books.toscrape.com/media/1000.jpg",
        })
    );
}

#[tokio::test]
async fn test_empty_table_messages() {
    let (status, body) = get(missing_table(), "/api/v1/books").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": NO_DATA_MESSAGE }));

    let (status, body) = get(missing_table(), "/api/v1/categories").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": NO_DATA_MESSAGE }));
}

#[tokio::test]
async fn test_categories_first_seen_order() {
    let (status, body) = get(sample_table(), "/api/v1/categories").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "categories": ["Poetry", "Historical Fiction", "Mystery"] })
    );
}

#[tokio::test]
async fn test_search_by_title() {
    let (status, body) = get(sample_table(), "/api/v1/books/search?title=SHARP").await;
    assert_eq!(status, StatusCode::OK);

    let books = body.as_array().unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0]["id"], 997);
}

#[tokio::test]
async fn test_search_by_category_and_title() {
    let (status, body) = get(sample_table(), "/api/v1/books/search?category=mystery").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (status, body) = get(
        sample_table(),
        "/api/v1/books/search?title=dirty&category=Mystery",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let books = body.as_array().unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0]["id"], 996);
}

#[tokio::test]
async fn test_search_no_match() {
    let (status, body) = get(sample_table(), "/api/v1/books/search?title=zzz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": NO_MATCH_MESSAGE }));
}

#[tokio::test]
async fn test_search_requires_criteria() {
    let (status, body) = get(sample_table(), "/api/v1/books/search").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].is_string());

    let (status, _) = get(sample_table(), "/api/v1/books/search?title=&category=").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_book_by_id() {
    let (status, body) = get(sample_table(), "/api/v1/books/999").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Tipping the Velvet");
    assert_eq!(body["category"], "Historical Fiction");
}

#[tokio::test]
async fn test_get_book_errors() {
    let (status, body) = get(sample_table(), "/api/v1/books/12345").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["detail"].is_string());

    let (status, body) = get(sample_table(), "/api/v1/books/abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].is_string());

    let (status, body) = get(missing_table(), "/api/v1/books/1").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn test_serves_written_record_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("books.csv");
    write_records(&path, &[book(5, "Olio", "Poetry")]).unwrap();

    let table = Arc::new(BookTable::load(&path));
    let (status, body) = get(table, "/api/v1/books/5").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Olio");
}
