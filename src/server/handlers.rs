//! Request handlers for the book API

use crate::server::error::ApiError;
use crate::server::AppState;
use crate::storage::SearchQuery;
use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Json, Response};
use serde_json::{json, Value};

pub const WELCOME_MESSAGE: &str =
    "Welcome to the book catalog API. Endpoints live under /api/v1.";
pub const HEALTH_MESSAGE: &str = "The API is running normally.";
pub const NO_DATA_MESSAGE: &str = "No book data found.";
pub const NO_MATCH_MESSAGE: &str = "No books matched the given criteria.";

fn message(text: &str) -> Response {
    Json(json!({ "message": text })).into_response()
}

pub async fn root() -> Json<Value> {
    Json(json!({ "message": WELCOME_MESSAGE }))
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "message": HEALTH_MESSAGE }))
}

pub async fn list_books(State(state): State<AppState>) -> Response {
    if state.table.is_empty() {
        return message(NO_DATA_MESSAGE);
    }
    Json(state.table.list_all()).into_response()
}

pub async fn list_categories(State(state): State<AppState>) -> Response {
    if state.table.is_empty() {
        return message(NO_DATA_MESSAGE);
    }
    Json(json!({ "categories": state.table.list_categories() })).into_response()
}

pub async fn search_books(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Response, ApiError> {
    let hits = state.table.search(&query)?;
    if hits.is_empty() {
        return Ok(message(NO_MATCH_MESSAGE));
    }
    Ok(Json(hits).into_response())
}

/// `id` is taken as text so a non-numeric id gets the JSON error body too
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id: u32 = id.trim().parse().map_err(|_| ApiError::InvalidId(id.clone()))?;
    let book = state.table.get_by_id(id)?;
    Ok(Json(book).into_response())
}
