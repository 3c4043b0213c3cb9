use crate::QueryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;

/// Error answered to an API client as `{"detail": ...}`
#[derive(Debug)]
pub enum ApiError {
    Query(QueryError),
    InvalidId(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Query(QueryError::MissingCriteria) => StatusCode::BAD_REQUEST,
            Self::Query(QueryError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Query(QueryError::Unavailable) => StatusCode::SERVICE_UNAVAILABLE,
            Self::InvalidId(_) => StatusCode::BAD_REQUEST,
        }
    }

    pub fn detail(&self) -> String {
        match self {
            Self::Query(e) => e.to_string(),
            Self::InvalidId(raw) => format!("Book id must be a non-negative integer, got {:?}", raw),
        }
    }
}

impl From<QueryError> for ApiError {
    fn from(e: QueryError) -> Self {
        Self::Query(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!("{}: {}", status, self.detail());
        }
        (status, Json(json!({ "detail": self.detail() }))).into_response()
    }
}
