//! Read-only HTTP API over the book table
//!
//! The table is loaded once before the listener binds and shared with every
//! handler through [`AppState`].

mod error;
mod handlers;

pub use error::ApiError;
pub use handlers::{HEALTH_MESSAGE, NO_DATA_MESSAGE, NO_MATCH_MESSAGE, WELCOME_MESSAGE};

use crate::config::Config;
use crate::storage::BookTable;
use crate::ShelfError;
use axum::routing::get;
use axum::Router;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub table: Arc<BookTable>,
}

/// Builds the API router over a loaded table
pub fn router(table: Arc<BookTable>) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/api/v1/health", get(handlers::health))
        .route("/api/v1/books", get(handlers::list_books))
        .route("/api/v1/categories", get(handlers::list_categories))
        .route("/api/v1/books/search", get(handlers::search_books))
        .route("/api/v1/books/:id", get(handlers::get_book))
        .with_state(AppState { table })
        .layer(TraceLayer::new_for_http())
}

/// Loads the record file and serves the API until interrupted
///
/// A missing record file is not fatal; the service starts with an empty
/// table and lookups answer 503.
pub async fn serve(config: &Config) -> Result<(), ShelfError> {
    let table = Arc::new(BookTable::load(Path::new(&config.output.records_path)));
    let addr: SocketAddr = config
        .server
        .bind_address
        .parse()
        .map_err(|e| ShelfError::Server(format!("invalid bind address: {}", e)))?;

    let app = router(table);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(e) => {
            tracing::error!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
