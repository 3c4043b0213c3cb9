//! URL handling module for Shelfscan
//!
//! This module resolves catalog links against their base, resolves asset
//! paths against the site root, and pulls book ids out of detail-page paths.

mod book_id;
mod resolve;

// Re-export main functions
pub use book_id::extract_book_id;
pub use resolve::{resolve_against_root, resolve_link};
