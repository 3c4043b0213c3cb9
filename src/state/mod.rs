//! State module for tracking crawl and service lifecycles
//!
//! # Components
//!
//! - `WalkState`: where the page walker is (walking, finished, aborted)
//! - `TableState`: whether the query service's table has been loaded

mod table_state;
mod walk_state;

// Re-export main types
pub use table_state::TableState;
pub use walk_state::WalkState;
