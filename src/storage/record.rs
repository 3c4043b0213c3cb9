use serde::{Deserialize, Serialize};

/// Column names of the record file, in persisted order
pub const COLUMNS: [&str; 7] = [
    "id",
    "title",
    "category",
    "price",
    "rating",
    "availability",
    "image_url",
];

/// One book, as persisted and as served
///
/// Field order defines the CSV column order and must match [`COLUMNS`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookRecord {
    /// Source-assigned id, unique across a crawl
    pub id: u32,

    /// Non-empty title
    pub title: String,

    /// Category from the detail page breadcrumb; empty when unknown
    #[serde(default)]
    pub category: String,

    /// Displayed price, verbatim apart from the stripped encoding artifact
    #[serde(default)]
    pub price: String,

    /// 1..=5 stars, 0 when unknown
    #[serde(default)]
    pub rating: u8,

    /// Copies in stock, 0 when unknown
    #[serde(default)]
    pub availability: u32,

    /// Absolute cover image URL; empty when the page had no image
    #[serde(default)]
    pub image_url: String,
}
