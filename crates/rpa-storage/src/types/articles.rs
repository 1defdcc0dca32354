//! Article types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Collection;
use crate::Record;

/// Field holding an article's attachment image URLs.
pub const ARTICLE_IMAGES_FIELD: &str = "articleImages";

/// Article record
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub title: String,
    pub content: String,
    pub article_summary: String,
    pub posted_by: String,
    #[serde(default)]
    pub image_url: Option<String>, // Cover image
    #[serde(default)]
    pub article_images: Vec<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Record for Article {
    const COLLECTION: Collection = Collection::Articles;
}
