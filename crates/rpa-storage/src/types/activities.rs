//! Activity types.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::Collection;
use crate::Record;

/// Field holding an activity's image URLs.
pub const ACTIVITY_IMAGES_FIELD: &str = "activityImages";

/// Activity record
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub activity_name: String,
    pub location: String,
    pub date: NaiveDate,
    pub activity_summary: String,
    #[serde(default)]
    pub activity_images: Vec<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Record for Activity {
    const COLLECTION: Collection = Collection::Activities;
}
