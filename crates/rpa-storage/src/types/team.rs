//! Team member types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Collection;
use crate::Record;

/// Team member profile
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub full_name: String,
    pub role: String,
    pub phone_number: String,
    #[serde(default)]
    pub profile_picture: Option<String>, // Download URL of the uploaded picture
    pub created_at: DateTime<Utc>,
}

impl Record for TeamMember {
    const COLLECTION: Collection = Collection::Team;
}
