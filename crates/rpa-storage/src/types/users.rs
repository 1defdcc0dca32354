//! Registry user types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Collection;
use crate::Record;

/// Field holding the E.164 phone number of a registered user.
pub const PHONE_NUMBER_FIELD: &str = "phoneNumber";

/// A user permitted to sign in, keyed by phone number.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredUser {
    pub phone_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Record for RegisteredUser {
    const COLLECTION: Collection = Collection::Users;
}
