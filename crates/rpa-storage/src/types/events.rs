//! Event types.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::Collection;
use crate::Record;

/// Field events are ordered by.
pub const EVENT_DATE_TIME_FIELD: &str = "dateTime";

/// Scheduled event
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub title: String,
    pub summary: String,
    pub place: String,
    pub date_time: NaiveDateTime, // Local wall-clock time of the event
}

impl Record for Event {
    const COLLECTION: Collection = Collection::Events;
}
