//! Display formatting for stored timestamps.
//!
//! Inputs are the strings found in documents: RFC 3339 timestamps, plain
//! `YYYY-MM-DD` dates, or local `YYYY-MM-DDTHH:MM` date-times. Timestamps with an
//! offset are shown in that offset's wall-clock time.

use chrono::{DateTime, Datelike, NaiveDateTime, NaiveTime, Timelike};

use crate::validation::{parse_date, parse_date_time};

fn parse_wall_clock(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.naive_local())
        .ok()
        .or_else(|| parse_date_time(value))
        .or_else(|| parse_date(value).map(|d| d.and_time(NaiveTime::MIN)))
}

/// `DD/MM/YYYY`, or an empty string when the input is empty or unparsable.
pub fn format_date(value: &str) -> String {
    match parse_wall_clock(value) {
        Some(dt) => format!("{:02}/{:02}/{}", dt.day(), dt.month(), dt.year()),
        None => String::new(),
    }
}

/// `DD-MM-YYYY h:MM AM|PM`, or an empty string when the input is empty or unparsable.
pub fn format_date_time_12hr(value: &str) -> String {
    let Some(dt) = parse_wall_clock(value) else {
        return String::new();
    };
    let (pm, hour) = dt.hour12();
    format!(
        "{:02}-{:02}-{} {}:{:02} {}",
        dt.day(),
        dt.month(),
        dt.year(),
        hour,
        dt.minute(),
        if pm { "PM" } else { "AM" }
    )
}
