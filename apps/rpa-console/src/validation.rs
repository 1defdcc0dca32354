//! Form validation helpers.
//!
//! Validation is local and never reaches a backend. Every form validator
//! collects all field errors at once.

use std::fmt;
use std::sync::OnceLock;

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;

/// Field errors in the order the form declares its fields.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldErrors(Vec<(&'static str, String)>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push((field, message.into()));
    }

    /// Record the first failing check for `field`, if any.
    pub fn check(&mut self, field: &'static str, result: Option<String>) {
        if let Some(message) = result {
            self.add(field, message);
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, m)| m.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(f, m)| (*f, m.as_str()))
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (field, message)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", field, message)?;
        }
        Ok(())
    }
}

fn contact_number_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^\+?[\d\s-]{10,}$").ok())
        .as_ref()
}

/// Loose contact number check: optional `+`, then at least 10 digits, spaces or dashes.
pub fn is_valid_contact_number(value: &str) -> bool {
    contact_number_pattern().is_some_and(|re| re.is_match(value))
}

/// `message` when `value` is blank.
pub fn required(value: &str, message: &str) -> Option<String> {
    value.trim().is_empty().then(|| message.to_string())
}

/// Required, then at least `min` characters (untrimmed).
pub fn required_min(value: &str, min: usize, missing: &str, too_short: &str) -> Option<String> {
    required(value, missing).or_else(|| (value.chars().count() < min).then(|| too_short.to_string()))
}

/// Required, then matching the contact number pattern.
pub fn contact_number(value: &str, missing: &str, invalid: &str) -> Option<String> {
    required(value, missing).or_else(|| (!is_valid_contact_number(value)).then(|| invalid.to_string()))
}

/// Parse a `YYYY-MM-DD` date input.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

/// Parse a `YYYY-MM-DDTHH:MM[:SS]` date-time input (a space separator is also accepted).
pub fn parse_date_time(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_number_pattern() {
        assert!(is_valid_contact_number("+91 98765 43210"));
        assert!(is_valid_contact_number("98765-43210"));
        assert!(is_valid_contact_number("9876543210"));
        assert!(!is_valid_contact_number("12345"));
        assert!(!is_valid_contact_number("98765abc43210"));
        assert!(!is_valid_contact_number("++919876543210"));
    }

    #[test]
    fn test_required_min_checks_in_order() {
        assert_eq!(
            required_min("  ", 2, "Full name is required", "too short"),
            Some("Full name is required".to_string())
        );
        assert_eq!(
            required_min("A", 2, "Full name is required", "Name must be at least 2 characters"),
            Some("Name must be at least 2 characters".to_string())
        );
        assert_eq!(required_min("Asha", 2, "missing", "short"), None);
    }

    #[test]
    fn test_field_errors_collects_all() {
        let mut errors = FieldErrors::new();
        errors.check("fullName", required("", "Full name is required"));
        errors.check("role", required("Secretary", "Role is required"));
        errors.check(
            "phoneNumber",
            contact_number("123", "Phone number is required", "Please enter a valid phone number"),
        );

        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("fullName"), Some("Full name is required"));
        assert_eq!(errors.get("role"), None);
        assert_eq!(
            errors.get("phoneNumber"),
            Some("Please enter a valid phone number")
        );
        assert_eq!(
            errors.to_string(),
            "fullName: Full name is required; phoneNumber: Please enter a valid phone number"
        );
    }

    #[test]
    fn test_parse_inputs() {
        assert_eq!(
            parse_date("2024-05-01"),
            NaiveDate::from_ymd_opt(2024, 5, 1)
        );
        assert_eq!(parse_date("01/05/2024"), None);
        assert!(parse_date_time("2024-05-01T18:30").is_some());
        assert!(parse_date_time("2024-05-01 18:30:15").is_some());
        assert!(parse_date_time("tomorrow").is_none());
    }
}
