//! E.164 phone numbers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::IdentityError;

const MIN_DIGITS: usize = 8;
const MAX_DIGITS: usize = 15; // E.164 upper bound, country code included
const NATIONAL_DIGITS: usize = 10;

/// Fully-qualified phone number, always `+` followed by 8–15 digits.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PhoneNumber(String);

fn strip_separators(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')' | '.'))
        .collect()
}

impl PhoneNumber {
    /// Parse an already fully-qualified number such as `+91 12345-67890`.
    pub fn parse(raw: &str) -> Result<Self, IdentityError> {
        let cleaned = strip_separators(raw);
        let digits = cleaned
            .strip_prefix('+')
            .ok_or(IdentityError::InvalidPhoneNumber)?;
        Self::from_digits(digits)
    }

    /// Qualify user input from a phone field.
    ///
    /// Input with a leading `+` is parsed as-is. Bare digits that already start
    /// with `country_code` and are longer than a national number are taken to
    /// include it; anything shorter gets `country_code` prefixed.
    pub fn from_input(raw: &str, country_code: &str) -> Result<Self, IdentityError> {
        let cleaned = strip_separators(raw);
        if cleaned.starts_with('+') {
            return Self::parse(&cleaned);
        }
        if cleaned.len() > NATIONAL_DIGITS && cleaned.starts_with(country_code) {
            Self::from_digits(&cleaned)
        } else {
            Self::from_digits(&format!("{}{}", country_code, cleaned))
        }
    }

    fn from_digits(digits: &str) -> Result<Self, IdentityError> {
        let valid = (MIN_DIGITS..=MAX_DIGITS).contains(&digits.len())
            && digits.chars().all(|c| c.is_ascii_digit())
            && !digits.starts_with('0');
        if !valid {
            return Err(IdentityError::InvalidPhoneNumber);
        }
        Ok(PhoneNumber(format!("+{}", digits)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for PhoneNumber {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for PhoneNumber {
    type Error = IdentityError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<PhoneNumber> for String {
    fn from(p: PhoneNumber) -> Self {
        p.0
    }
}
