use std::str::FromStr;

use regex::Regex;

use crate::error::{Error, Result};

lazy_static::lazy_static! {
    static ref PHONE_REGEX: Regex = Regex::new(r"^[0-9\-+() ]{7,20}$").unwrap();
}

/// A phone number as accepted by the member form: 7 to 20 characters of digits,
/// spaces, `+`, `-` and parentheses
#[derive(Debug, Clone, PartialEq)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Digits only, the form used in messaging links
    pub fn digits(&self) -> String {
        digits_only(&self.0)
    }
}

impl FromStr for PhoneNumber {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        if value.trim().is_empty() {
            return Err(Error::ParsingError("Phone is required".into()));
        }
        if !PHONE_REGEX.is_match(value) {
            return Err(Error::ParsingError("Phone number of incorrect format".into()));
        }
        Ok(Self(value.to_string()))
    }
}

impl AsRef<str> for PhoneNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<PhoneNumber> for String {
    fn from(value: PhoneNumber) -> Self {
        value.0
    }
}

/// Strip every non-digit character from a stored phone value
pub fn digits_only(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}
