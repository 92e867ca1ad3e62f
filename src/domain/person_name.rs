use std::str::FromStr;

use unicode_segmentation::UnicodeSegmentation;

use crate::error::{Error, Result};

const MIN_LEN: usize = 2;
const MAX_LEN: usize = 256;

/// A member name as typed into the member form
#[derive(Debug, Clone, PartialEq)]
pub struct PersonName(String);

impl AsRef<str> for PersonName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<PersonName> for String {
    fn from(value: PersonName) -> Self {
        value.0
    }
}

impl FromStr for PersonName {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        let value = value.trim();
        let len = value.graphemes(true).count();

        if len == 0 {
            return Err(Error::ParsingError("Name is required".into()));
        }
        if len < MIN_LEN {
            return Err(Error::ParsingError(format!(
                "Name must be at least {} characters",
                MIN_LEN
            )));
        }
        if len > MAX_LEN {
            return Err(Error::ParsingError("Name too long".into()));
        }
        Ok(Self(value.to_string()))
    }
}
