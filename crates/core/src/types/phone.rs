//! Indian mobile phone numbers.

use core::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Ten digits, the first of which is 6, 7, 8 or 9.
static MOBILE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[6-9][0-9]{9}$").expect("Invalid regex"));

/// Errors that can occur when parsing a [`Phone`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    /// The input string is empty.
    #[error("phone number cannot be empty")]
    Empty,
    /// The input is not a 10-digit mobile number starting with 6-9.
    #[error("phone number must be 10 digits starting with 6, 7, 8 or 9")]
    Invalid,
}

/// A 10-digit Indian mobile number, without country code.
///
/// ```
/// use prana_core::Phone;
///
/// assert!(Phone::parse("9123456789").is_ok());
/// assert!(Phone::parse("5123456789").is_err()); // leading digit below 6
/// assert!(Phone::parse("912345678").is_err());  // nine digits
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Phone(String);

impl Phone {
    /// Parse a `Phone` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty or is not exactly ten ASCII
    /// digits beginning with 6, 7, 8 or 9.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        if s.is_empty() {
            return Err(PhoneError::Empty);
        }
        if !MOBILE_RE.is_match(s) {
            return Err(PhoneError::Invalid);
        }
        Ok(Self(s.to_owned()))
    }

    /// Returns the number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Phone {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_leading_digits() {
        for first in ['6', '7', '8', '9'] {
            let number = format!("{first}123456789");
            assert!(Phone::parse(&number).is_ok(), "{number} should be valid");
        }
    }

    #[test]
    fn test_invalid_leading_digits() {
        for first in ['0', '1', '2', '3', '4', '5'] {
            let number = format!("{first}123456789");
            assert_eq!(Phone::parse(&number), Err(PhoneError::Invalid));
        }
    }

    #[test]
    fn test_wrong_length() {
        assert_eq!(Phone::parse("912345678"), Err(PhoneError::Invalid));
        assert_eq!(Phone::parse("91234567890"), Err(PhoneError::Invalid));
    }

    #[test]
    fn test_non_digits() {
        assert_eq!(Phone::parse("98765-4321"), Err(PhoneError::Invalid));
        assert_eq!(Phone::parse("+919876543"), Err(PhoneError::Invalid));
    }

    #[test]
    fn test_empty() {
        assert_eq!(Phone::parse(""), Err(PhoneError::Empty));
    }
}
