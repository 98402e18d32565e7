//! Egyptian mobile phone numbers.

use core::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// National mobile format: `01` followed by nine digits.
static LOCAL_MOBILE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^01[0-9]{9}$").expect("Invalid regex"));

/// Errors that can occur when parsing a [`PhoneNumber`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    #[error("phone number cannot be empty")]
    Empty,
    #[error("phone number must be 11 digits starting with 01")]
    InvalidFormat,
}

/// An Egyptian mobile number in national format (`01XXXXXXXXX`).
///
/// ```
/// use techstore_core::PhoneNumber;
///
/// let phone = PhoneNumber::parse("01012345678").unwrap();
/// assert_eq!(phone.to_international(), "+201012345678");
/// assert!(PhoneNumber::parse("+201012345678").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Parse a national-format mobile number.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is blank or not `01` plus nine digits.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(PhoneError::Empty);
        }
        if !LOCAL_MOBILE_RE.is_match(s) {
            return Err(PhoneError::InvalidFormat);
        }
        Ok(Self(s.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The number with the `+20` country prefix, as the payment gateway wants it.
    #[must_use]
    pub fn to_international(&self) -> String {
        normalize_international(&self.0)
    }
}

/// Normalise a raw phone string to `+20` form.
///
/// Numbers already carrying `+20` are returned unchanged, otherwise a single
/// leading zero is dropped and `+20` prepended. No format validation happens
/// here; use [`PhoneNumber::parse`] for that.
#[must_use]
pub fn normalize_international(raw: &str) -> String {
    let raw = raw.trim();
    if raw.starts_with("+20") {
        return raw.to_owned();
    }
    let national = raw.strip_prefix('0').unwrap_or(raw);
    format!("+20{national}")
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for PhoneNumber {
    type Error = PhoneError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PhoneNumber> for String {
    fn from(phone: PhoneNumber) -> Self {
        phone.0
    }
}
