//! Phone number type.
//!
//! The storefront primarily serves Pakistani shoppers, so the two Pakistani
//! mobile formats are matched explicitly; generic international and bare
//! local numbers are accepted as well for overseas customers.

use core::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// `+92` country code followed by a 10-digit mobile number.
static PK_MOBILE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+92\d{10}$").expect("hard-coded pattern"));

/// Leading-zero 11-digit domestic format (e.g. `03001234567`).
static PK_DOMESTIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^0\d{10}$").expect("hard-coded pattern"));

/// Generic international format: `+` followed by 7-15 digits.
static INTERNATIONAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+\d{7,15}$").expect("hard-coded pattern"));

/// Bare local number: 10-15 digits, no prefix.
static BARE_LOCAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{10,15}$").expect("hard-coded pattern"));

/// Errors that can occur when parsing a [`Phone`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum PhoneError {
    /// The input string is empty.
    #[error("phone number cannot be empty")]
    Empty,
    /// The input matches none of the accepted formats.
    #[error("phone number is not in a recognized format")]
    Invalid,
}

/// A shopper's contact phone number.
///
/// Accepted formats (spaces and hyphens are stripped before matching):
/// - `+92` followed by 10 digits (Pakistani mobile)
/// - `0` followed by 10 digits (Pakistani domestic)
/// - `+` followed by 7-15 digits (international)
/// - 10-15 bare digits (local)
///
/// ## Examples
///
/// ```
/// use bazario_core::Phone;
///
/// assert!(Phone::parse("+923001234567").is_ok());
/// assert!(Phone::parse("0300-1234567").is_ok());
/// assert!(Phone::parse("+14155552671").is_ok());
/// assert!(Phone::parse("123").is_err());
/// assert!(Phone::parse("+92abc").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Phone(String);

impl Phone {
    /// Parse a `Phone` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty or matches none of the
    /// accepted formats.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        let normalized: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-')
            .collect();

        if normalized.is_empty() {
            return Err(PhoneError::Empty);
        }

        let accepted = PK_MOBILE.is_match(&normalized)
            || PK_DOMESTIC.is_match(&normalized)
            || INTERNATIONAL.is_match(&normalized)
            || BARE_LOCAL.is_match(&normalized);

        if accepted {
            Ok(Self(normalized))
        } else {
            Err(PhoneError::Invalid)
        }
    }

    /// Returns the normalized phone number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Phone` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Phone {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Phone {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
