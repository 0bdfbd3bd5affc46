//! National identity numbers.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::failure::{ValidationFailure, codes};

/// Exact number of digits in a national identity number.
pub const NATIONAL_ID_LEN: usize = 13;

const NATIONAL_ID_PATTERN: &str = "[0-9]{13}";

static NATIONAL_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("^{NATIONAL_ID_PATTERN}$")).unwrap());

/// A 13-digit national identity number. Also the profile registry key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NationalId(String);

impl NationalId {
    /// Parse from user, session or file text.
    ///
    /// The length check and the pattern check overlap; both are kept so
    /// that a non-ASCII 13-character string fails on length first.
    pub fn parse(text: &str) -> Result<Self, ValidationFailure> {
        if text.len() != NATIONAL_ID_LEN {
            return Err(ValidationFailure::new(codes::NAT_ID_NOT_13_DIGITS, text));
        }
        if !NATIONAL_ID_RE.is_match(text) {
            return Err(ValidationFailure::new(codes::NAT_ID_NOT_13_DIGITS, text));
        }
        Ok(Self(text.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NationalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for NationalId {
    type Err = ValidationFailure;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for NationalId {
    type Error = ValidationFailure;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<NationalId> for String {
    fn from(id: NationalId) -> Self {
        id.0
    }
}
