//! Media identifiers: the numeric id of a post, used as the key for
//! resolution and for both caches.
//!
//! A `MediaId` can only be built from a non-empty all-digit string, so every
//! consumer downstream of construction may assume a well-formed key.

mod parse;

pub use parse::{extract_from_url, id_from_page_path};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Raised when a raw string is not a usable media identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid media identifier: {0:?}")]
pub struct InvalidMediaId(pub String);

/// Validated numeric post identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MediaId(String);

impl MediaId {
    /// Validate and wrap a raw identifier. Surrounding whitespace is ignored.
    pub fn parse(raw: &str) -> Result<Self, InvalidMediaId> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidMediaId(raw.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Accept either a bare identifier or any URL/text that carries one.
    pub fn from_id_or_url(input: &str) -> Result<Self, InvalidMediaId> {
        Self::parse(input).or_else(|_| {
            extract_from_url(input).ok_or_else(|| InvalidMediaId(input.to_string()))
        })
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MediaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for MediaId {
    type Err = InvalidMediaId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for MediaId {
    type Error = InvalidMediaId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<MediaId> for String {
    fn from(id: MediaId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_digit_strings() {
        let id = MediaId::parse("1234567890").unwrap();
        assert_eq!(id.as_str(), "1234567890");
        assert_eq!(MediaId::parse(" 42\n").unwrap().as_str(), "42");
    }

    #[test]
    fn rejects_empty_and_non_numeric() {
        for raw in ["", "   ", "abc", "12a34", "-5", "12 34", "１２３"] {
            assert!(MediaId::parse(raw).is_err(), "{raw:?} should be rejected");
        }
    }

    #[test]
    fn from_id_or_url_falls_back_to_url_extraction() {
        let id = MediaId::from_id_or_url("https://x.com/someone/status/1790000000000000001").unwrap();
        assert_eq!(id.as_str(), "1790000000000000001");
        assert!(MediaId::from_id_or_url("https://x.com/home").is_err());
    }

    #[test]
    fn serde_validates() {
        let id: MediaId = serde_json::from_str("\"987\"").unwrap();
        assert_eq!(id.as_str(), "987");
        assert!(serde_json::from_str::<MediaId>("\"nope\"").is_err());
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"987\"");
    }
}
