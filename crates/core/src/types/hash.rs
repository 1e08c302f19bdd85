//! Human-readable suggestion labels (`A001`, `A002`, ...).
//!
//! A label is not a cryptographic hash. It is the letter `A` followed by a
//! sequence number zero-padded to at least three digits. Sequence numbers
//! start at 1 and only ever grow.
//!
//! Past `A999` the padding simply stops applying, so the 1000th label is
//! `A1000`. Nothing wraps and nothing is rejected.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Prefix shared by every label.
const PREFIX: char = 'A';

/// Minimum number of digits after the prefix.
const MIN_DIGITS: usize = 3;

/// Errors that can occur when parsing or advancing a [`SuggestionHash`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum HashError {
    /// The label does not start with the `A` prefix.
    #[error("suggestion label must start with '{PREFIX}': {0:?}")]
    MissingPrefix(String),
    /// The part after the prefix is not a positive decimal number.
    #[error("suggestion label has an invalid number: {0:?}")]
    InvalidNumber(String),
    /// The sequence cannot be advanced any further.
    #[error("suggestion label sequence exhausted")]
    Exhausted,
}

/// A sequential suggestion label.
///
/// Ordering follows the numeric sequence, not the string form, so `A1000`
/// sorts after `A999`.
///
/// ```
/// use suggestion_box_core::SuggestionHash;
///
/// let first = SuggestionHash::first();
/// assert_eq!(first.to_string(), "A001");
/// assert_eq!(first.next().unwrap().to_string(), "A002");
/// assert_eq!(SuggestionHash::next_after(None).unwrap(), first);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SuggestionHash(u32);

impl SuggestionHash {
    /// The label given to the first suggestion ever stored.
    #[must_use]
    pub const fn first() -> Self {
        Self(1)
    }

    /// Build a label from a store counter value.
    ///
    /// Returns `None` for zero, which no label uses.
    #[must_use]
    pub const fn from_sequence(sequence: u32) -> Option<Self> {
        if sequence == 0 {
            None
        } else {
            Some(Self(sequence))
        }
    }

    /// The numeric sequence behind the label.
    #[must_use]
    pub const fn sequence(self) -> u32 {
        self.0
    }

    /// The label immediately after this one.
    ///
    /// # Errors
    ///
    /// Returns [`HashError::Exhausted`] if the counter would overflow.
    pub const fn next(self) -> Result<Self, HashError> {
        match self.0.checked_add(1) {
            Some(n) => Ok(Self(n)),
            None => Err(HashError::Exhausted),
        }
    }

    /// The label that follows the most recently assigned one.
    ///
    /// With no previous label the sequence starts at `A001`.
    ///
    /// # Errors
    ///
    /// Returns [`HashError::Exhausted`] if the counter would overflow.
    pub fn next_after(latest: Option<Self>) -> Result<Self, HashError> {
        latest.map_or(Ok(Self::first()), Self::next)
    }

    /// Parse a label such as `A042`.
    ///
    /// # Errors
    ///
    /// Returns [`HashError::MissingPrefix`] or [`HashError::InvalidNumber`]
    /// when the input is not a well-formed label.
    pub fn parse(s: &str) -> Result<Self, HashError> {
        let digits = s
            .strip_prefix(PREFIX)
            .ok_or_else(|| HashError::MissingPrefix(s.to_owned()))?;

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(HashError::InvalidNumber(s.to_owned()));
        }

        digits
            .parse::<u32>()
            .ok()
            .and_then(Self::from_sequence)
            .ok_or_else(|| HashError::InvalidNumber(s.to_owned()))
    }
}

impl fmt::Display for SuggestionHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{PREFIX}{:0width$}", self.0, width = MIN_DIGITS)
    }
}

impl std::str::FromStr for SuggestionHash {
    type Err = HashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for SuggestionHash {
    type Error = HashError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<SuggestionHash> for String {
    fn from(hash: SuggestionHash) -> Self {
        hash.to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_first_label() {
        assert_eq!(SuggestionHash::first().to_string(), "A001");
        assert_eq!(SuggestionHash::next_after(None).unwrap().to_string(), "A001");
    }

    #[test]
    fn test_sequential_labels() {
        let mut latest = None;
        let mut seen = Vec::new();
        for _ in 0..12 {
            let next = SuggestionHash::next_after(latest).unwrap();
            seen.push(next.to_string());
            latest = Some(next);
        }
        assert_eq!(seen.first().map(String::as_str), Some("A001"));
        assert_eq!(seen.get(8).map(String::as_str), Some("A009"));
        assert_eq!(seen.get(9).map(String::as_str), Some("A010"));
        assert_eq!(seen.last().map(String::as_str), Some("A012"));
    }

    #[test]
    fn test_width_grows_past_999() {
        let last_padded = SuggestionHash::parse("A999").unwrap();
        let next = last_padded.next().unwrap();
        assert_eq!(next.to_string(), "A1000");
        assert!(next > last_padded);
    }

    #[test]
    fn test_parse_round_trips_display() {
        for label in ["A001", "A010", "A123", "A4567"] {
            assert_eq!(SuggestionHash::parse(label).unwrap().to_string(), label);
        }
    }

    #[test]
    fn test_parse_accepts_unpadded_numbers() {
        assert_eq!(SuggestionHash::parse("A7").unwrap().to_string(), "A007");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(matches!(
            SuggestionHash::parse("B001"),
            Err(HashError::MissingPrefix(_))
        ));
        assert!(matches!(
            SuggestionHash::parse("A"),
            Err(HashError::InvalidNumber(_))
        ));
        assert!(matches!(
            SuggestionHash::parse("A000"),
            Err(HashError::InvalidNumber(_))
        ));
        assert!(matches!(
            SuggestionHash::parse("A-12"),
            Err(HashError::InvalidNumber(_))
        ));
        assert!(matches!(
            SuggestionHash::parse("A12x"),
            Err(HashError::InvalidNumber(_))
        ));
    }

    #[test]
    fn test_exhausted() {
        let max = SuggestionHash::from_sequence(u32::MAX).unwrap();
        assert_eq!(max.next(), Err(HashError::Exhausted));
    }

    #[test]
    fn test_serializes_as_label_string() {
        let hash = SuggestionHash::from_sequence(42).unwrap();
        assert_eq!(serde_json::to_string(&hash).unwrap(), "\"A042\"");
        let back: SuggestionHash = serde_json::from_str("\"A042\"").unwrap();
        assert_eq!(back, hash);
    }
}
