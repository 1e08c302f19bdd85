//! Suggestion domain types.

use chrono::{DateTime, Utc};

use suggestion_box_core::{Category, SuggestionHash, SuggestionId, SuggestionStatus};

use super::ValidationError;

/// Submitter recorded when no employee ID is given.
pub const ANONYMOUS_SUBMITTER: &str = "Anonymous";

/// A stored suggestion (domain type).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    /// Store-assigned ID.
    pub id: SuggestionId,
    /// Sequential human-readable label.
    pub hash: SuggestionHash,
    /// Department the suggestion is filed under.
    pub category: Category,
    /// The suggestion itself.
    pub text: SuggestionText,
    /// Employee ID, or [`ANONYMOUS_SUBMITTER`].
    pub submitter_id: String,
    /// When the suggestion was received.
    pub submitted_at: DateTime<Utc>,
    /// Read state.
    pub status: SuggestionStatus,
}

/// Non-empty, trimmed suggestion text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionText(String);

impl SuggestionText {
    /// Maximum length in characters.
    pub const MAX_LENGTH: usize = 5000;

    /// Validate suggestion text.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] for blank or oversized text.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::new("suggestion", "is required"));
        }
        if trimmed.chars().count() > Self::MAX_LENGTH {
            return Err(ValidationError::new(
                "suggestion",
                format!("must be at most {} characters", Self::MAX_LENGTH),
            ));
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the text as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A validated submission, ready to be stored.
///
/// The label, ID, timestamp and status are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSuggestion {
    pub category: Category,
    pub text: SuggestionText,
    pub submitter_id: String,
}

impl NewSuggestion {
    /// Validate raw submission fields.
    ///
    /// A missing or blank employee ID records the submission as anonymous.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] naming the first invalid field.
    pub fn parse(
        suggestion: Option<&str>,
        category: Option<&str>,
        employee_id: Option<&str>,
    ) -> Result<Self, ValidationError> {
        let text = SuggestionText::parse(suggestion.unwrap_or_default())?;
        let category = Category::parse(category.unwrap_or_default())
            .map_err(|e| ValidationError::new("category", e.to_string()))?;
        let submitter_id = employee_id
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .unwrap_or(ANONYMOUS_SUBMITTER)
            .to_owned();

        Ok(Self {
            category,
            text,
            submitter_id,
        })
    }
}

/// Optional list filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuggestionFilter {
    pub status: Option<SuggestionStatus>,
    pub category: Option<Category>,
}

impl SuggestionFilter {
    /// Whether `suggestion` passes every set filter.
    #[must_use]
    pub fn matches(&self, suggestion: &Suggestion) -> bool {
        self.status.is_none_or(|s| s == suggestion.status)
            && self
                .category
                .as_ref()
                .is_none_or(|c| *c == suggestion.category)
    }
}
