//! Suggestion category.
//!
//! The submission form offers a fixed list of departments, but the server
//! accepts any non-empty label so that a new department on the form does not
//! need a deploy. [`Category::KNOWN`] is published for clients to render.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Category`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CategoryError {
    /// Blank after trimming.
    #[error("category is required")]
    Empty,
    /// Longer than [`Category::MAX_LENGTH`] characters.
    #[error("category must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
}

/// A trimmed, non-empty category label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Category(String);

impl Category {
    /// Maximum label length in characters.
    pub const MAX_LENGTH: usize = 100;

    /// Departments offered by the submission form.
    pub const KNOWN: &'static [&'static str] = &[
        "HR",
        "IT",
        "Safety",
        "Quality",
        "Production",
        "Environment",
        "Management",
        "Other",
    ];

    /// Parse a category label.
    ///
    /// # Errors
    ///
    /// Returns [`CategoryError::Empty`] for blank input and
    /// [`CategoryError::TooLong`] past the length limit.
    pub fn parse(s: &str) -> Result<Self, CategoryError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(CategoryError::Empty);
        }
        if trimmed.chars().count() > Self::MAX_LENGTH {
            return Err(CategoryError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the label as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the label is one of the form's departments.
    #[must_use]
    pub fn is_known(&self) -> bool {
        Self::KNOWN.contains(&self.0.as_str())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Category {
    type Error = CategoryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_trims() {
        assert_eq!(Category::parse("  Safety ").unwrap().as_str(), "Safety");
    }

    #[test]
    fn test_blank_rejected() {
        assert_eq!(Category::parse(""), Err(CategoryError::Empty));
        assert_eq!(Category::parse(" \t "), Err(CategoryError::Empty));
    }

    #[test]
    fn test_unknown_labels_are_accepted() {
        let category = Category::parse("Canteen").unwrap();
        assert!(!category.is_known());
        assert!(Category::parse("IT").unwrap().is_known());
    }

    #[test]
    fn test_too_long() {
        let long = "x".repeat(Category::MAX_LENGTH + 1);
        assert!(matches!(
            Category::parse(&long),
            Err(CategoryError::TooLong { .. })
        ));
    }
}
