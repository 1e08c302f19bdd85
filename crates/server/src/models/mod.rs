//! Domain models for the suggestion box.
//!
//! These are validated domain objects. Wire shapes live next to the route
//! handlers that produce them.

pub mod admin_user;
pub mod suggestion;

pub use admin_user::{AdminUser, AdminUserChanges, CurrentAdmin, NewAdminUser, PersonName};
pub use suggestion::{NewSuggestion, Suggestion, SuggestionFilter, SuggestionText};

/// A field-level validation failure, reported to clients as 400.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    /// Wire name of the offending field.
    pub field: &'static str,
    /// Human-readable reason.
    pub reason: String,
}

impl ValidationError {
    /// Build a validation error for `field`.
    #[must_use]
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}
