//! Admin user domain types.
//!
//! These types represent validated domain objects for admin authentication.
//! The password hash never leaves the store layer inside an [`AdminUser`];
//! it is fetched separately when a password has to be verified.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use suggestion_box_core::{AdminRole, AdminUserId, Email};

use super::ValidationError;

/// An admin user (domain type).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminUser {
    /// Unique admin user ID.
    pub id: AdminUserId,
    /// Given name.
    pub first_name: PersonName,
    /// Family name.
    pub last_name: PersonName,
    /// Login email, unique across admins.
    pub email: Email,
    /// Permission level.
    pub role: AdminRole,
    /// Inactive admins cannot log in.
    pub active: bool,
    /// When the admin was created.
    pub created_at: DateTime<Utc>,
    /// When the admin was last updated.
    pub updated_at: DateTime<Utc>,
}

/// A new admin, with the password already hashed.
#[derive(Debug, Clone)]
pub struct NewAdminUser {
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub email: Email,
    pub password_hash: String,
    pub role: AdminRole,
    pub active: bool,
}

/// Profile changes applied by the admin-update endpoint.
///
/// Names are always replaced; the optional fields keep their stored value
/// when `None`. There is deliberately no password field here.
#[derive(Debug, Clone)]
pub struct AdminUserChanges {
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub email: Option<Email>,
    pub role: Option<AdminRole>,
    pub active: Option<bool>,
}

/// A trimmed given or family name of 2 to 255 characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonName(String);

impl PersonName {
    /// Minimum length in characters.
    pub const MIN_LENGTH: usize = 2;
    /// Maximum length in characters.
    pub const MAX_LENGTH: usize = 255;

    /// Validate a name for the wire field `field`.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when the trimmed length is out of range.
    pub fn parse(field: &'static str, s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();
        let len = trimmed.chars().count();
        if !(Self::MIN_LENGTH..=Self::MAX_LENGTH).contains(&len) {
            return Err(ValidationError::new(
                field,
                format!(
                    "must be between {} and {} characters",
                    Self::MIN_LENGTH,
                    Self::MAX_LENGTH
                ),
            ));
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PersonName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The authenticated caller, as carried in a verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentAdmin {
    /// Admin's database ID.
    pub id: AdminUserId,
    /// Admin's email address.
    pub email: Email,
    /// Admin's role at the time the token was issued.
    pub role: AdminRole,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_person_name_bounds() {
        assert!(PersonName::parse("firstName", "A").is_err());
        assert!(PersonName::parse("firstName", "  A  ").is_err());
        assert_eq!(PersonName::parse("firstName", " Al ").unwrap().as_str(), "Al");
        assert!(PersonName::parse("lastName", &"z".repeat(255)).is_ok());

        let err = PersonName::parse("lastName", &"z".repeat(256)).unwrap_err();
        assert_eq!(err.field, "lastName");
    }
}
