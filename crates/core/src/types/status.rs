//! Status and role enums.
//!
//! Both are stored and transmitted as plain strings. Parsing is strict: any
//! value outside the enumerated set is an error, never a default.

use serde::{Deserialize, Serialize};

/// Read state of a suggestion, toggled by an admin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionStatus {
    /// Not yet looked at by an admin.
    #[default]
    Unread,
    /// Marked as read by an admin.
    Read,
}

impl SuggestionStatus {
    /// The wire/storage spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unread => "unread",
            Self::Read => "read",
        }
    }
}

impl std::fmt::Display for SuggestionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A status string outside `read`/`unread`.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid status {0:?}; must be 'read' or 'unread'")]
pub struct StatusParseError(pub String);

impl std::str::FromStr for SuggestionStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unread" => Ok(Self::Unread),
            "read" => Ok(Self::Read),
            _ => Err(StatusParseError(s.to_owned())),
        }
    }
}

/// Admin role.
///
/// Only `ADMIN` exists today. The enum keeps the permission check explicit
/// so adding a role means adding a row to the permission table, not editing
/// every handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdminRole {
    /// Full access: moderate suggestions and manage admin accounts.
    Admin,
}

impl AdminRole {
    /// The wire/storage spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
        }
    }
}

impl std::fmt::Display for AdminRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A role string that names no known role.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid admin role: {0}")]
pub struct RoleParseError(pub String);

impl std::str::FromStr for AdminRole {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(Self::Admin),
            _ => Err(RoleParseError(s.to_owned())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_status_default_is_unread() {
        assert_eq!(SuggestionStatus::default(), SuggestionStatus::Unread);
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("read".parse::<SuggestionStatus>().unwrap(), SuggestionStatus::Read);
        assert_eq!(
            "unread".parse::<SuggestionStatus>().unwrap(),
            SuggestionStatus::Unread
        );
        assert!("READ".parse::<SuggestionStatus>().is_err());
        assert!("archived".parse::<SuggestionStatus>().is_err());
        assert!("".parse::<SuggestionStatus>().is_err());
    }

    #[test]
    fn test_status_serde_matches_display() {
        for status in [SuggestionStatus::Read, SuggestionStatus::Unread] {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{status}\""));
        }
    }

    #[test]
    fn test_role_round_trip() {
        assert_eq!("ADMIN".parse::<AdminRole>().unwrap(), AdminRole::Admin);
        assert_eq!(AdminRole::Admin.to_string(), "ADMIN");
        assert_eq!(serde_json::to_string(&AdminRole::Admin).unwrap(), "\"ADMIN\"");
        assert!("admin".parse::<AdminRole>().is_err());
        assert!("SUPER_ADMIN".parse::<AdminRole>().is_err());
    }
}
