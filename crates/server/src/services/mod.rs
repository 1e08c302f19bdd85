//! Business logic services.
//!
//! # Services
//!
//! - `auth` - Password login, bearer tokens, and admin account management
//! - `suggestions` - Suggestion intake, moderation, and dashboard stats

pub mod auth;
pub mod suggestions;

pub use auth::{AuthError, AuthService};
pub use suggestions::{SuggestionError, SuggestionService, SuggestionStats};
