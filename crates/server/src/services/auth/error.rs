//! Authentication error types.

use thiserror::Error;

use super::TokenError;
use crate::db::RepositoryError;
use crate::models::ValidationError;

/// Errors that can occur during admin authentication and account management.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] suggestion_box_core::EmailError),

    /// A field failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Invalid credentials (wrong password or user not found).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The current password given to a password change did not match.
    #[error("Current password is incorrect")]
    IncorrectPassword,

    /// Correct credentials for an account that has been deactivated.
    #[error("account is inactive")]
    AccountInactive,

    /// Admin user not found.
    #[error("admin user not found")]
    UserNotFound,

    /// Admin user already exists.
    #[error("Email already exists")]
    UserAlreadyExists,

    /// Token minting failed.
    #[error("token error: {0}")]
    Token(#[from] TokenError),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}
