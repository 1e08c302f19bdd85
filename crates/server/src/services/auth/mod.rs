//! Admin authentication service.
//!
//! Password login issuing signed bearer tokens, plus the account operations
//! behind the admin-management routes. Passwords are hashed here and only
//! here, so no store ever sees plaintext.

mod error;
mod password;
mod token;

pub use error::AuthError;
pub use password::{hash_password, verify_password};
pub use token::{AuthDecision, Claims, RejectReason, TokenError, TokenKeys, authorize};

use suggestion_box_core::{AdminRole, AdminUserId, Email};
use tracing::instrument;

use crate::db::{AdminUserStore, RepositoryError};
use crate::models::{AdminUser, AdminUserChanges, NewAdminUser, PersonName, ValidationError};

/// Password length accepted at login and on account creation.
pub const LOGIN_PASSWORD_LENGTH: (usize, usize) = (8, 50);

/// Length accepted for the current password on the change-password route.
/// The new password must satisfy [`LOGIN_PASSWORD_LENGTH`] so it can be used.
pub const CHANGE_PASSWORD_LENGTH: (usize, usize) = (6, 50);

/// Check a password's length in characters against `(min, max)`.
///
/// # Errors
///
/// Returns a [`ValidationError`] for `field` when out of range.
pub fn validate_password(
    field: &'static str,
    password: &str,
    (min, max): (usize, usize),
) -> Result<(), ValidationError> {
    let len = password.chars().count();
    if (min..=max).contains(&len) {
        Ok(())
    } else {
        Err(ValidationError::new(
            field,
            format!("must be between {min} and {max} characters"),
        ))
    }
}

/// Profile of an admin about to be created.
#[derive(Debug, Clone)]
pub struct AdminProfile {
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub email: Email,
    pub active: bool,
}

/// Admin authentication service.
pub struct AuthService<'a> {
    users: &'a dyn AdminUserStore,
    keys: &'a TokenKeys,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(users: &'a dyn AdminUserStore, keys: &'a TokenKeys) -> Self {
        Self { users, keys }
    }

    // =========================================================================
    // Password Authentication
    // =========================================================================

    /// Login with email and password, returning the admin and a fresh token.
    ///
    /// The password is checked before the `active` flag, so an inactive
    /// account is only revealed to someone who knows its password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` or `AuthError::Validation` for
    /// malformed input.
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    /// Returns `AuthError::AccountInactive` if the account is deactivated.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<(AdminUser, String), AuthError> {
        let email = Email::parse(email)?;
        validate_password("password", password, LOGIN_PASSWORD_LENGTH)?;

        let (user, password_hash) = self
            .users
            .get_with_password_hash(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(password, &password_hash) {
            return Err(AuthError::InvalidCredentials);
        }

        if !user.active {
            return Err(AuthError::AccountInactive);
        }

        let token = self.keys.mint(&user)?;
        tracing::info!(admin_id = %user.id, "admin logged in");

        Ok((user, token))
    }

    /// Change the caller's own password after checking the current one.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` if either password has a bad length.
    /// Returns `AuthError::UserNotFound` if the admin no longer exists.
    /// Returns `AuthError::IncorrectPassword` if `current` does not match.
    #[instrument(skip(self, current, new))]
    pub async fn change_password(
        &self,
        id: AdminUserId,
        current: &str,
        new: &str,
    ) -> Result<(), AuthError> {
        validate_password("currentPassword", current, CHANGE_PASSWORD_LENGTH)?;
        validate_password("newPassword", new, LOGIN_PASSWORD_LENGTH)?;

        let stored = self
            .users
            .get_password_hash(id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !verify_password(current, &stored) {
            return Err(AuthError::IncorrectPassword);
        }

        let password_hash = hash_password(new)?;
        if !self.users.set_password_hash(id, &password_hash).await? {
            return Err(AuthError::UserNotFound);
        }

        tracing::info!(admin_id = %id, "admin password changed");
        Ok(())
    }

    // =========================================================================
    // Account Management
    // =========================================================================

    /// Create an admin with the given initial password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` if the password has a bad length.
    /// Returns `AuthError::UserAlreadyExists` if the email is taken.
    #[instrument(skip_all, fields(email = %profile.email))]
    pub async fn create_admin(
        &self,
        profile: AdminProfile,
        password: &str,
    ) -> Result<AdminUser, AuthError> {
        validate_password("password", password, LOGIN_PASSWORD_LENGTH)?;
        let password_hash = hash_password(password)?;

        let new = NewAdminUser {
            first_name: profile.first_name,
            last_name: profile.last_name,
            email: profile.email,
            password_hash,
            role: AdminRole::Admin,
            active: profile.active,
        };

        let user = self.users.create(&new).await.map_err(conflict_to_exists)?;
        tracing::info!(admin_id = %user.id, "admin created");
        Ok(user)
    }

    /// Update an admin's profile. The password is left untouched.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if the admin doesn't exist.
    /// Returns `AuthError::UserAlreadyExists` if the new email is taken.
    #[instrument(skip(self, changes))]
    pub async fn update_admin(
        &self,
        id: AdminUserId,
        changes: &AdminUserChanges,
    ) -> Result<AdminUser, AuthError> {
        self.users
            .update(id, changes)
            .await
            .map_err(conflict_to_exists)?
            .ok_or(AuthError::UserNotFound)
    }

    /// Get an admin user by ID.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if the user doesn't exist.
    pub async fn get_admin(&self, id: AdminUserId) -> Result<AdminUser, AuthError> {
        self.users
            .get_by_id(id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    /// Number of accounts holding the `ADMIN` role.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` if the store fails.
    pub async fn admin_count(&self) -> Result<i64, AuthError> {
        Ok(self.users.count_by_role(AdminRole::Admin).await?)
    }
}

fn conflict_to_exists(err: RepositoryError) -> AuthError {
    match err {
        RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
        other => AuthError::Repository(other),
    }
}
