//! Persistence for suggestions and admin users.
//!
//! # Backends
//!
//! - [`PgSuggestionRepository`] / [`PgAdminUserRepository`] - `PostgreSQL`
//! - [`MemoryStore`] - process-local store used by tests and by local runs
//!   without a database URL
//!
//! Handlers only see the [`SuggestionStore`] and [`AdminUserStore`] traits.
//!
//! # Tables
//!
//! - `suggestion` - Submitted suggestions
//! - `suggestion_counter` - Single-row label counter
//! - `admin_user` - Admin accounts with Argon2 password hashes
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p suggestion-box-cli -- migrate
//! ```

pub mod admin_users;
pub mod memory;
pub mod suggestions;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use suggestion_box_core::{
    AdminRole, AdminUserId, Email, SuggestionId, SuggestionStatus,
};

use crate::models::{
    AdminUser, AdminUserChanges, NewAdminUser, NewSuggestion, Suggestion, SuggestionFilter,
};

pub use admin_users::PgAdminUserRepository;
pub use memory::MemoryStore;
pub use suggestions::PgSuggestionRepository;

/// Embedded SQL migrations for the `PostgreSQL` backend.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Map a unique-constraint violation to [`RepositoryError::Conflict`].
pub(crate) fn map_unique_violation(err: sqlx::Error, what: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = err
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(format!("{what} already exists"));
    }
    RepositoryError::Database(err)
}

/// Suggestion persistence.
///
/// Every method is atomic on its own; nothing spans several records.
#[async_trait]
pub trait SuggestionStore: Send + Sync {
    /// All suggestions passing `filter`, oldest first.
    async fn list(&self, filter: &SuggestionFilter) -> Result<Vec<Suggestion>, RepositoryError>;

    /// Store a submission, assigning its ID, label, timestamp and `unread`.
    ///
    /// The label comes from a counter that is incremented atomically with
    /// the insert, so concurrent submissions never share a label.
    async fn create(&self, new: &NewSuggestion) -> Result<Suggestion, RepositoryError>;

    /// Set the read state. Returns `None` if the suggestion does not exist.
    async fn set_status(
        &self,
        id: SuggestionId,
        status: SuggestionStatus,
    ) -> Result<Option<Suggestion>, RepositoryError>;

    /// Remove a suggestion. Returns `false` if it did not exist.
    async fn delete(&self, id: SuggestionId) -> Result<bool, RepositoryError>;

    /// Cheap round-trip used by the readiness probe.
    async fn ping(&self) -> Result<(), RepositoryError>;
}

/// Admin account persistence.
#[async_trait]
pub trait AdminUserStore: Send + Sync {
    /// Insert an admin. Fails with `Conflict` on a duplicate email.
    async fn create(&self, new: &NewAdminUser) -> Result<AdminUser, RepositoryError>;

    /// Look up by ID.
    async fn get_by_id(&self, id: AdminUserId) -> Result<Option<AdminUser>, RepositoryError>;

    /// Look up by email, returning the stored password hash alongside.
    async fn get_with_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(AdminUser, String)>, RepositoryError>;

    /// The stored password hash for an ID.
    async fn get_password_hash(&self, id: AdminUserId) -> Result<Option<String>, RepositoryError>;

    /// Apply profile changes. Returns `None` if the admin does not exist.
    /// Fails with `Conflict` if the new email belongs to another admin.
    async fn update(
        &self,
        id: AdminUserId,
        changes: &AdminUserChanges,
    ) -> Result<Option<AdminUser>, RepositoryError>;

    /// Replace the password hash. Returns `false` if the admin does not exist.
    async fn set_password_hash(
        &self,
        id: AdminUserId,
        password_hash: &str,
    ) -> Result<bool, RepositoryError>;

    /// Number of admins holding `role`.
    async fn count_by_role(&self, role: AdminRole) -> Result<i64, RepositoryError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
