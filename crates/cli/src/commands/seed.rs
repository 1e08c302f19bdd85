//! Seed the default admin account.

use suggestion_box_core::Email;
use suggestion_box_server::db::{AdminUserStore, PgAdminUserRepository};
use suggestion_box_server::services::AuthError;

use super::admin::{insert, new_admin};
use super::{CommandError, connect, initial_password};

/// Email of the account created by `sb-cli seed`.
pub const DEFAULT_ADMIN_EMAIL: &str = "super@orcalean.com";

/// Create the default admin (`ORCA LEAN`) unless it already exists.
///
/// # Errors
///
/// Returns an error if the database is unreachable or the configured
/// initial password is rejected.
pub async fn default_admin() -> Result<(), CommandError> {
    let pool = connect().await?;
    let users = PgAdminUserRepository::new(pool);

    if seed(&users, &initial_password()).await? {
        tracing::info!("Default admin {DEFAULT_ADMIN_EMAIL} created");
    } else {
        tracing::info!("Default admin {DEFAULT_ADMIN_EMAIL} already exists, skipping");
    }
    Ok(())
}

/// Returns `true` if the account was created.
async fn seed(users: &dyn AdminUserStore, password: &str) -> Result<bool, AuthError> {
    let email = Email::parse(DEFAULT_ADMIN_EMAIL)?;
    if users.get_with_password_hash(&email).await?.is_some() {
        return Ok(false);
    }

    let new = new_admin(DEFAULT_ADMIN_EMAIL, "ORCA", "LEAN", password)?;
    insert(users, &new).await?;
    Ok(true)
}
