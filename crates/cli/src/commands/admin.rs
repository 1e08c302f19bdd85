//! Admin user management commands.

use suggestion_box_core::{AdminRole, AdminUserId, Email};
use suggestion_box_server::db::{AdminUserStore, PgAdminUserRepository, RepositoryError};
use suggestion_box_server::models::{NewAdminUser, PersonName};
use suggestion_box_server::services::AuthError;
use suggestion_box_server::services::auth::{LOGIN_PASSWORD_LENGTH, hash_password, validate_password};

use super::{CommandError, connect, initial_password};

/// Create a new admin user.
///
/// Without `password` the account gets `ADMIN_INITIAL_PASSWORD`.
///
/// # Returns
///
/// The ID of the created admin user.
///
/// # Errors
///
/// Returns an error for invalid input, a taken email, or a database failure.
pub async fn create_user(
    email: &str,
    first_name: &str,
    last_name: &str,
    password: Option<&str>,
) -> Result<AdminUserId, CommandError> {
    let password = password.map_or_else(initial_password, str::to_owned);
    let new = new_admin(email, first_name, last_name, &password)?;

    let pool = connect().await?;
    let users = PgAdminUserRepository::new(pool);

    tracing::info!("Creating admin user: {}", new.email);
    let user = insert(&users, &new).await?;

    tracing::info!(
        "Admin user created successfully! ID: {}, Email: {}, Role: {}",
        user,
        new.email,
        new.role
    );
    Ok(user)
}

/// Validate input and hash the password.
pub(super) fn new_admin(
    email: &str,
    first_name: &str,
    last_name: &str,
    password: &str,
) -> Result<NewAdminUser, AuthError> {
    validate_password("password", password, LOGIN_PASSWORD_LENGTH)?;
    Ok(NewAdminUser {
        first_name: PersonName::parse("firstName", first_name)?,
        last_name: PersonName::parse("lastName", last_name)?,
        email: Email::parse(email)?,
        password_hash: hash_password(password)?,
        role: AdminRole::Admin,
        active: true,
    })
}

pub(super) async fn insert(
    users: &dyn AdminUserStore,
    new: &NewAdminUser,
) -> Result<AdminUserId, AuthError> {
    match users.create(new).await {
        Ok(user) => Ok(user.id),
        Err(RepositoryError::Conflict(_)) => Err(AuthError::UserAlreadyExists),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use suggestion_box_server::db::MemoryStore;

    use super::*;

    #[test]
    fn test_new_admin_validation() {
        let new = new_admin(" Ada@Example.com ", "Ada", "King", "Password$1234").unwrap();
        assert_eq!(new.email.as_str(), "ada@example.com");
        assert_ne!(new.password_hash, "Password$1234");

        assert!(matches!(
            new_admin("ada@example.com", "Ada", "King", "short"),
            Err(AuthError::Validation(_))
        ));
        assert!(matches!(
            new_admin("not-an-email", "Ada", "King", "Password$1234"),
            Err(AuthError::InvalidEmail(_))
        ));
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate() {
        let store = MemoryStore::new();
        let new = new_admin("ada@example.com", "Ada", "King", "Password$1234").unwrap();
        insert(&store, &new).await.unwrap();
        assert!(matches!(
            insert(&store, &new).await,
            Err(AuthError::UserAlreadyExists)
        ));
    }
}
