//! Admin user repository for `PostgreSQL`.
//!
//! The password hash is only selected by the two lookups that need it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use suggestion_box_core::{AdminRole, AdminUserId, Email};

use super::{AdminUserStore, RepositoryError, map_unique_violation};
use crate::models::{AdminUser, AdminUserChanges, NewAdminUser, PersonName};

const ADMIN_USER_COLUMNS: &str =
    "id, first_name, last_name, email, role, active, created_at, updated_at";

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for `PostgreSQL` admin user queries.
#[derive(Debug, sqlx::FromRow)]
struct AdminUserRow {
    id: i32,
    first_name: String,
    last_name: String,
    email: String,
    role: String,
    active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<AdminUserRow> for AdminUser {
    type Error = RepositoryError;

    fn try_from(row: AdminUserRow) -> Result<Self, Self::Error> {
        let id = row.id;
        let corrupt = |what: &str, e: &dyn std::fmt::Display| {
            RepositoryError::DataCorruption(format!(
                "admin user {id}: invalid {what} in database: {e}"
            ))
        };

        Ok(Self {
            id: AdminUserId::new(id),
            first_name: PersonName::parse("firstName", &row.first_name)
                .map_err(|e| corrupt("first name", &e))?,
            last_name: PersonName::parse("lastName", &row.last_name)
                .map_err(|e| corrupt("last name", &e))?,
            email: Email::parse(&row.email).map_err(|e| corrupt("email", &e))?,
            role: row.role.parse().map_err(|e| corrupt("role", &e))?,
            active: row.active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Admin user row joined with its password hash.
#[derive(Debug, sqlx::FromRow)]
struct AdminUserWithHashRow {
    #[sqlx(flatten)]
    user: AdminUserRow,
    password_hash: String,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for admin user database operations.
#[derive(Clone)]
pub struct PgAdminUserRepository {
    pool: PgPool,
}

impl PgAdminUserRepository {
    /// Create a new admin user repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AdminUserStore for PgAdminUserRepository {
    async fn create(&self, new: &NewAdminUser) -> Result<AdminUser, RepositoryError> {
        let row = sqlx::query_as::<_, AdminUserRow>(&format!(
            r"
            INSERT INTO admin_user (first_name, last_name, email, password_hash, role, active)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {ADMIN_USER_COLUMNS}
            "
        ))
        .bind(new.first_name.as_str())
        .bind(new.last_name.as_str())
        .bind(new.email.as_str())
        .bind(&new.password_hash)
        .bind(new.role.as_str())
        .bind(new.active)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "Email"))?;

        row.try_into()
    }

    async fn get_by_id(&self, id: AdminUserId) -> Result<Option<AdminUser>, RepositoryError> {
        let row = sqlx::query_as::<_, AdminUserRow>(&format!(
            "SELECT {ADMIN_USER_COLUMNS} FROM admin_user WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn get_with_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(AdminUser, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, AdminUserWithHashRow>(&format!(
            "SELECT {ADMIN_USER_COLUMNS}, password_hash FROM admin_user WHERE email = $1"
        ))
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| AdminUser::try_from(r.user).map(|user| (user, r.password_hash)))
            .transpose()
    }

    async fn get_password_hash(&self, id: AdminUserId) -> Result<Option<String>, RepositoryError> {
        let hash = sqlx::query_scalar::<_, String>(
            "SELECT password_hash FROM admin_user WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(hash)
    }

    async fn update(
        &self,
        id: AdminUserId,
        changes: &AdminUserChanges,
    ) -> Result<Option<AdminUser>, RepositoryError> {
        let row = sqlx::query_as::<_, AdminUserRow>(&format!(
            r"
            UPDATE admin_user
            SET first_name = $2,
                last_name  = $3,
                email      = COALESCE($4, email),
                role       = COALESCE($5, role),
                active     = COALESCE($6, active),
                updated_at = now()
            WHERE id = $1
            RETURNING {ADMIN_USER_COLUMNS}
            "
        ))
        .bind(id)
        .bind(changes.first_name.as_str())
        .bind(changes.last_name.as_str())
        .bind(changes.email.as_ref().map(Email::as_str))
        .bind(changes.role.map(AdminRole::as_str))
        .bind(changes.active)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "Email"))?;

        row.map(TryInto::try_into).transpose()
    }

    async fn set_password_hash(
        &self,
        id: AdminUserId,
        password_hash: &str,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "UPDATE admin_user SET password_hash = $2, updated_at = now() WHERE id = $1",
        )
        .bind(id)
        .bind(password_hash)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_by_role(&self, role: AdminRole) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM admin_user WHERE role = $1")
            .bind(role.as_str())
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
