//! Admin account management routes.

use axum::{extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use suggestion_box_core::{AdminRole, AdminUserId, Email, Permission};

use crate::error::{Json, Path, Result};
use crate::middleware::RequireAdmin;
use crate::models::{AdminUser, AdminUserChanges, PersonName, ValidationError};
use crate::services::AuthService;
use crate::services::auth::AdminProfile;
use crate::state::AppState;

// =============================================================================
// Wire Types
// =============================================================================

/// Public projection of an admin. Never carries the password hash.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminResponse {
    pub id: AdminUserId,
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub role: AdminRole,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<AdminUser> for AdminResponse {
    fn from(user: AdminUser) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name.to_string(),
            last_name: user.last_name.to_string(),
            email: user.email,
            role: user.role,
            active: user.active,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AdminMessageResponse {
    pub message: &'static str,
    pub admin: AdminResponse,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStatsResponse {
    pub admin_count: i64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAdminRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub active: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAdminRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub active: Option<bool>,
}

fn parse_name(field: &'static str, value: Option<&str>) -> std::result::Result<PersonName, ValidationError> {
    PersonName::parse(field, value.unwrap_or_default())
}

fn parse_email(value: &str) -> std::result::Result<Email, ValidationError> {
    Email::parse(value).map_err(|e| ValidationError::new("email", e.to_string()))
}

impl UpdateAdminRequest {
    fn into_changes(self) -> std::result::Result<AdminUserChanges, ValidationError> {
        Ok(AdminUserChanges {
            first_name: parse_name("firstName", self.first_name.as_deref())?,
            last_name: parse_name("lastName", self.last_name.as_deref())?,
            email: self.email.as_deref().map(parse_email).transpose()?,
            role: self
                .role
                .as_deref()
                .map(str::parse::<AdminRole>)
                .transpose()
                .map_err(|e| ValidationError::new("role", e.to_string()))?,
            active: self.active,
        })
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// `POST /api/admin/create-admin`
///
/// Without a password the account gets the configured initial password.
#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    admin: RequireAdmin,
    Json(body): Json<CreateAdminRequest>,
) -> Result<(StatusCode, Json<AdminMessageResponse>)> {
    admin.require(Permission::ManageAdmins)?;

    let profile = AdminProfile {
        first_name: parse_name("firstName", body.first_name.as_deref())?,
        last_name: parse_name("lastName", body.last_name.as_deref())?,
        email: parse_email(body.email.as_deref().unwrap_or_default())?,
        active: body.active.unwrap_or(true),
    };
    let password = body
        .password
        .as_deref()
        .unwrap_or_else(|| state.config().initial_admin_password.expose_secret());

    let created = AuthService::new(state.admins(), state.token_keys())
        .create_admin(profile, password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(AdminMessageResponse {
            message: "Admin created successfully",
            admin: created.into(),
        }),
    ))
}

/// `POST /api/admin/update-admin/{id}`
#[instrument(skip_all)]
pub async fn update(
    State(state): State<AppState>,
    admin: RequireAdmin,
    Path(id): Path<AdminUserId>,
    Json(body): Json<UpdateAdminRequest>,
) -> Result<Json<AdminMessageResponse>> {
    admin.require(Permission::ManageAdmins)?;

    let changes = body.into_changes()?;
    let updated = AuthService::new(state.admins(), state.token_keys())
        .update_admin(id, &changes)
        .await?;

    Ok(Json(AdminMessageResponse {
        message: "Admin updated successfully",
        admin: updated.into(),
    }))
}

/// `GET /api/admin/get-admins/{id}`
#[instrument(skip_all)]
pub async fn show(
    State(state): State<AppState>,
    admin: RequireAdmin,
    Path(id): Path<AdminUserId>,
) -> Result<Json<AdminResponse>> {
    admin.require(Permission::ManageAdmins)?;

    let user = AuthService::new(state.admins(), state.token_keys())
        .get_admin(id)
        .await?;
    Ok(Json(user.into()))
}

/// `GET /api/admin/stats`
#[instrument(skip_all)]
pub async fn stats(
    State(state): State<AppState>,
    admin: RequireAdmin,
) -> Result<Json<AdminStatsResponse>> {
    admin.require(Permission::ViewStats)?;

    let admin_count = AuthService::new(state.admins(), state.token_keys())
        .admin_count()
        .await?;
    Ok(Json(AdminStatsResponse { admin_count }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_update_request_validation() {
        let changes = UpdateAdminRequest {
            first_name: Some("Ada".to_owned()),
            last_name: Some("King".to_owned()),
            email: None,
            role: Some("ADMIN".to_owned()),
            active: Some(false),
        }
        .into_changes()
        .unwrap();
        assert_eq!(changes.role, Some(AdminRole::Admin));
        assert!(changes.email.is_none());

        let err = UpdateAdminRequest {
            first_name: Some("Ada".to_owned()),
            last_name: Some("King".to_owned()),
            role: Some("OWNER".to_owned()),
            ..UpdateAdminRequest::default()
        }
        .into_changes()
        .unwrap_err();
        assert_eq!(err.field, "role");

        let err = UpdateAdminRequest::default().into_changes().unwrap_err();
        assert_eq!(err.field, "firstName");
    }
}
