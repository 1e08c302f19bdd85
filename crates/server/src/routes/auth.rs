//! Login and password change.

use axum::extract::State;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use suggestion_box_core::{AdminRole, AdminUserId, Email};

use super::MessageResponse;
use crate::error::{Json, Result};
use crate::middleware::RequireAdmin;
use crate::models::AdminUser;
use crate::services::AuthService;
use crate::state::AppState;

/// Login body.
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Identity returned alongside the token.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginUser {
    pub id: AdminUserId,
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub role: AdminRole,
}

impl From<AdminUser> for LoginUser {
    fn from(user: AdminUser) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name.to_string(),
            last_name: user.last_name.to_string(),
            email: user.email,
            role: user.role,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: LoginUser,
    pub token: String,
}

/// Password change body.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[serde(default)]
    pub current_password: String,
    #[serde(default)]
    pub new_password: String,
}

/// `POST /auth/login` and `POST /api/admin/login`
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let (user, token) = AuthService::new(state.admins(), state.token_keys())
        .login(&body.email, &body.password)
        .await?;

    Ok(Json(LoginResponse {
        user: user.into(),
        token,
    }))
}

/// `POST /api/admin/change-password`
#[instrument(skip_all)]
pub async fn change_password(
    State(state): State<AppState>,
    admin: RequireAdmin,
    Json(body): Json<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>> {
    AuthService::new(state.admins(), state.token_keys())
        .change_password(
            admin.current().id,
            &body.current_password,
            &body.new_password,
        )
        .await?;

    Ok(Json(MessageResponse::new("Password updated successfully")))
}
