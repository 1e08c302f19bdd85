//! Bearer-token extractor for admin routes.
//!
//! Runs the authorization gate before the handler body, so a protected
//! handler cannot reach a store without a verified caller. The token's
//! account is re-read on every request, so deactivating an admin revokes
//! their outstanding tokens.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use suggestion_box_core::{AdminRole, Permission, role_has_permission};

use crate::error::{AppError, set_sentry_user};
use crate::models::CurrentAdmin;
use crate::services::auth::{
    AuthDecision, AuthError, Claims, RejectReason, authorize,
};
use crate::state::AppState;

/// Extractor that requires a valid token for a role satisfying `ADMIN`.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(admin: RequireAdmin) -> Result<Json<()>> {
///     admin.require(Permission::ManageSuggestions)?;
///     // ...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RequireAdmin {
    claims: Claims,
}

impl RequireAdmin {
    /// The verified caller.
    #[must_use]
    pub fn current(&self) -> CurrentAdmin {
        self.claims.current_admin()
    }

    /// Fail with 403 unless the caller's role grants `permission`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Forbidden` when the permission is missing.
    pub fn require(&self, permission: Permission) -> Result<(), AppError> {
        if role_has_permission(self.claims.role, permission) {
            Ok(())
        } else {
            Err(AppError::Forbidden("Insufficient permissions".to_owned()))
        }
    }
}

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = match parts.headers.get(AUTHORIZATION) {
            None => None,
            Some(value) => Some(
                value
                    .to_str()
                    .map_err(|_| AppError::Rejected(RejectReason::MalformedHeader))?,
            ),
        };

        match authorize(header, state.token_keys(), AdminRole::Admin) {
            AuthDecision::Authorized(claims) => {
                // Tokens outlive account changes; the account must still exist and be active.
                let user = state
                    .admins()
                    .get_by_id(claims.sub)
                    .await?
                    .ok_or(RejectReason::UnknownSubject)?;
                if !user.active {
                    return Err(AuthError::AccountInactive.into());
                }
                set_sentry_user(&claims.sub, Some(claims.email.as_str()));
                Ok(Self { claims })
            }
            AuthDecision::Rejected(reason) => {
                tracing::debug!(reason = %reason, path = %parts.uri.path(), "admin request rejected");
                Err(reason.into())
            }
        }
    }
}
