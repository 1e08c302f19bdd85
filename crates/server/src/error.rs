//! Unified error handling with Sentry integration.
//!
//! Every handler returns `Result<T, AppError>`. Errors render as
//! `{"message": "..."}`; server-side failures are captured to Sentry and
//! replaced with an opaque message before reaching the client.
//!
//! The [`Json`] and [`Path`] wrappers swap axum's plain-text rejections for
//! [`AppError`], so malformed bodies come back as JSON 400s and unparseable
//! path IDs as JSON 404s.

use axum::{
    extract::{
        FromRequest, FromRequestParts,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::models::ValidationError;
use crate::services::auth::{AuthError, RejectReason};
use crate::services::suggestions::SuggestionError;

/// Application-level error type for the suggestion box.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Authentication or account operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Suggestion operation failed.
    #[error("Suggestion error: {0}")]
    Suggestion(#[from] SuggestionError),

    /// The authorization gate turned the request away.
    #[error("{0}")]
    Rejected(#[from] RejectReason),

    /// Request field failed validation.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Resource not found.
    #[error("{0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("{0}")]
    BadRequest(String),

    /// Caller is authenticated but lacks the permission.
    #[error("{0}")]
    Forbidden(String),
}

/// JSON error body.
#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
}

const INTERNAL_MESSAGE: &str = "Internal server error";

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Auth(err) => match err {
                AuthError::InvalidEmail(_)
                | AuthError::Validation(_)
                | AuthError::IncorrectPassword => StatusCode::BAD_REQUEST,
                AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AuthError::AccountInactive => StatusCode::FORBIDDEN,
                AuthError::UserNotFound => StatusCode::NOT_FOUND,
                AuthError::UserAlreadyExists => StatusCode::CONFLICT,
                AuthError::Token(_) | AuthError::Repository(_) | AuthError::PasswordHash => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Suggestion(err) => match err {
                SuggestionError::NotFound => StatusCode::NOT_FOUND,
                SuggestionError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Rejected(reason) => match reason {
                RejectReason::InsufficientRole { .. } => StatusCode::FORBIDDEN,
                RejectReason::MissingToken
                | RejectReason::MalformedHeader
                | RejectReason::InvalidToken(_)
                | RejectReason::UnknownSubject => StatusCode::UNAUTHORIZED,
            },
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
        }
    }

    /// Client-facing message. Never includes internal details.
    fn client_message(&self) -> String {
        match self {
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => "Invalid credentials".to_owned(),
                AuthError::AccountInactive => "Account is inactive".to_owned(),
                AuthError::UserNotFound => "Admin not found".to_owned(),
                AuthError::InvalidEmail(_) => "Invalid email address".to_owned(),
                AuthError::Validation(e) => e.to_string(),
                AuthError::UserAlreadyExists | AuthError::IncorrectPassword => err.to_string(),
                AuthError::Token(_) | AuthError::Repository(_) | AuthError::PasswordHash => {
                    INTERNAL_MESSAGE.to_owned()
                }
            },
            Self::Suggestion(SuggestionError::NotFound) => "Suggestion not found".to_owned(),
            Self::Rejected(RejectReason::InvalidToken(_) | RejectReason::UnknownSubject) => {
                "Invalid or expired token".to_owned()
            }
            Self::Rejected(RejectReason::InsufficientRole { .. }) => {
                "Insufficient permissions".to_owned()
            }
            _ if self.status().is_server_error() => INTERNAL_MESSAGE.to_owned(),
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
        }

        let body = ErrorBody {
            message: self.client_message(),
        };
        (status, axum::Json(body)).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(_: PathRejection) -> Self {
        Self::NotFound("Not found".to_owned())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// JSON extractor and response whose rejection is an [`AppError`].
#[derive(Debug, Clone, Copy, Default, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

/// Path extractor whose rejection is a JSON 404.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct Path<T>(pub T);

/// Query extractor whose rejection is a JSON 400.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct Query<T>(pub T);

/// Set the Sentry user context for the authenticated admin.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}
