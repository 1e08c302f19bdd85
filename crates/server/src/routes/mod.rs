//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                          - Liveness
//! GET    /health/ready                    - Readiness (store ping)
//!
//! # Suggestions
//! GET    /api/suggestions                 - List (?status=&category=)
//! POST   /api/suggestions                 - Submit
//! GET    /api/suggestions/categories      - Form categories
//! GET    /api/suggestions/stats           - Dashboard totals (admin)
//! DELETE /api/suggestions/{id}            - Delete (admin)
//! PUT    /api/suggestions/{id}/{status}   - Mark read/unread (admin)
//!
//! # Auth
//! POST   /auth/login                      - Password login, returns token
//! POST   /api/admin/login                 - Same as above
//!
//! # Admin management (admin)
//! POST   /api/admin/create-admin
//! POST   /api/admin/update-admin/{id}
//! GET    /api/admin/get-admins/{id}
//! GET    /api/admin/stats
//! POST   /api/admin/change-password
//! ```

pub mod admin_users;
pub mod auth;
pub mod suggestions;

use std::time::Duration;

use axum::{
    Router,
    extract::State,
    http::{HeaderValue, Method, StatusCode, header},
    routing::{get, post, put},
};
use serde::Serialize;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::error::AppError;
use crate::state::AppState;

/// `{"message": ...}` success body.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Create the suggestion routes router.
pub fn suggestion_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(suggestions::list).post(suggestions::create))
        .route("/categories", get(suggestions::categories))
        .route("/stats", get(suggestions::stats))
        .route("/{id}", axum::routing::delete(suggestions::delete))
        .route("/{id}/{status}", put(suggestions::mark))
}

/// Create the admin management routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/create-admin", post(admin_users::create))
        .route("/update-admin/{id}", post(admin_users::update))
        .route("/get-admins/{id}", get(admin_users::show))
        .route("/stats", get(admin_users::stats))
        .route("/change-password", post(auth::change_password))
}

/// Create all API routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/suggestions", suggestion_routes())
        .nest("/api/admin", admin_routes())
        .route("/auth/login", post(auth::login))
}

/// Build the complete application with health checks, CORS, tracing and
/// Sentry layers.
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config().cors_origin);

    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes())
        .fallback(fallback)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>, latency: Duration, span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}

fn cors_layer(origin: &str) -> CorsLayer {
    let allow_origin = HeaderValue::from_str(origin).map_or_else(
        |_| {
            tracing::warn!(origin, "CORS_ORIGIN is not a valid header value; cross-origin requests will be refused");
            AllowOrigin::list([])
        },
        AllowOrigin::exact,
    );

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .max_age(Duration::from_secs(60 * 60))
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the store does not answer.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.suggestions().ping().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

async fn fallback() -> AppError {
    AppError::NotFound("Endpoint not found".to_owned())
}
