//! Integration tests for the suggestion box server.
//!
//! # Running Tests
//!
//! ```bash
//! # In-memory tests (no external services)
//! cargo test -p suggestion-box-integration-tests
//!
//! # Include the PostgreSQL tests
//! SUGGESTIONS_DATABASE_URL=postgres://localhost/suggestions_test \
//!     cargo test -p suggestion-box-integration-tests -- --include-ignored
//! ```
//!
//! Each [`TestServer`] binds its own ephemeral port, so tests run in parallel
//! without sharing state.

#![allow(clippy::missing_panics_doc)]

use reqwest::Client;
use secrecy::SecretString;
use serde::Serialize;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use suggestion_box_core::Email;
use suggestion_box_server::AppState;
use suggestion_box_server::config::ServerConfig;
use suggestion_box_server::db;
use suggestion_box_server::models::{AdminUser, PersonName};
use suggestion_box_server::services::AuthService;
use suggestion_box_server::services::auth::AdminProfile;

/// Signing secret used by every test server.
pub const TEST_JWT_SECRET: &str = "aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6%";

/// Password given to admins created through [`TestServer::seed_admin`].
pub const TEST_PASSWORD: &str = "Password$1234";

/// Server configuration for tests, optionally overriding variables.
#[must_use]
pub fn test_config(overrides: &[(&str, &str)]) -> ServerConfig {
    ServerConfig::from_lookup(|key| {
        overrides
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| (*v).to_owned())
            .or_else(|| (key == "JWT_SECRET").then(|| TEST_JWT_SECRET.to_owned()))
    })
    .expect("test config should be valid")
}

/// A server running on an ephemeral local port.
pub struct TestServer {
    pub base_url: String,
    pub client: Client,
    pub state: AppState,
    shutdown: Option<oneshot::Sender<()>>,
}

impl TestServer {
    /// Spawn a server over a fresh in-memory store.
    pub async fn spawn() -> Self {
        Self::spawn_with(AppState::in_memory(test_config(&[]))).await
    }

    /// Spawn a server over `PostgreSQL`, applying migrations first.
    ///
    /// Returns `None` when no database URL is configured.
    pub async fn spawn_postgres() -> Option<Self> {
        let url = std::env::var("SUGGESTIONS_DATABASE_URL")
            .or_else(|_| std::env::var("DATABASE_URL"))
            .ok()?;
        let pool = db::create_pool(&SecretString::from(url))
            .await
            .expect("Failed to connect to test database");
        db::MIGRATOR
            .run(&pool)
            .await
            .expect("Failed to run migrations");
        Some(Self::spawn_with(AppState::postgres(test_config(&[]), pool)).await)
    }

    /// Spawn a server over the given state.
    pub async fn spawn_with(state: AppState) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local addr");
        let (tx, rx) = oneshot::channel::<()>();

        let server_state = state.clone();
        tokio::spawn(async move {
            let shutdown = async {
                rx.await.ok();
            };
            if let Err(e) = suggestion_box_server::serve(listener, server_state, shutdown).await {
                report_server_error(&e);
            }
        });

        Self {
            base_url: format!("http://{addr}"),
            client: Client::new(),
            state,
            shutdown: Some(tx),
        }
    }

    /// Absolute URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Create an admin directly in the store with [`TEST_PASSWORD`].
    pub async fn seed_admin(&self, email: &str, active: bool) -> AdminUser {
        let profile = AdminProfile {
            first_name: PersonName::parse("firstName", "Test").expect("valid name"),
            last_name: PersonName::parse("lastName", "Admin").expect("valid name"),
            email: Email::parse(email).expect("valid email"),
            active,
        };
        AuthService::new(self.state.admins(), self.state.token_keys())
            .create_admin(profile, TEST_PASSWORD)
            .await
            .expect("Failed to seed admin")
    }

    /// Log in over HTTP and return the bearer token.
    pub async fn login(&self, email: &str, password: &str) -> String {
        let body: serde_json::Value = self
            .client
            .post(self.url("/auth/login"))
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to send login")
            .json()
            .await
            .expect("Failed to read login response");
        body["token"]
            .as_str()
            .expect("login response should carry a token")
            .to_owned()
    }

    /// Seed an active admin and return its token.
    pub async fn admin_token(&self, email: &str) -> String {
        self.seed_admin(email, true).await;
        self.login(email, TEST_PASSWORD).await
    }

    /// Submit a suggestion and return the response body.
    pub async fn submit(&self, body: &impl Serialize) -> serde_json::Value {
        let resp = self
            .client
            .post(self.url("/api/suggestions"))
            .json(body)
            .send()
            .await
            .expect("Failed to submit suggestion");
        assert_eq!(resp.status(), reqwest::StatusCode::CREATED);
        resp.json().await.expect("Failed to read suggestion")
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

#[allow(clippy::print_stderr)]
fn report_server_error(err: &std::io::Error) {
    eprintln!("test server exited with error: {err}");
}
