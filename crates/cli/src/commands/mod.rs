//! Subcommand implementations.

pub mod admin;
pub mod migrate;
pub mod seed;

use secrecy::SecretString;
use sqlx::PgPool;
use thiserror::Error;

use suggestion_box_server::config::DEFAULT_INITIAL_PASSWORD;
use suggestion_box_server::db;
use suggestion_box_server::services::AuthError;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration failed.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Account creation was rejected.
    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// Connect to the database named by `SUGGESTIONS_DATABASE_URL` or `DATABASE_URL`.
async fn connect() -> Result<PgPool, CommandError> {
    let database_url = std::env::var("SUGGESTIONS_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| CommandError::MissingEnvVar("SUGGESTIONS_DATABASE_URL"))?;

    tracing::info!("Connecting to database...");
    Ok(db::create_pool(&database_url).await?)
}

/// Password for accounts created without an explicit one.
fn initial_password() -> String {
    std::env::var("ADMIN_INITIAL_PASSWORD").unwrap_or_else(|_| DEFAULT_INITIAL_PASSWORD.to_owned())
}
