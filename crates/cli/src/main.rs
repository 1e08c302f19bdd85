//! Suggestion box CLI - database migrations and admin account management.
//!
//! # Usage
//!
//! ```bash
//! # Apply database migrations
//! sb-cli migrate
//!
//! # Create the default admin account if it does not exist yet
//! sb-cli seed
//!
//! # Create an admin account
//! sb-cli admin create -e ada@example.com -f Ada -l Lovelace -p 'Str0ng!pass'
//! ```
//!
//! # Environment Variables
//!
//! - `SUGGESTIONS_DATABASE_URL` (or `DATABASE_URL`) - `PostgreSQL` connection string
//! - `ADMIN_INITIAL_PASSWORD` - Password for accounts created without `-p`

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "sb-cli")]
#[command(author, version, about = "Suggestion box CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Create the default admin account if absent
    Seed,
    /// Manage admin users
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create a new admin user
    Create {
        /// Admin email address
        #[arg(short, long)]
        email: String,

        /// First name
        #[arg(short, long)]
        first_name: String,

        /// Last name
        #[arg(short, long)]
        last_name: String,

        /// Initial password (defaults to `ADMIN_INITIAL_PASSWORD`)
        #[arg(short, long)]
        password: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    dotenvy::dotenv().ok();

    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed => commands::seed::default_admin().await?,
        Commands::Admin { action } => match action {
            AdminAction::Create {
                email,
                first_name,
                last_name,
                password,
            } => {
                commands::admin::create_user(&email, &first_name, &last_name, password.as_deref())
                    .await?;
            }
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_admin_create() {
        let cli = Cli::try_parse_from([
            "sb-cli", "admin", "create", "-e", "a@b.co", "-f", "Ada", "-l", "King",
        ])
        .unwrap_or_else(|e| panic!("{e}"));
        match cli.command {
            Commands::Admin {
                action: AdminAction::Create { email, password, .. },
            } => {
                assert_eq!(email, "a@b.co");
                assert!(password.is_none());
            }
            _ => panic!("wrong subcommand"),
        }
    }
}
