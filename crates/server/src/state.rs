//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::ServerConfig;
use crate::db::{AdminUserStore, MemoryStore, PgAdminUserRepository, PgSuggestionRepository, SuggestionStore};
use crate::services::auth::TokenKeys;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. Stores are held as trait
/// objects so the same router runs against `PostgreSQL` or memory.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    suggestions: Arc<dyn SuggestionStore>,
    admins: Arc<dyn AdminUserStore>,
    token_keys: TokenKeys,
}

impl AppState {
    /// Create application state over the given stores.
    #[must_use]
    pub fn new(
        config: ServerConfig,
        suggestions: Arc<dyn SuggestionStore>,
        admins: Arc<dyn AdminUserStore>,
    ) -> Self {
        let token_keys = TokenKeys::new(&config.jwt_secret, config.token_ttl);
        Self {
            inner: Arc::new(AppStateInner {
                config,
                suggestions,
                admins,
                token_keys,
            }),
        }
    }

    /// State backed by `PostgreSQL`.
    #[must_use]
    pub fn postgres(config: ServerConfig, pool: PgPool) -> Self {
        Self::new(
            config,
            Arc::new(PgSuggestionRepository::new(pool.clone())),
            Arc::new(PgAdminUserRepository::new(pool)),
        )
    }

    /// State backed by a fresh [`MemoryStore`].
    #[must_use]
    pub fn in_memory(config: ServerConfig) -> Self {
        let store = Arc::new(MemoryStore::new());
        Self::new(config, store.clone(), store)
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Suggestion persistence.
    #[must_use]
    pub fn suggestions(&self) -> &dyn SuggestionStore {
        self.inner.suggestions.as_ref()
    }

    /// Admin account persistence.
    #[must_use]
    pub fn admins(&self) -> &dyn AdminUserStore {
        self.inner.admins.as_ref()
    }

    /// Token signing and verification keys.
    #[must_use]
    pub fn token_keys(&self) -> &TokenKeys {
        &self.inner.token_keys
    }
}
