//! Suggestion intake and moderation.

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::instrument;

use suggestion_box_core::{SuggestionId, SuggestionStatus};

use crate::db::{RepositoryError, SuggestionStore};
use crate::models::{NewSuggestion, Suggestion, SuggestionFilter};

/// Errors from suggestion operations.
#[derive(Debug, Error)]
pub enum SuggestionError {
    /// No suggestion with that ID.
    #[error("Suggestion not found")]
    NotFound,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Aggregate counts for the admin dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuggestionStats {
    pub total: usize,
    pub unread: usize,
    /// Count per category label.
    pub by_category: BTreeMap<String, usize>,
    /// Count per submission month, keyed `YYYY-MM` (UTC).
    pub by_month: BTreeMap<String, usize>,
}

impl SuggestionStats {
    fn tally(suggestions: &[Suggestion]) -> Self {
        let mut stats = Self {
            total: suggestions.len(),
            ..Self::default()
        };
        for s in suggestions {
            if s.status == SuggestionStatus::Unread {
                stats.unread += 1;
            }
            *stats
                .by_category
                .entry(s.category.as_str().to_owned())
                .or_default() += 1;
            *stats
                .by_month
                .entry(s.submitted_at.format("%Y-%m").to_string())
                .or_default() += 1;
        }
        stats
    }
}

/// Suggestion service.
pub struct SuggestionService<'a> {
    store: &'a dyn SuggestionStore,
}

impl<'a> SuggestionService<'a> {
    /// Create a new suggestion service.
    #[must_use]
    pub const fn new(store: &'a dyn SuggestionStore) -> Self {
        Self { store }
    }

    /// Store a validated submission. The store assigns the label.
    ///
    /// # Errors
    ///
    /// Returns `SuggestionError::Repository` if the store fails.
    #[instrument(skip_all)]
    pub async fn submit(&self, new: &NewSuggestion) -> Result<Suggestion, SuggestionError> {
        if !new.category.is_known() {
            tracing::debug!(category = %new.category, "category is not one of the form options");
        }
        let suggestion = self.store.create(new).await?;
        tracing::info!(
            suggestion_id = %suggestion.id,
            hash = %suggestion.hash,
            category = %suggestion.category,
            "suggestion submitted"
        );
        Ok(suggestion)
    }

    /// Suggestions passing `filter`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `SuggestionError::Repository` if the store fails.
    pub async fn list(&self, filter: &SuggestionFilter) -> Result<Vec<Suggestion>, SuggestionError> {
        Ok(self.store.list(filter).await?)
    }

    /// Delete a suggestion.
    ///
    /// # Errors
    ///
    /// Returns `SuggestionError::NotFound` if it does not exist.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: SuggestionId) -> Result<(), SuggestionError> {
        if !self.store.delete(id).await? {
            return Err(SuggestionError::NotFound);
        }
        tracing::info!(suggestion_id = %id, "suggestion deleted");
        Ok(())
    }

    /// Mark a suggestion read or unread.
    ///
    /// # Errors
    ///
    /// Returns `SuggestionError::NotFound` if it does not exist.
    #[instrument(skip(self))]
    pub async fn mark(
        &self,
        id: SuggestionId,
        status: SuggestionStatus,
    ) -> Result<Suggestion, SuggestionError> {
        self.store
            .set_status(id, status)
            .await?
            .ok_or(SuggestionError::NotFound)
    }

    /// Totals across every stored suggestion.
    ///
    /// # Errors
    ///
    /// Returns `SuggestionError::Repository` if the store fails.
    pub async fn stats(&self) -> Result<SuggestionStats, SuggestionError> {
        let all = self.store.list(&SuggestionFilter::default()).await?;
        Ok(SuggestionStats::tally(&all))
    }
}
