//! Suggestion repository for `PostgreSQL`.
//!
//! Queries are bound at runtime so the crate builds without a live database.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use suggestion_box_core::{Category, SuggestionHash, SuggestionId, SuggestionStatus};

use super::{RepositoryError, SuggestionStore};
use crate::models::{NewSuggestion, Suggestion, SuggestionFilter, SuggestionText};

const SUGGESTION_COLUMNS: &str =
    "id, hash, category, suggestion, submitter_id, submitted_at, status";

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for `PostgreSQL` suggestion queries.
#[derive(Debug, sqlx::FromRow)]
struct SuggestionRow {
    id: i32,
    hash: String,
    category: String,
    suggestion: String,
    submitter_id: String,
    submitted_at: DateTime<Utc>,
    status: String,
}

impl TryFrom<SuggestionRow> for Suggestion {
    type Error = RepositoryError;

    fn try_from(row: SuggestionRow) -> Result<Self, Self::Error> {
        let id = row.id;
        let corrupt = |what: &str, e: &dyn std::fmt::Display| {
            RepositoryError::DataCorruption(format!(
                "suggestion {id}: invalid {what} in database: {e}"
            ))
        };

        Ok(Self {
            id: SuggestionId::new(id),
            hash: SuggestionHash::parse(&row.hash).map_err(|e| corrupt("hash", &e))?,
            category: Category::parse(&row.category).map_err(|e| corrupt("category", &e))?,
            text: SuggestionText::parse(&row.suggestion).map_err(|e| corrupt("text", &e))?,
            submitter_id: row.submitter_id,
            submitted_at: row.submitted_at,
            status: row
                .status
                .parse::<SuggestionStatus>()
                .map_err(|e| corrupt("status", &e))?,
        })
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for suggestion database operations.
#[derive(Clone)]
pub struct PgSuggestionRepository {
    pool: PgPool,
}

impl PgSuggestionRepository {
    /// Create a new suggestion repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SuggestionStore for PgSuggestionRepository {
    async fn list(&self, filter: &SuggestionFilter) -> Result<Vec<Suggestion>, RepositoryError> {
        let rows = sqlx::query_as::<_, SuggestionRow>(&format!(
            r"
            SELECT {SUGGESTION_COLUMNS}
            FROM suggestion
            WHERE ($1::TEXT IS NULL OR status = $1)
              AND ($2::TEXT IS NULL OR category = $2)
            ORDER BY id ASC
            "
        ))
        .bind(filter.status.map(SuggestionStatus::as_str))
        .bind(filter.category.as_ref().map(Category::as_str))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn create(&self, new: &NewSuggestion) -> Result<Suggestion, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        // The row lock taken by this UPDATE serializes concurrent submitters
        // until commit, so labels follow insert order with no gaps.
        let sequence: i64 = sqlx::query_scalar(
            r"
            UPDATE suggestion_counter
            SET value = value + 1
            WHERE id
            RETURNING value
            ",
        )
        .fetch_one(&mut *tx)
        .await?;

        let hash = u32::try_from(sequence)
            .ok()
            .and_then(SuggestionHash::from_sequence)
            .ok_or_else(|| {
                RepositoryError::DataCorruption(format!("suggestion counter out of range: {sequence}"))
            })?;

        let row = sqlx::query_as::<_, SuggestionRow>(&format!(
            r"
            INSERT INTO suggestion (hash, category, suggestion, submitter_id)
            VALUES ($1, $2, $3, $4)
            RETURNING {SUGGESTION_COLUMNS}
            "
        ))
        .bind(hash.to_string())
        .bind(new.category.as_str())
        .bind(new.text.as_str())
        .bind(&new.submitter_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        row.try_into()
    }

    async fn set_status(
        &self,
        id: SuggestionId,
        status: SuggestionStatus,
    ) -> Result<Option<Suggestion>, RepositoryError> {
        let row = sqlx::query_as::<_, SuggestionRow>(&format!(
            r"
            UPDATE suggestion
            SET status = $2
            WHERE id = $1
            RETURNING {SUGGESTION_COLUMNS}
            "
        ))
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn delete(&self, id: SuggestionId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM suggestion WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
