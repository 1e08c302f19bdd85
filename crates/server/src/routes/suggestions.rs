//! Suggestion route handlers.
//!
//! Submission and listing are public; moderation and stats need an admin
//! token.

use std::collections::BTreeMap;

use axum::{extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use suggestion_box_core::{Category, Permission, SuggestionId, SuggestionStatus};

use super::MessageResponse;
use crate::error::{AppError, Json, Path, Query, Result};
use crate::middleware::RequireAdmin;
use crate::models::{NewSuggestion, Suggestion, SuggestionFilter, ValidationError};
use crate::services::{SuggestionService, SuggestionStats};
use crate::state::AppState;

/// Display format for `dateTime`, e.g. `03/07/2025, 02:15 PM`.
const DATE_TIME_FORMAT: &str = "%m/%d/%Y, %I:%M %p";

// =============================================================================
// Wire Types
// =============================================================================

/// Suggestion as returned to clients.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionResponse {
    pub id: SuggestionId,
    pub hash: String,
    pub category: String,
    pub suggestion: String,
    pub employee_id: String,
    pub submitted_at: DateTime<Utc>,
    pub date_time: String,
    pub status: SuggestionStatus,
}

impl From<Suggestion> for SuggestionResponse {
    fn from(s: Suggestion) -> Self {
        Self {
            id: s.id,
            hash: s.hash.to_string(),
            category: s.category.as_str().to_owned(),
            suggestion: s.text.as_str().to_owned(),
            employee_id: s.submitter_id,
            date_time: s.submitted_at.format(DATE_TIME_FORMAT).to_string(),
            submitted_at: s.submitted_at,
            status: s.status,
        }
    }
}

/// Submission body. Missing fields are reported as validation errors.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    pub suggestion: Option<String>,
    pub category: Option<String>,
    #[serde(alias = "submitterId")]
    pub employee_id: Option<String>,
}

/// List filters.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
    pub category: Option<String>,
}

impl ListQuery {
    fn into_filter(self) -> std::result::Result<SuggestionFilter, ValidationError> {
        let status = self
            .status
            .filter(|s| !s.is_empty())
            .map(|s| s.parse::<SuggestionStatus>())
            .transpose()
            .map_err(|e| ValidationError::new("status", e.to_string()))?;
        let category = self
            .category
            .filter(|c| !c.trim().is_empty())
            .map(|c| Category::parse(&c))
            .transpose()
            .map_err(|e| ValidationError::new("category", e.to_string()))?;
        Ok(SuggestionFilter { status, category })
    }
}

/// Dashboard totals.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub total: usize,
    pub unread: usize,
    pub by_category: BTreeMap<String, usize>,
    pub by_month: BTreeMap<String, usize>,
}

impl From<SuggestionStats> for StatsResponse {
    fn from(stats: SuggestionStats) -> Self {
        Self {
            total: stats.total,
            unread: stats.unread,
            by_category: stats.by_category,
            by_month: stats.by_month,
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// `GET /api/suggestions`
#[instrument(skip_all)]
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<SuggestionResponse>>> {
    let filter = query.into_filter()?;
    let suggestions = SuggestionService::new(state.suggestions())
        .list(&filter)
        .await?;
    Ok(Json(suggestions.into_iter().map(Into::into).collect()))
}

/// `POST /api/suggestions`
#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<SubmitRequest>,
) -> Result<(StatusCode, Json<SuggestionResponse>)> {
    let new = NewSuggestion::parse(
        body.suggestion.as_deref(),
        body.category.as_deref(),
        body.employee_id.as_deref(),
    )?;
    let suggestion = SuggestionService::new(state.suggestions())
        .submit(&new)
        .await?;
    Ok((StatusCode::CREATED, Json(suggestion.into())))
}

/// `DELETE /api/suggestions/{id}`
#[instrument(skip_all)]
pub async fn delete(
    State(state): State<AppState>,
    admin: RequireAdmin,
    Path(id): Path<SuggestionId>,
) -> Result<Json<MessageResponse>> {
    admin.require(Permission::ManageSuggestions)?;
    SuggestionService::new(state.suggestions()).delete(id).await?;
    Ok(Json(MessageResponse::new("Suggestion deleted successfully")))
}

/// `PUT /api/suggestions/{id}/{status}`
#[instrument(skip_all)]
pub async fn mark(
    State(state): State<AppState>,
    admin: RequireAdmin,
    Path((id, status)): Path<(SuggestionId, String)>,
) -> Result<Json<SuggestionResponse>> {
    admin.require(Permission::ManageSuggestions)?;
    let status = status
        .parse::<SuggestionStatus>()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    let suggestion = SuggestionService::new(state.suggestions())
        .mark(id, status)
        .await?;
    Ok(Json(suggestion.into()))
}

/// `GET /api/suggestions/categories`
#[instrument(skip_all)]
pub async fn categories() -> Json<&'static [&'static str]> {
    Json(Category::KNOWN)
}

/// `GET /api/suggestions/stats`
#[instrument(skip_all)]
pub async fn stats(
    State(state): State<AppState>,
    admin: RequireAdmin,
) -> Result<Json<StatsResponse>> {
    admin.require(Permission::ViewStats)?;
    let stats = SuggestionService::new(state.suggestions()).stats().await?;
    Ok(Json(stats.into()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use suggestion_box_core::SuggestionHash;

    use super::*;
    use crate::models::SuggestionText;

    #[test]
    fn test_response_shape() {
        let suggestion = Suggestion {
            id: SuggestionId::new(3),
            hash: SuggestionHash::from_sequence(3).unwrap(),
            category: Category::parse("Safety").unwrap(),
            text: SuggestionText::parse("Mark the forklift lanes").unwrap(),
            submitter_id: "Anonymous".to_owned(),
            submitted_at: Utc.with_ymd_and_hms(2025, 3, 7, 14, 15, 0).unwrap(),
            status: SuggestionStatus::Unread,
        };
        let json = serde_json::to_value(SuggestionResponse::from(suggestion)).unwrap();
        assert_eq!(json["hash"], "A003");
        assert_eq!(json["employeeId"], "Anonymous");
        assert_eq!(json["dateTime"], "03/07/2025, 02:15 PM");
        assert_eq!(json["status"], "unread");
        assert_eq!(json["id"], 3);
    }

    #[test]
    fn test_list_query_validation() {
        let ok = ListQuery {
            status: Some("read".to_owned()),
            category: Some(" IT ".to_owned()),
        }
        .into_filter()
        .unwrap();
        assert_eq!(ok.status, Some(SuggestionStatus::Read));
        assert_eq!(ok.category.unwrap().as_str(), "IT");

        let err = ListQuery {
            status: Some("archived".to_owned()),
            category: None,
        }
        .into_filter()
        .unwrap_err();
        assert_eq!(err.field, "status");

        assert_eq!(ListQuery::default().into_filter().unwrap(), SuggestionFilter::default());
    }
}
