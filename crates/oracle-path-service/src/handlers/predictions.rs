//! Prediction history handlers.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use oracle_path_core::PredictionRecord;
use oracle_path_store::Store;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

/// Default page size for history listings.
const DEFAULT_LIMIT: usize = 20;

/// Maximum page size for history listings.
const MAX_LIMIT: usize = 100;

/// History listing query parameters.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Maximum number of records to return.
    pub limit: Option<usize>,
    /// Number of records to skip.
    pub offset: Option<usize>,
}

/// A single prediction in a history listing.
#[derive(Debug, Serialize)]
pub struct PredictionView {
    /// Prediction ID.
    pub id: String,
    /// The question as submitted.
    pub prompt: String,
    /// The Oracle's answer.
    pub prediction: String,
    /// Whether the request was served on the premium tier.
    pub is_premium: bool,
    /// Instruction language, if one was resolved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Reading style, if one was selected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reading_type: Option<String>,
    /// Creation timestamp.
    pub created_at: String,
}

impl From<&PredictionRecord> for PredictionView {
    fn from(record: &PredictionRecord) -> Self {
        Self {
            id: record.id.to_string(),
            prompt: record.prompt.clone(),
            prediction: record.prediction.clone(),
            is_premium: record.is_premium,
            language: record.language.map(|l| l.code().to_string()),
            reading_type: record.reading_type.map(|r| r.as_str().to_string()),
            created_at: record.created_at.to_rfc3339(),
        }
    }
}

/// History listing response.
#[derive(Debug, Serialize)]
pub struct ListResponse {
    /// Predictions, newest first.
    pub predictions: Vec<PredictionView>,
    /// Number of records in this page.
    pub count: usize,
}

/// List the authenticated user's predictions, newest first.
pub async fn list_predictions(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<ListResponse>, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
    let offset = query.offset.unwrap_or(0);

    let records = state
        .store
        .list_predictions_by_user(&auth.user_id, limit, offset)?;

    let predictions: Vec<PredictionView> = records.iter().map(PredictionView::from).collect();
    let count = predictions.len();

    Ok(Json(ListResponse { predictions, count }))
}
