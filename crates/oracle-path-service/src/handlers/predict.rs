//! Prediction submission handler.
//!
//! The central pipeline of the service: validate the prompt, enforce the
//! free-tier quota, resolve the instruction language, consult the Oracle,
//! and persist the outcome.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use oracle_path_core::{detect_language, Language, PredictionRecord, ReadingType};
use oracle_path_store::Store;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::ledger::UsageLedger;
use crate::oracle::OracleError;
use crate::state::AppState;

/// Prediction request.
#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    /// The seeker's question.
    pub prompt: String,
    /// Three-letter language code; detected from the prompt when absent or
    /// unsupported.
    pub language: Option<String>,
    /// Reading style (defaults to mystic).
    pub reading_type: Option<ReadingType>,
}

/// Prediction response.
#[derive(Debug, Serialize)]
pub struct PredictResponse {
    /// The Oracle's answer.
    pub prediction: String,
    /// Instruction language used.
    pub language: String,
    /// Reading style used.
    pub reading_type: String,
    /// Whether the request was served on the premium tier.
    pub is_premium: bool,
    /// Free predictions left today (free tier only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining: Option<u32>,
}

/// Submit a question to the Oracle.
pub async fn predict(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(body): Json<PredictRequest>,
) -> Result<Json<PredictResponse>, ApiError> {
    let prompt = body.prompt.trim();
    if prompt.is_empty() {
        return Err(ApiError::BadRequest("Prompt is required".into()));
    }

    // Absent profile means free tier.
    let is_premium = state
        .store
        .get_profile(&auth.user_id)?
        .is_some_and(|profile| profile.is_premium());

    let ledger = UsageLedger::new(state.store.as_ref());

    // Quota gate before any collaborator contact. Fails closed.
    if !is_premium && !ledger.check_daily_limit(&auth.user_id) {
        return Err(ApiError::LimitReached);
    }

    let language = body
        .language
        .as_deref()
        .and_then(Language::from_code)
        .unwrap_or_else(|| detect_language(prompt));

    let reading_type = body.reading_type.unwrap_or_default();

    let oracle = state.oracle.as_ref().ok_or(ApiError::OracleUnavailable)?;

    let prediction = oracle
        .predict(prompt, reading_type, language, is_premium)
        .await
        .map_err(|e| map_oracle_error(&e, &auth))?;

    // The answer is already earned; a failed history write must not
    // withhold it.
    let record = PredictionRecord::new(
        auth.user_id,
        prompt.to_string(),
        prediction.clone(),
        is_premium,
        Some(language),
        Some(reading_type),
    );
    if let Err(e) = state.store.put_prediction(&record) {
        tracing::error!(
            user_id = %auth.user_id,
            prediction_id = %record.id,
            error = %e,
            "Failed to persist prediction record"
        );
    }

    // The quota increment is different: swallowing a failure here would
    // allow unlimited free use, so it propagates.
    let remaining = if is_premium {
        None
    } else {
        ledger.increment_daily_usage(&auth.user_id)?;
        Some(ledger.remaining_predictions(&auth.user_id))
    };

    tracing::info!(
        user_id = %auth.user_id,
        prediction_id = %record.id,
        is_premium = %is_premium,
        language = %language.code(),
        reading_type = %reading_type.as_str(),
        "Prediction served"
    );

    Ok(Json(PredictResponse {
        prediction,
        language: language.code().to_string(),
        reading_type: reading_type.as_str().to_string(),
        is_premium,
        remaining,
    }))
}

/// Map an inference failure to a themed client-facing error.
///
/// The underlying detail is logged here and never forwarded.
fn map_oracle_error(error: &OracleError, auth: &AuthUser) -> ApiError {
    match error {
        OracleError::Auth => {
            tracing::error!(user_id = %auth.user_id, "Oracle credentials rejected");
            ApiError::OracleUnavailable
        }
        OracleError::RateLimited => {
            tracing::warn!(user_id = %auth.user_id, "Oracle rate limited");
            ApiError::OracleRateLimited
        }
        OracleError::Http(e) => {
            tracing::error!(user_id = %auth.user_id, error = %e, "Oracle request failed");
            ApiError::OracleUnavailable
        }
        OracleError::Api { status, message } => {
            tracing::error!(
                user_id = %auth.user_id,
                status = %status,
                error = %message,
                "Oracle API error"
            );
            ApiError::OracleUnavailable
        }
        OracleError::EmptyResponse => {
            tracing::error!(user_id = %auth.user_id, "Oracle returned no completion");
            ApiError::OracleUnavailable
        }
    }
}
