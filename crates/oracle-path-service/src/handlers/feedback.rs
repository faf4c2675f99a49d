//! Feedback submission handler.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use oracle_path_core::Feedback;
use oracle_path_store::Store;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

/// Feedback submission request.
#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    /// The feedback text.
    pub message: String,
    /// Contact email, if the user wants a reply.
    pub email: Option<String>,
    /// Platform the feedback was sent from.
    pub platform: Option<String>,
    /// Reported user agent.
    pub user_agent: Option<String>,
}

/// Feedback submission response.
#[derive(Debug, Serialize)]
pub struct FeedbackResponse {
    /// The stored entry's ID.
    pub id: String,
    /// Triage status.
    pub status: String,
}

/// Submit feedback from the authenticated user.
pub async fn submit_feedback(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(body): Json<FeedbackRequest>,
) -> Result<Json<FeedbackResponse>, ApiError> {
    let message = body.message.trim();
    if message.is_empty() {
        return Err(ApiError::BadRequest("Message is required".into()));
    }

    let feedback = Feedback::new(
        auth.user_id,
        body.email,
        message.to_string(),
        body.platform,
        body.user_agent,
    );

    state.store.put_feedback(&feedback)?;

    tracing::info!(
        user_id = %auth.user_id,
        feedback_id = %feedback.id,
        "Feedback received"
    );

    Ok(Json(FeedbackResponse {
        id: feedback.id.to_string(),
        status: feedback.status,
    }))
}
