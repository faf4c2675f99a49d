//! Request and response types for the Oracle Path API.

use serde::{Deserialize, Serialize};

/// Prediction request.
#[derive(Debug, Clone, Serialize)]
pub struct PredictRequest {
    /// The question to ask.
    pub prompt: String,

    /// Three-letter language code; the service detects the language from the
    /// prompt when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    /// Reading style: `mystic` (default) or `tarot`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reading_type: Option<String>,
}

/// Prediction response.
#[derive(Debug, Clone, Deserialize)]
pub struct PredictResponse {
    /// The Oracle's answer.
    pub prediction: String,

    /// Instruction language used.
    pub language: String,

    /// Reading style used.
    pub reading_type: String,

    /// Whether the request was served on the premium tier.
    pub is_premium: bool,

    /// Free predictions left today (absent for premium users).
    pub remaining: Option<u32>,
}

/// A prediction in a history listing.
#[derive(Debug, Clone, Deserialize)]
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
    pub language: Option<String>,

    /// Reading style, if one was selected.
    pub reading_type: Option<String>,

    /// Creation timestamp (RFC 3339).
    pub created_at: String,
}

/// Prediction history response.
#[derive(Debug, Clone, Deserialize)]
pub struct PredictionHistory {
    /// Predictions, newest first.
    pub predictions: Vec<PredictionView>,

    /// Number of records in this page.
    pub count: usize,
}

/// Remaining quota response.
#[derive(Debug, Clone, Deserialize)]
pub struct RemainingResponse {
    /// Free predictions left today.
    pub remaining: u32,

    /// The daily free-tier allowance.
    pub limit: u32,

    /// Whether the user is on the premium tier.
    pub is_premium: bool,
}

/// Entitlement view response.
#[derive(Debug, Clone, Deserialize)]
pub struct SubscriptionView {
    /// Whether the user currently has premium access.
    pub has_premium_access: bool,

    /// Confirmed subscription status.
    pub subscription_status: String,

    /// Optimistic local status awaiting webhook confirmation.
    pub pending_status: Option<String>,

    /// Payment provider subscription ID.
    pub subscription_id: Option<String>,
}

/// Feedback submission request.
#[derive(Debug, Clone, Serialize)]
pub struct FeedbackRequest {
    /// The feedback text.
    pub message: String,

    /// Contact email, if a reply is wanted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Platform the feedback was sent from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,

    /// Reported user agent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

/// Feedback submission response.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedbackResponse {
    /// The stored entry's ID.
    pub id: String,

    /// Triage status.
    pub status: String,
}

/// API error response body.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

/// API error detail.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub code: String,
    pub message: String,
}
