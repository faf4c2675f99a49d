//! User feedback entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{FeedbackId, UserId};

/// A feedback message submitted by a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feedback {
    /// Unique, time-ordered identifier.
    pub id: FeedbackId,

    /// The submitting user.
    pub user_id: UserId,

    /// The user's email, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,

    /// The feedback text (trimmed, non-empty).
    pub message: String,

    /// Triage status; new entries start as `new`.
    pub status: String,

    /// Platform the feedback was sent from (defaults to `web`).
    pub platform: String,

    /// Reported user agent, if any.
    pub user_agent: String,

    /// When the feedback was submitted.
    pub created_at: DateTime<Utc>,
}

impl Feedback {
    /// Create a new feedback entry with `new` status.
    #[must_use]
    pub fn new(
        user_id: UserId,
        user_email: Option<String>,
        message: String,
        platform: Option<String>,
        user_agent: Option<String>,
    ) -> Self {
        Self {
            id: FeedbackId::generate(),
            user_id,
            user_email,
            message,
            status: "new".to_string(),
            platform: platform.unwrap_or_else(|| "web".to_string()),
            user_agent: user_agent.unwrap_or_else(|| "unknown".to_string()),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_feedback_defaults() {
        let fb = Feedback::new(UserId::generate(), None, "Love the readings".into(), None, None);
        assert_eq!(fb.status, "new");
        assert_eq!(fb.platform, "web");
        assert_eq!(fb.user_agent, "unknown");
    }
}
