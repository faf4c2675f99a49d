//! Usage quota handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use oracle_path_core::DAILY_LIMIT;
use oracle_path_store::Store;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::ledger::UsageLedger;
use crate::state::AppState;

/// Remaining quota response.
#[derive(Debug, Serialize)]
pub struct RemainingResponse {
    /// Free predictions left today.
    pub remaining: u32,
    /// The daily free-tier allowance.
    pub limit: u32,
    /// Whether the user is on the premium tier (unmetered).
    pub is_premium: bool,
}

/// Get the authenticated user's remaining free predictions for today.
pub async fn remaining(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<RemainingResponse>, ApiError> {
    let is_premium = state
        .store
        .get_profile(&auth.user_id)?
        .is_some_and(|profile| profile.is_premium());

    let remaining = if is_premium {
        DAILY_LIMIT
    } else {
        UsageLedger::new(state.store.as_ref()).remaining_predictions(&auth.user_id)
    };

    Ok(Json(RemainingResponse {
        remaining,
        limit: DAILY_LIMIT,
        is_premium,
    }))
}
