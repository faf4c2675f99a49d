//! Operator-facing admin handlers, gated by the static admin API key.

use std::str::FromStr;
use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use oracle_path_core::UserId;
use oracle_path_store::Store;

use crate::auth::AdminAuth;
use crate::error::ApiError;
use crate::state::AppState;

/// Admin grant request.
#[derive(Debug, Deserialize)]
pub struct GrantAdminRequest {
    /// The user to grant blog admin rights to.
    pub user_id: String,
}

/// Admin grant response.
#[derive(Debug, Serialize)]
pub struct GrantAdminResponse {
    /// The affected user.
    pub user_id: String,
    /// Always true after a successful grant.
    pub is_admin: bool,
}

/// Grant blog admin rights to a user.
pub async fn grant_admin(
    State(state): State<Arc<AppState>>,
    _admin: AdminAuth,
    Json(body): Json<GrantAdminRequest>,
) -> Result<Json<GrantAdminResponse>, ApiError> {
    let user_id = UserId::from_str(&body.user_id)
        .map_err(|_| ApiError::BadRequest("Invalid user ID".into()))?;

    let profile = state.store.merge_profile(&user_id, &mut |profile| {
        profile.is_admin = true;
    })?;

    tracing::info!(user_id = %user_id, "Blog admin rights granted");

    Ok(Json(GrantAdminResponse {
        user_id: profile.user_id.to_string(),
        is_admin: profile.is_admin,
    }))
}
