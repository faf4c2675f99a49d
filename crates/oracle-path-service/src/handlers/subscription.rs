//! Subscription management handlers.
//!
//! Creation uses the payment-intent flow: an incomplete subscription is
//! created at Stripe and the client secret is returned for the frontend to
//! confirm. Entitlement only changes when the webhook reports confirmed
//! state; the cancel flow records a display-only pending status.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use oracle_path_core::SubscriptionStatus;
use oracle_path_store::Store;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;
use crate::stripe::StripeError;

/// Entitlement view response.
#[derive(Debug, Serialize)]
pub struct SubscriptionView {
    /// Whether the user currently has premium access.
    pub has_premium_access: bool,
    /// Confirmed subscription status.
    pub subscription_status: SubscriptionStatus,
    /// Optimistic local status awaiting webhook confirmation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_status: Option<SubscriptionStatus>,
    /// Payment provider subscription ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscription_id: Option<String>,
}

/// Get the authenticated user's entitlement state.
pub async fn get_subscription(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<SubscriptionView>, ApiError> {
    let view = match state.store.get_profile(&auth.user_id)? {
        Some(profile) => SubscriptionView {
            has_premium_access: profile.has_premium_access,
            subscription_status: profile.subscription_status,
            pending_status: profile.pending_status,
            subscription_id: profile.subscription_id,
        },
        None => SubscriptionView {
            has_premium_access: false,
            subscription_status: SubscriptionStatus::Inactive,
            pending_status: None,
            subscription_id: None,
        },
    };

    Ok(Json(view))
}

/// Subscription creation request.
#[derive(Debug, Deserialize)]
pub struct CreateSubscriptionRequest {
    /// Customer email for the payment provider.
    pub email: Option<String>,
    /// Customer display name.
    pub name: Option<String>,
    /// Price to subscribe to; falls back to the configured premium price.
    pub price_id: Option<String>,
}

/// Subscription creation response.
#[derive(Debug, Serialize)]
pub struct CreateSubscriptionResponse {
    /// The created subscription ID.
    pub subscription_id: String,
    /// Client secret for the frontend to confirm payment.
    pub client_secret: String,
}

/// Start a premium subscription for the authenticated user.
pub async fn create_subscription(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(body): Json<CreateSubscriptionRequest>,
) -> Result<Json<CreateSubscriptionResponse>, ApiError> {
    let stripe = state
        .stripe
        .as_ref()
        .ok_or_else(|| ApiError::ExternalService("Payments are not available".into()))?;

    let price_id = body
        .price_id
        .or_else(|| state.config.stripe_price_id.clone())
        .ok_or_else(|| ApiError::BadRequest("No price configured".into()))?;

    let customer = stripe
        .create_customer(
            &auth.user_id.to_string(),
            body.email.as_deref(),
            body.name.as_deref(),
        )
        .await
        .map_err(|e| map_stripe_error(&e, &auth))?;

    let subscription = stripe
        .create_subscription(&customer.id, &price_id)
        .await
        .map_err(|e| map_stripe_error(&e, &auth))?;

    let client_secret = subscription.client_secret().ok_or_else(|| {
        tracing::error!(
            user_id = %auth.user_id,
            subscription_id = %subscription.id,
            "Subscription created without a payment intent client secret"
        );
        ApiError::ExternalService("The payment service returned an incomplete response".into())
    })?;

    // Record the provider identifiers now; entitlement itself stays off
    // until the webhook confirms payment.
    state.store.merge_profile(&auth.user_id, &mut |profile| {
        profile.subscription_id = Some(subscription.id.clone());
        profile.customer_id = Some(customer.id.clone());
        profile.price_id = Some(price_id.clone());
    })?;

    tracing::info!(
        user_id = %auth.user_id,
        customer_id = %customer.id,
        subscription_id = %subscription.id,
        "Subscription created (awaiting payment confirmation)"
    );

    Ok(Json(CreateSubscriptionResponse {
        subscription_id: subscription.id.clone(),
        client_secret: client_secret.to_string(),
    }))
}

/// Cancel response.
#[derive(Debug, Serialize)]
pub struct CancelResponse {
    /// Human-readable confirmation.
    pub message: String,
    /// Unix timestamp the subscription cancels at, if reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancel_at: Option<i64>,
}

/// Schedule the authenticated user's subscription to cancel at period end.
pub async fn cancel_subscription(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<CancelResponse>, ApiError> {
    let stripe = state
        .stripe
        .as_ref()
        .ok_or_else(|| ApiError::ExternalService("Payments are not available".into()))?;

    let subscription_id = state
        .store
        .get_profile(&auth.user_id)?
        .and_then(|profile| profile.subscription_id)
        .ok_or_else(|| ApiError::NotFound("No active subscription found".into()))?;

    let subscription = stripe
        .cancel_at_period_end(&subscription_id)
        .await
        .map_err(|e| map_stripe_error(&e, &auth))?;

    // Display-only pending status; the webhook writes the confirmed state.
    state.store.merge_profile(&auth.user_id, &mut |profile| {
        profile.mark_cancel_pending();
    })?;

    tracing::info!(
        user_id = %auth.user_id,
        subscription_id = %subscription_id,
        cancel_at = ?subscription.cancel_at,
        "Subscription cancellation scheduled"
    );

    Ok(Json(CancelResponse {
        message: "Subscription will be canceled at the end of the billing period".to_string(),
        cancel_at: subscription.cancel_at,
    }))
}

/// Map a payment provider failure to a themed client-facing error.
fn map_stripe_error(error: &StripeError, auth: &crate::auth::AuthUser) -> ApiError {
    tracing::error!(user_id = %auth.user_id, error = %error, "Stripe request failed");
    ApiError::ExternalService("The payment service is unavailable. Please try again shortly.".into())
}
