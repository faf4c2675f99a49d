//! Stripe webhook handler.
//!
//! The webhook is the sole writer of confirmed entitlement state. Signature
//! verification is mandatory: an unsigned or badly signed event is rejected
//! before any parsing or state change.

use std::str::FromStr;
use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::Deserialize;
use serde_json::Value;

use oracle_path_core::{SubscriptionStatus, UserId};
use oracle_path_store::Store;

use crate::error::ApiError;
use crate::state::AppState;
use crate::stripe::Subscription;

/// A Stripe webhook event envelope.
#[derive(Debug, Deserialize)]
struct WebhookEvent {
    /// Event ID (`evt_...`).
    id: String,
    /// Event type (e.g. `customer.subscription.updated`).
    #[serde(rename = "type")]
    event_type: String,
    /// Event payload.
    data: WebhookEventData,
}

/// The `data` field of a webhook event.
#[derive(Debug, Deserialize)]
struct WebhookEventData {
    /// The object the event describes.
    object: Value,
}

/// Handle an incoming Stripe webhook.
///
/// Subscription lifecycle events update the owning user's profile; all other
/// event types are acknowledged without action so Stripe stops retrying them.
pub async fn stripe_webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: String,
) -> Result<Json<Value>, ApiError> {
    let stripe = state
        .stripe
        .as_ref()
        .ok_or_else(|| ApiError::BadRequest("Webhooks are not configured".into()))?;

    let signature = headers
        .get("stripe-signature")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::BadRequest("Missing Stripe-Signature header".into()))?;

    stripe.verify_webhook_signature(&body, signature).map_err(|e| {
        tracing::warn!(error = %e, "Webhook signature verification failed");
        ApiError::BadRequest("Invalid webhook signature".into())
    })?;

    let event: WebhookEvent = serde_json::from_str(&body)
        .map_err(|e| ApiError::BadRequest(format!("Invalid webhook payload: {e}")))?;

    tracing::debug!(
        event_id = %event.id,
        event_type = %event.event_type,
        "Webhook event received"
    );

    match event.event_type.as_str() {
        "customer.subscription.created" | "customer.subscription.updated" => {
            handle_subscription_change(&state, &event).await?;
        }
        "customer.subscription.deleted" => {
            handle_subscription_deleted(&state, &event).await?;
        }
        other => {
            tracing::debug!(event_type = %other, "Ignoring unhandled webhook event type");
        }
    }

    Ok(Json(serde_json::json!({ "received": true })))
}

/// Apply a `customer.subscription.created` or `.updated` event.
async fn handle_subscription_change(
    state: &AppState,
    event: &WebhookEvent,
) -> Result<(), ApiError> {
    let subscription: Subscription = serde_json::from_value(event.data.object.clone())
        .map_err(|e| ApiError::BadRequest(format!("Invalid subscription object: {e}")))?;

    let Some(user_id) = resolve_user(state, &subscription.customer).await? else {
        tracing::warn!(
            event_id = %event.id,
            customer_id = %subscription.customer,
            "Webhook customer has no user_id metadata, skipping"
        );
        return Ok(());
    };

    // cancel_at_period_end wins over the raw status: Stripe still reports
    // such a subscription as active until the period actually ends.
    let status = if subscription.cancel_at_period_end {
        SubscriptionStatus::Cancelling
    } else if subscription.status == "canceled" {
        SubscriptionStatus::Inactive
    } else {
        SubscriptionStatus::Active
    };
    let has_premium_access = subscription.status == "active";

    let price_id = subscription.price_id().map(String::from);

    state.store.merge_profile(&user_id, &mut |profile| {
        profile.apply_subscription(
            status,
            has_premium_access,
            Some(subscription.id.clone()),
            Some(subscription.customer.clone()),
            price_id.clone(),
        );
    })?;

    tracing::info!(
        user_id = %user_id,
        subscription_id = %subscription.id,
        status = ?status,
        has_premium_access = %has_premium_access,
        "Subscription state updated from webhook"
    );

    Ok(())
}

/// Apply a `customer.subscription.deleted` event.
async fn handle_subscription_deleted(
    state: &AppState,
    event: &WebhookEvent,
) -> Result<(), ApiError> {
    let subscription: Subscription = serde_json::from_value(event.data.object.clone())
        .map_err(|e| ApiError::BadRequest(format!("Invalid subscription object: {e}")))?;

    let Some(user_id) = resolve_user(state, &subscription.customer).await? else {
        tracing::warn!(
            event_id = %event.id,
            customer_id = %subscription.customer,
            "Webhook customer has no user_id metadata, skipping"
        );
        return Ok(());
    };

    state.store.merge_profile(&user_id, &mut |profile| {
        profile.apply_subscription(SubscriptionStatus::Inactive, false, None, None, None);
    })?;

    tracing::info!(
        user_id = %user_id,
        subscription_id = %subscription.id,
        "Premium access revoked from webhook"
    );

    Ok(())
}

/// Map a Stripe customer back to our user via the `user_id` metadata written
/// at customer creation.
async fn resolve_user(state: &AppState, customer_id: &str) -> Result<Option<UserId>, ApiError> {
    let stripe = state
        .stripe
        .as_ref()
        .ok_or_else(|| ApiError::Internal("Stripe client missing".into()))?;

    let customer = stripe.get_customer(customer_id).await.map_err(|e| {
        tracing::error!(customer_id = %customer_id, error = %e, "Customer lookup failed");
        ApiError::ExternalService("The payment service is unavailable".into())
    })?;

    let Some(customer) = customer else {
        return Ok(None);
    };

    match customer.metadata.get("user_id") {
        Some(raw) => match UserId::from_str(raw) {
            Ok(user_id) => Ok(Some(user_id)),
            Err(_) => {
                tracing::warn!(
                    customer_id = %customer_id,
                    user_id = %raw,
                    "Customer metadata user_id is not a valid UUID"
                );
                Ok(None)
            }
        },
        None => Ok(None),
    }
}
