//! User profiles and premium entitlement.
//!
//! Premium access is a trust-on-write model: the payment collaborator's
//! webhook handler is the only writer of the confirmed subscription fields,
//! and reads never re-verify against the payment provider. A user-initiated
//! cancellation records a *pending* status for display while the webhook
//! confirmation is in flight; access-control decisions only ever consult the
//! confirmed `has_premium_access` flag.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::UserId;

/// Confirmed subscription state, as last reported by the payment provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    /// Subscription is active.
    Active,

    /// Cancellation is scheduled for the end of the billing period.
    Cancelling,

    /// No active subscription.
    Inactive,
}

/// A user profile holding entitlement and admin state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    /// The user ID (from the identity provider).
    pub user_id: UserId,

    /// Whether the user currently has premium access.
    ///
    /// Invariant: true iff the payment provider last reported the
    /// subscription status as active.
    pub has_premium_access: bool,

    /// Confirmed subscription status.
    pub subscription_status: SubscriptionStatus,

    /// Optimistic local status written ahead of webhook confirmation.
    ///
    /// Display-only: never consulted for access control. Cleared when the
    /// webhook writes confirmed state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_status: Option<SubscriptionStatus>,

    /// Payment provider subscription ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscription_id: Option<String>,

    /// Payment provider customer ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,

    /// Payment provider price ID for the subscribed plan.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_id: Option<String>,

    /// Whether the user may publish and edit blog posts.
    pub is_admin: bool,

    /// When the profile was created.
    pub created_at: DateTime<Utc>,

    /// When the profile was last updated.
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    /// Create a new free-tier profile.
    #[must_use]
    pub fn new(user_id: UserId) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            has_premium_access: false,
            subscription_status: SubscriptionStatus::Inactive,
            pending_status: None,
            subscription_id: None,
            customer_id: None,
            price_id: None,
            is_admin: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the user qualifies for premium behavior.
    ///
    /// Derived strictly from the confirmed flag; a pending cancellation does
    /// not revoke access.
    #[must_use]
    pub const fn is_premium(&self) -> bool {
        self.has_premium_access
    }

    /// Apply a confirmed subscription update from the payment provider.
    ///
    /// Clears any pending status: the webhook is authoritative.
    pub fn apply_subscription(
        &mut self,
        status: SubscriptionStatus,
        has_premium_access: bool,
        subscription_id: Option<String>,
        customer_id: Option<String>,
        price_id: Option<String>,
    ) {
        self.subscription_status = status;
        self.has_premium_access = has_premium_access;
        if subscription_id.is_some() {
            self.subscription_id = subscription_id;
        }
        if customer_id.is_some() {
            self.customer_id = customer_id;
        }
        if price_id.is_some() {
            self.price_id = price_id;
        }
        self.pending_status = None;
        self.updated_at = Utc::now();
    }

    /// Record a user-initiated cancellation ahead of webhook confirmation.
    ///
    /// Leaves the confirmed fields untouched.
    pub fn mark_cancel_pending(&mut self) {
        self.pending_status = Some(SubscriptionStatus::Cancelling);
        self.updated_at = Utc::now();
    }
}
