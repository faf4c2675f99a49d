//! Stripe API wire types (the subset this service touches).

use std::collections::HashMap;

use serde::Deserialize;

/// A Stripe customer.
#[derive(Debug, Clone, Deserialize)]
pub struct Customer {
    /// Customer ID (`cus_...`).
    pub id: String,
    /// Customer email.
    pub email: Option<String>,
    /// Customer name.
    pub name: Option<String>,
    /// Metadata; we store our `user_id` here at creation time.
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

/// A Stripe subscription.
#[derive(Debug, Clone, Deserialize)]
pub struct Subscription {
    /// Subscription ID (`sub_...`).
    pub id: String,
    /// Subscription status (`active`, `canceled`, `incomplete`, ...).
    pub status: String,
    /// Whether cancellation is scheduled for the end of the period.
    #[serde(default)]
    pub cancel_at_period_end: bool,
    /// Unix timestamp the subscription cancels at, if scheduled.
    pub cancel_at: Option<i64>,
    /// Owning customer ID.
    pub customer: String,
    /// Subscription items (the plan lives in the first item's price).
    #[serde(default)]
    pub items: SubscriptionItemList,
    /// Latest invoice, expanded to reach its payment intent.
    pub latest_invoice: Option<Invoice>,
}

impl Subscription {
    /// The price ID of the first subscription item, if present.
    #[must_use]
    pub fn price_id(&self) -> Option<&str> {
        self.items
            .data
            .first()
            .map(|item| item.price.id.as_str())
    }

    /// The client secret of the expanded payment intent, if present.
    #[must_use]
    pub fn client_secret(&self) -> Option<&str> {
        self.latest_invoice
            .as_ref()
            .and_then(|invoice| invoice.payment_intent.as_ref())
            .and_then(|intent| intent.client_secret.as_deref())
    }
}

/// List container for subscription items.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubscriptionItemList {
    /// The items.
    #[serde(default)]
    pub data: Vec<SubscriptionItem>,
}

/// A single subscription item.
#[derive(Debug, Clone, Deserialize)]
pub struct SubscriptionItem {
    /// The price this item bills.
    pub price: Price,
}

/// A Stripe price.
#[derive(Debug, Clone, Deserialize)]
pub struct Price {
    /// Price ID (`price_...`).
    pub id: String,
}

/// An invoice, expanded only as far as its payment intent.
#[derive(Debug, Clone, Deserialize)]
pub struct Invoice {
    /// The payment intent collecting this invoice.
    pub payment_intent: Option<PaymentIntent>,
}

/// A Stripe payment intent.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentIntent {
    /// Payment intent ID (`pi_...`).
    pub id: String,
    /// Client secret handed to the frontend to confirm payment.
    pub client_secret: Option<String>,
}

/// Stripe API error response.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeErrorResponse {
    /// The error detail.
    pub error: StripeErrorBody,
}

/// Stripe API error detail.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeErrorBody {
    /// Error type (e.g. `invalid_request_error`).
    #[serde(rename = "type", default)]
    pub error_type: String,
    /// Human-readable message.
    #[serde(default)]
    pub message: String,
    /// Error code, if any.
    pub code: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscription_accessors() {
        let json = serde_json::json!({
            "id": "sub_123",
            "status": "incomplete",
            "customer": "cus_456",
            "items": {"data": [{"price": {"id": "price_789"}}]},
            "latest_invoice": {
                "payment_intent": {"id": "pi_abc", "client_secret": "pi_abc_secret"}
            }
        });

        let sub: Subscription = serde_json::from_value(json).unwrap();
        assert_eq!(sub.price_id(), Some("price_789"));
        assert_eq!(sub.client_secret(), Some("pi_abc_secret"));
        assert!(!sub.cancel_at_period_end);
    }

    #[test]
    fn subscription_tolerates_missing_expansions() {
        let json = serde_json::json!({
            "id": "sub_123",
            "status": "active",
            "customer": "cus_456"
        });

        let sub: Subscription = serde_json::from_value(json).unwrap();
        assert!(sub.price_id().is_none());
        assert!(sub.client_secret().is_none());
    }
}
