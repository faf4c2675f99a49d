//! Stripe API client implementation.

use reqwest::Client;
use std::time::Duration;

use super::signature;
use super::types::{Customer, StripeErrorResponse, Subscription};

/// Error type for Stripe operations.
#[derive(Debug, thiserror::Error)]
pub enum StripeError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Stripe API returned an error.
    #[error("Stripe API error: {error_type} - {message}")]
    Api {
        /// Error type.
        error_type: String,
        /// Error message.
        message: String,
        /// Error code.
        code: Option<String>,
    },

    /// Invalid webhook signature.
    #[error("Invalid webhook signature")]
    InvalidSignature,

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Stripe API client.
#[derive(Debug, Clone)]
pub struct StripeClient {
    client: Client,
    base_url: String,
    api_key: String,
    webhook_secret: Option<String>,
}

impl StripeClient {
    /// Create a new Stripe client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Stripe API base URL (normally `https://api.stripe.com/v1`)
    /// * `api_key` - Stripe secret API key (`sk_test_...` or `sk_live_...`)
    /// * `webhook_secret` - Optional webhook signing secret (`whsec_...`)
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        webhook_secret: Option<String>,
    ) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            webhook_secret,
        }
    }

    /// Create a new Stripe customer carrying our user ID as metadata.
    ///
    /// The metadata is how the webhook handler maps provider events back to
    /// a profile.
    pub async fn create_customer(
        &self,
        user_id: &str,
        email: Option<&str>,
        name: Option<&str>,
    ) -> Result<Customer, StripeError> {
        let mut params = vec![("metadata[user_id]", user_id.to_string())];

        if let Some(email) = email {
            params.push(("email", email.to_string()));
        }
        if let Some(name) = name {
            params.push(("name", name.to_string()));
        }

        let response = self
            .client
            .post(format!("{}/customers", self.base_url))
            .basic_auth(&self.api_key, Option::<&str>::None)
            .form(&params)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Get a customer by ID.
    pub async fn get_customer(&self, customer_id: &str) -> Result<Option<Customer>, StripeError> {
        let response = self
            .client
            .get(format!("{}/customers/{}", self.base_url, customer_id))
            .basic_auth(&self.api_key, Option::<&str>::None)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        self.handle_response(response).await.map(Some)
    }

    /// Create an incomplete subscription for the payment-intent flow.
    ///
    /// The subscription starts in `incomplete` status; the frontend confirms
    /// the expanded payment intent with the returned client secret, and the
    /// webhook later reports the activated subscription.
    pub async fn create_subscription(
        &self,
        customer_id: &str,
        price_id: &str,
    ) -> Result<Subscription, StripeError> {
        let params = [
            ("customer", customer_id.to_string()),
            ("items[0][price]", price_id.to_string()),
            ("payment_behavior", "default_incomplete".to_string()),
            (
                "payment_settings[save_default_payment_method]",
                "on_subscription".to_string(),
            ),
            ("expand[]", "latest_invoice.payment_intent".to_string()),
        ];

        let response = self
            .client
            .post(format!("{}/subscriptions", self.base_url))
            .basic_auth(&self.api_key, Option::<&str>::None)
            .form(&params)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Schedule a subscription to cancel at the end of the billing period.
    pub async fn cancel_at_period_end(
        &self,
        subscription_id: &str,
    ) -> Result<Subscription, StripeError> {
        let params = [("cancel_at_period_end", "true")];

        let response = self
            .client
            .post(format!(
                "{}/subscriptions/{}",
                self.base_url,
                subscription_id
            ))
            .basic_auth(&self.api_key, Option::<&str>::None)
            .form(&params)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Verify a webhook signature.
    ///
    /// # Arguments
    ///
    /// * `payload` - Raw request body
    /// * `signature` - Value of the `Stripe-Signature` header
    ///
    /// # Errors
    ///
    /// Returns an error if the secret is not configured or no `v1` signature
    /// matches.
    pub fn verify_webhook_signature(&self, payload: &str, header: &str) -> Result<(), StripeError> {
        let secret = self
            .webhook_secret
            .as_ref()
            .ok_or_else(|| StripeError::Configuration("Webhook secret not configured".into()))?;

        if signature::verify(secret, header, payload) {
            Ok(())
        } else {
            Err(StripeError::InvalidSignature)
        }
    }

    /// Handle API response and convert errors.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, StripeError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response.json().await?);
        }

        // Try to parse error response
        let error_body: Result<StripeErrorResponse, _> = response.json().await;

        match error_body {
            Ok(stripe_error) => Err(StripeError::Api {
                error_type: stripe_error.error.error_type,
                message: stripe_error.error.message,
                code: stripe_error.error.code,
            }),
            Err(_) => Err(StripeError::Api {
                error_type: "unknown".to_string(),
                message: format!("HTTP {status}"),
                code: None,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(webhook_secret: Option<&str>) -> StripeClient {
        StripeClient::new(
            "https://api.stripe.com/v1",
            "sk_test_xxx",
            webhook_secret.map(String::from),
        )
    }

    #[test]
    fn client_creation() {
        let client = test_client(None);
        assert!(client.webhook_secret.is_none());
        assert_eq!(client.base_url, "https://api.stripe.com/v1");
    }

    #[test]
    fn valid_signature_accepted() {
        let client = test_client(Some("whsec_test"));
        let payload = r#"{"type":"customer.subscription.updated"}"#;
        let header = signature::sign("whsec_test", "1700000000", payload);

        assert!(client.verify_webhook_signature(payload, &header).is_ok());
    }

    #[test]
    fn bad_signature_rejected() {
        let client = test_client(Some("whsec_test"));
        let header = signature::sign("whsec_other", "1700000000", "{}");

        let result = client.verify_webhook_signature("{}", &header);
        assert!(matches!(result, Err(StripeError::InvalidSignature)));
    }

    #[test]
    fn missing_secret_is_configuration_error() {
        let client = test_client(None);

        let result = client.verify_webhook_signature("{}", "t=1,v1=abc");
        assert!(matches!(result, Err(StripeError::Configuration(_))));
    }
}
