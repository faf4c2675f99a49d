//! Oracle Path HTTP client implementation.

use reqwest::Client;
use std::time::Duration;

use crate::error::ClientError;
use crate::types::{
    ApiErrorResponse, FeedbackRequest, FeedbackResponse, PredictRequest, PredictResponse,
    PredictionHistory, RemainingResponse, SubscriptionView,
};

/// Oracle Path API client.
///
/// All methods take the end user's JWT; the client itself holds no
/// credentials beyond the service base URL.
#[derive(Debug, Clone)]
pub struct OraclePathClient {
    client: Client,
    base_url: String,
}

impl OraclePathClient {
    /// Create a new client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL of the service (e.g., `"https://api.oraclepath.app"`)
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_options(base_url, ClientOptions::default())
    }

    /// Create a new client with custom options.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built (should not happen with default settings).
    #[must_use]
    pub fn with_options(base_url: impl Into<String>, options: ClientOptions) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(options.timeout_seconds))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Submit a question to the Oracle.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::LimitReached`] when the free-tier quota is
    /// exhausted, or another error if the request fails.
    pub async fn predict(
        &self,
        user_jwt: &str,
        request: PredictRequest,
    ) -> Result<PredictResponse, ClientError> {
        let url = format!("{}/v1/predict", self.base_url);

        let response = self
            .client
            .post(&url)
            .header("authorization", format!("Bearer {user_jwt}"))
            .json(&request)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// List the user's predictions, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn list_predictions(
        &self,
        user_jwt: &str,
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> Result<PredictionHistory, ClientError> {
        let url = format!("{}/v1/predictions", self.base_url);

        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(limit) = limit {
            query.push(("limit", limit.to_string()));
        }
        if let Some(offset) = offset {
            query.push(("offset", offset.to_string()));
        }

        let response = self
            .client
            .get(&url)
            .header("authorization", format!("Bearer {user_jwt}"))
            .query(&query)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Get the user's remaining free predictions for today.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn remaining(&self, user_jwt: &str) -> Result<RemainingResponse, ClientError> {
        let url = format!("{}/v1/usage/remaining", self.base_url);

        let response = self
            .client
            .get(&url)
            .header("authorization", format!("Bearer {user_jwt}"))
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Get the user's subscription state.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn subscription(&self, user_jwt: &str) -> Result<SubscriptionView, ClientError> {
        let url = format!("{}/v1/subscription", self.base_url);

        let response = self
            .client
            .get(&url)
            .header("authorization", format!("Bearer {user_jwt}"))
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Submit feedback.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn submit_feedback(
        &self,
        user_jwt: &str,
        request: FeedbackRequest,
    ) -> Result<FeedbackResponse, ClientError> {
        let url = format!("{}/v1/feedback", self.base_url);

        let response = self
            .client
            .post(&url)
            .header("authorization", format!("Bearer {user_jwt}"))
            .json(&request)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Handle API response and convert errors.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response.json().await?);
        }

        // Try to parse error response
        let error_body: Result<ApiErrorResponse, _> = response.json().await;

        match error_body {
            Ok(api_error) => {
                let code = api_error.error.code;
                let message = api_error.error.message;

                match code.as_str() {
                    "unauthorized" => Err(ClientError::Unauthorized),
                    "limit_reached" => Err(ClientError::LimitReached),
                    "oracle_rate_limited" | "oracle_unavailable" => {
                        Err(ClientError::OracleUnavailable { message })
                    }
                    _ => Err(ClientError::Api {
                        code,
                        message,
                        status: status.as_u16(),
                    }),
                }
            }
            Err(_) => Err(ClientError::Api {
                code: "unknown".to_string(),
                message: format!("HTTP {status}"),
                status: status.as_u16(),
            }),
        }
    }
}

/// Client options for customization.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Request timeout in seconds (default: 90, predictions are slow).
    pub timeout_seconds: u64,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_seconds: 90,
        }
    }
}
