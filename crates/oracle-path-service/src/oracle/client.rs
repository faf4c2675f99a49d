//! Oracle inference API client implementation.

use reqwest::Client;
use std::time::Duration;

use oracle_path_core::{Language, ReadingType};

use super::prompts;
use super::types::{ApiErrorResponse, ChatMessage, ChatRequest, ChatResponse};

/// Inference requests get a full minute; readings are long-form completions.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Error type for Oracle inference operations.
#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API rejected our credentials.
    #[error("authentication rejected by inference API")]
    Auth,

    /// The API is rate limiting us.
    #[error("rate limited by inference API")]
    RateLimited,

    /// The API returned an error.
    #[error("inference API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message from the API, if one was parseable.
        message: String,
    },

    /// The API returned a response with no completion.
    #[error("inference API returned an empty response")]
    EmptyResponse,
}

/// Oracle inference API client.
#[derive(Debug, Clone)]
pub struct OracleClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OracleClient {
    /// Create a new Oracle client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Inference API base URL (e.g. `https://api.deepseek.com`)
    /// * `api_key` - Inference API key
    /// * `model` - Model name (e.g. `deepseek-chat`)
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    /// Request a reading from the Oracle.
    ///
    /// One bounded request, no retry; the caller decides how failures
    /// surface to the user.
    pub async fn predict(
        &self,
        prompt: &str,
        reading_type: ReadingType,
        language: Language,
        premium: bool,
    ) -> Result<String, OracleError> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(prompts::system_prompt(reading_type, language, premium)),
                ChatMessage::user(prompt),
            ],
            temperature: prompts::TEMPERATURE,
            max_tokens: prompts::max_tokens(premium),
        };

        tracing::debug!(
            model = %self.model,
            reading_type = %reading_type.as_str(),
            language = %language.code(),
            premium = %premium,
            "Requesting Oracle reading"
        );

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ApiErrorResponse>()
                .await
                .map(|e| e.error.message)
                .unwrap_or_else(|_| "unknown error".to_string());

            return Err(match status.as_u16() {
                401 | 403 => OracleError::Auth,
                429 => OracleError::RateLimited,
                code => OracleError::Api {
                    status: code,
                    message,
                },
            });
        }

        let body: ChatResponse = response.json().await?;

        let prediction = body
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(OracleError::EmptyResponse)?;

        Ok(prediction)
    }
}
