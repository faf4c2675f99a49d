//! Client error types.

/// Errors returned by the Oracle Path client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// HTTP transport failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The caller's credentials were rejected.
    #[error("unauthorized")]
    Unauthorized,

    /// The daily free-tier quota is exhausted.
    #[error("daily prediction limit reached")]
    LimitReached,

    /// The Oracle backend is rate limiting or temporarily unavailable.
    #[error("oracle unavailable: {message}")]
    OracleUnavailable {
        /// Themed message from the service.
        message: String,
    },

    /// Any other API error.
    #[error("API error {status}: {code} - {message}")]
    Api {
        /// Error code from the response body.
        code: String,
        /// Human-readable message.
        message: String,
        /// HTTP status code.
        status: u16,
    },
}
