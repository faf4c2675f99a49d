//! Service configuration.

use serde::Deserialize;
use std::path::Path;

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Address to listen on (default: "0.0.0.0:8080").
    pub listen_addr: String,

    /// Path to `RocksDB` data directory (default: "/data/oracle-path").
    pub data_dir: String,

    /// JWT validation base URL.
    pub auth_base_url: String,

    /// Expected JWT audience (default: "oracle-path").
    pub auth_audience: String,

    /// Admin API key for operator endpoints.
    pub admin_api_key: Option<String>,

    /// Oracle inference API base URL (default: `<https://api.deepseek.com>`).
    pub oracle_api_url: String,

    /// Oracle inference API key (optional; predictions unavailable without it).
    pub oracle_api_key: Option<String>,

    /// Oracle model name (default: "deepseek-chat").
    pub oracle_model: String,

    /// Stripe API base URL (default: `<https://api.stripe.com/v1>`).
    pub stripe_api_url: String,

    /// Stripe API key (optional).
    pub stripe_api_key: Option<String>,

    /// Stripe webhook secret (optional).
    pub stripe_webhook_secret: Option<String>,

    /// Stripe price ID for the premium plan.
    pub stripe_price_id: Option<String>,

    /// CORS allowed origins.
    pub cors_origins: Vec<String>,

    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,

    /// Request timeout in seconds.
    pub request_timeout_seconds: u64,
}

/// Stripe secrets file structure.
#[derive(Debug, Deserialize)]
struct StripeSecrets {
    api_key: String,
    #[serde(default)]
    webhook_secret: Option<String>,
    #[serde(default)]
    price_id: Option<String>,
}

impl ServiceConfig {
    /// Load configuration from environment variables and secrets files.
    #[must_use]
    pub fn from_env() -> Self {
        // Try to load Stripe secrets from file first, then fall back to env vars
        let (stripe_api_key, stripe_webhook_secret, stripe_price_id) = load_stripe_secrets();

        Self {
            listen_addr: std::env::var("LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".into()),
            data_dir: std::env::var("DATA_DIR").unwrap_or_else(|_| "/data/oracle-path".into()),
            auth_base_url: std::env::var("AUTH_BASE_URL")
                .unwrap_or_else(|_| "https://auth.oraclepath.app".into()),
            auth_audience: std::env::var("AUTH_AUDIENCE").unwrap_or_else(|_| "oracle-path".into()),
            admin_api_key: std::env::var("ADMIN_API_KEY").ok(),
            oracle_api_url: std::env::var("ORACLE_API_URL")
                .unwrap_or_else(|_| "https://api.deepseek.com".into()),
            oracle_api_key: std::env::var("ORACLE_API_KEY").ok(),
            oracle_model: std::env::var("ORACLE_MODEL").unwrap_or_else(|_| "deepseek-chat".into()),
            stripe_api_url: std::env::var("STRIPE_API_URL")
                .unwrap_or_else(|_| "https://api.stripe.com/v1".into()),
            stripe_api_key,
            stripe_webhook_secret,
            stripe_price_id,
            cors_origins: std::env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "*".into())
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),
            max_body_bytes: std::env::var("MAX_BODY_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1024 * 1024), // 1MB
            request_timeout_seconds: std::env::var("REQUEST_TIMEOUT_SECONDS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(90),
        }
    }
}

/// Load Stripe secrets from file or environment.
fn load_stripe_secrets() -> (Option<String>, Option<String>, Option<String>) {
    let secret_paths = [
        ".secrets/stripe.json",
        "oracle-path/.secrets/stripe.json",
        "../.secrets/stripe.json",
    ];

    for path in &secret_paths {
        if let Ok(secrets) = load_secrets_file::<StripeSecrets>(path) {
            tracing::info!(path = %path, "Loaded Stripe secrets from file");
            return (
                Some(secrets.api_key),
                secrets.webhook_secret,
                secrets.price_id,
            );
        }
    }

    // Fall back to environment variables
    tracing::debug!("Stripe secrets file not found, using environment variables");
    (
        std::env::var("STRIPE_API_KEY").ok(),
        std::env::var("STRIPE_WEBHOOK_SECRET").ok(),
        std::env::var("STRIPE_PRICE_ID").ok(),
    )
}

/// Load secrets from a JSON file.
fn load_secrets_file<T: serde::de::DeserializeOwned>(path: &str) -> Result<T, std::io::Error> {
    let path = Path::new(path);
    if !path.exists() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Secrets file not found",
        ));
    }
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".into(),
            data_dir: "/data/oracle-path".into(),
            auth_base_url: "https://auth.oraclepath.app".into(),
            auth_audience: "oracle-path".into(),
            admin_api_key: None,
            oracle_api_url: "https://api.deepseek.com".into(),
            oracle_api_key: None,
            oracle_model: "deepseek-chat".into(),
            stripe_api_url: "https://api.stripe.com/v1".into(),
            stripe_api_key: None,
            stripe_webhook_secret: None,
            stripe_price_id: None,
            cors_origins: vec!["*".into()],
            max_body_bytes: 1024 * 1024,
            request_timeout_seconds: 90,
        }
    }
}
