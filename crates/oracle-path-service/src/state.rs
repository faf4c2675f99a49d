//! Application state.

use std::sync::Arc;

use oracle_path_store::RocksStore;

use crate::auth::JwtKeyCache;
use crate::config::ServiceConfig;
use crate::oracle::OracleClient;
use crate::stripe::StripeClient;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The storage backend.
    pub store: Arc<RocksStore>,

    /// Service configuration.
    pub config: ServiceConfig,

    /// Cached JWT signing keys from the identity provider.
    pub auth_keys: Arc<JwtKeyCache>,

    /// Oracle inference client (optional).
    pub oracle: Option<Arc<OracleClient>>,

    /// Stripe client for payments (optional).
    pub stripe: Option<Arc<StripeClient>>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(store: Arc<RocksStore>, config: ServiceConfig) -> Self {
        // Create the Oracle client if configured
        let oracle = config.oracle_api_key.as_ref().map(|key| {
            tracing::info!(oracle_url = %config.oracle_api_url, "Oracle inference enabled");
            Arc::new(OracleClient::new(
                &config.oracle_api_url,
                key,
                &config.oracle_model,
            ))
        });

        if oracle.is_none() {
            tracing::warn!("Oracle API key not configured - predictions will not be available");
        }

        // Create the Stripe client if configured
        let stripe = config.stripe_api_key.as_ref().map(|key| {
            tracing::info!("Stripe integration enabled");
            Arc::new(StripeClient::new(
                &config.stripe_api_url,
                key,
                config.stripe_webhook_secret.clone(),
            ))
        });

        if stripe.is_none() {
            tracing::warn!("Stripe not configured - subscriptions will not be available");
        }

        Self {
            store,
            config,
            auth_keys: Arc::new(JwtKeyCache::new()),
            oracle,
            stripe,
        }
    }

    /// Check if the Oracle is configured.
    #[must_use]
    pub fn has_oracle(&self) -> bool {
        self.oracle.is_some()
    }

    /// Check if Stripe is configured.
    #[must_use]
    pub fn has_stripe(&self) -> bool {
        self.stripe.is_some()
    }
}
