//! Request authentication.
//!
//! Two extractors cover the whole API surface: [`AuthUser`] validates
//! end-user bearer JWTs against the identity provider's JWKS endpoint, and
//! [`AdminAuth`] gates operator endpoints on the shared `X-Admin-Key`.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use tokio::sync::RwLock;

use oracle_path_core::UserId;

use crate::config::ServiceConfig;
use crate::error::ApiError;
use crate::state::AppState;

/// Fetched signing keys are reused for an hour before refreshing.
const KEY_REFRESH_INTERVAL: Duration = Duration::from_secs(3600);

/// An authenticated end user.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The caller's user ID, parsed from the token subject.
    pub user_id: UserId,
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(ApiError::Unauthorized)?;

        // Deterministic tokens for integration tests. Never part of a
        // production build.
        #[cfg(any(test, feature = "test-auth"))]
        if let Some(raw) = token.strip_prefix("test-token:") {
            let user_id = raw.parse::<UserId>().map_err(|_| ApiError::Unauthorized)?;
            return Ok(AuthUser { user_id });
        }

        let subject = state.auth_keys.verify(token, &state.config).await?;
        let user_id = subject
            .parse::<UserId>()
            .map_err(|_| ApiError::Unauthorized)?;

        Ok(AuthUser { user_id })
    }
}

/// Proof that the request carried the operator key.
///
/// The key is a single static secret from config; there is no per-operator
/// identity.
#[derive(Debug, Clone, Copy)]
pub struct AdminAuth;

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AdminAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let presented = parts
            .headers
            .get("x-admin-key")
            .and_then(|v| v.to_str().ok())
            .ok_or(ApiError::Unauthorized)?;

        let expected = state
            .config
            .admin_api_key
            .as_deref()
            .ok_or(ApiError::Unauthorized)?;

        if presented != expected {
            return Err(ApiError::Unauthorized);
        }

        Ok(AdminAuth)
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get("authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

#[derive(Debug, Deserialize)]
struct Claims {
    sub: String,
}

#[derive(Debug, Deserialize)]
struct JwkSet {
    keys: Vec<Jwk>,
}

#[derive(Debug, Deserialize)]
struct Jwk {
    kty: String,
    kid: Option<String>,
    n: Option<String>,
    e: Option<String>,
}

/// RSA signing keys fetched from the identity provider.
///
/// One cache lives in [`AppState`] for the life of the process; every
/// [`AuthUser`] extraction goes through it.
pub struct JwtKeyCache {
    http: reqwest::Client,
    keys: RwLock<FetchedKeys>,
}

#[derive(Default)]
struct FetchedKeys {
    by_kid: HashMap<String, DecodingKey>,
    /// Fallback for tokens that carry no `kid` header.
    any: Option<DecodingKey>,
    fetched_at: Option<Instant>,
}

impl FetchedKeys {
    fn fresh(&self) -> bool {
        self.fetched_at
            .is_some_and(|at| at.elapsed() < KEY_REFRESH_INTERVAL)
    }

    fn lookup(&self, kid: Option<&str>) -> Option<DecodingKey> {
        match kid {
            Some(kid) => self.by_kid.get(kid).cloned(),
            None => self.any.clone(),
        }
    }
}

impl JwtKeyCache {
    pub(crate) fn new() -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            http,
            keys: RwLock::new(FetchedKeys::default()),
        }
    }

    /// Validate a bearer token and return its subject claim.
    async fn verify(&self, token: &str, config: &ServiceConfig) -> Result<String, ApiError> {
        let header = decode_header(token).map_err(|e| {
            tracing::debug!(error = %e, "Unreadable JWT header");
            ApiError::Unauthorized
        })?;

        let key = self.decoding_key(header.kid.as_deref(), config).await?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[&config.auth_audience]);
        validation.set_issuer(&[&config.auth_base_url]);

        let data = decode::<Claims>(token, &key, &validation).map_err(|e| {
            tracing::debug!(error = %e, "JWT rejected");
            ApiError::Unauthorized
        })?;

        Ok(data.claims.sub)
    }

    async fn decoding_key(
        &self,
        kid: Option<&str>,
        config: &ServiceConfig,
    ) -> Result<DecodingKey, ApiError> {
        {
            let keys = self.keys.read().await;
            if keys.fresh() {
                if let Some(key) = keys.lookup(kid) {
                    return Ok(key);
                }
            }
        }

        // Miss or stale: refetch the whole set and replace the cache.
        let set = self.fetch_key_set(config).await?;

        let mut keys = self.keys.write().await;
        *keys = FetchedKeys {
            fetched_at: Some(Instant::now()),
            ..FetchedKeys::default()
        };

        for jwk in set.keys {
            let Some(key) = rsa_decoding_key(&jwk) else {
                continue;
            };
            if keys.any.is_none() {
                keys.any = Some(key.clone());
            }
            if let Some(kid) = jwk.kid {
                keys.by_kid.insert(kid, key);
            }
        }

        keys.lookup(kid).ok_or(ApiError::Unauthorized)
    }

    async fn fetch_key_set(&self, config: &ServiceConfig) -> Result<JwkSet, ApiError> {
        let url = format!("{}/.well-known/jwks.json", config.auth_base_url);
        tracing::debug!(url = %url, "Refreshing JWKS");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| {
                tracing::error!(error = %e, url = %url, "JWKS fetch failed");
                ApiError::ExternalService("Failed to fetch authentication keys".into())
            })?;

        let set: JwkSet = response.json().await.map_err(|e| {
            tracing::error!(error = %e, "JWKS payload did not parse");
            ApiError::ExternalService("Failed to parse authentication keys".into())
        })?;

        tracing::info!(keys = set.keys.len(), "JWKS refreshed");
        Ok(set)
    }
}

fn rsa_decoding_key(jwk: &Jwk) -> Option<DecodingKey> {
    if jwk.kty != "RSA" {
        tracing::debug!(kty = %jwk.kty, "Skipping non-RSA JWK");
        return None;
    }
    DecodingKey::from_rsa_components(jwk.n.as_deref()?, jwk.e.as_deref()?).ok()
}
