//! Common test utilities for oracle-path integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use std::sync::Arc;

use axum::Router;
use axum_test::TestServer;
use tempfile::TempDir;

use oracle_path_core::UserId;
use oracle_path_service::stripe::signature;
use oracle_path_service::{create_router, AppState, ServiceConfig};
use oracle_path_store::RocksStore;

/// Webhook signing secret used by every harness.
pub const WEBHOOK_SECRET: &str = "whsec_test";

/// Admin API key used by every harness.
pub const ADMIN_API_KEY: &str = "test-admin-key";

/// Test harness containing everything needed for integration tests.
pub struct TestHarness {
    /// The test server for making HTTP requests.
    pub server: TestServer,
    /// Temporary directory for the database (kept alive for test duration).
    pub _temp_dir: TempDir,
    /// A test user ID for authenticated requests.
    pub test_user_id: UserId,
}

impl TestHarness {
    /// Create a harness with no external backends configured.
    pub fn new() -> Self {
        Self::with_backends(None, None)
    }

    /// Create a harness whose Oracle client points at a mock server.
    pub fn with_oracle(oracle_url: &str) -> Self {
        Self::with_backends(Some(oracle_url), None)
    }

    /// Create a harness whose Stripe client points at a mock server.
    pub fn with_stripe(stripe_url: &str) -> Self {
        Self::with_backends(None, Some(stripe_url))
    }

    /// Create a harness with a fresh database and the given mock backends.
    pub fn with_backends(oracle_url: Option<&str>, stripe_url: Option<&str>) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = RocksStore::open(temp_dir.path()).expect("Failed to open store");

        let config = ServiceConfig {
            listen_addr: "127.0.0.1:0".into(),
            data_dir: temp_dir.path().to_string_lossy().to_string(),
            auth_base_url: "http://localhost".into(),
            auth_audience: "oracle-path".into(),
            admin_api_key: Some(ADMIN_API_KEY.into()),
            oracle_api_url: oracle_url.unwrap_or("http://localhost:9").into(),
            oracle_api_key: oracle_url.map(|_| "test-oracle-key".into()),
            oracle_model: "deepseek-chat".into(),
            stripe_api_url: stripe_url.unwrap_or("http://localhost:9").into(),
            stripe_api_key: stripe_url.map(|_| "sk_test_xxx".into()),
            stripe_webhook_secret: stripe_url.map(|_| WEBHOOK_SECRET.into()),
            stripe_price_id: Some("price_premium".into()),
            cors_origins: vec!["*".into()],
            max_body_bytes: 1024 * 1024,
            request_timeout_seconds: 30,
        };

        let state = AppState::new(Arc::new(store), config);
        let router: Router = create_router(state);

        let server = TestServer::new(router).expect("Failed to create test server");
        let test_user_id = UserId::generate();

        Self {
            server,
            _temp_dir: temp_dir,
            test_user_id,
        }
    }

    /// Get the authorization header for user authentication.
    pub fn user_auth_header(&self) -> String {
        format!("Bearer test-token:{}", self.test_user_id)
    }

    /// Get the auth header for a specific user (for testing isolation).
    pub fn auth_header_for(user_id: &UserId) -> String {
        format!("Bearer test-token:{user_id}")
    }

    /// Sign a webhook payload the way Stripe does.
    pub fn sign_webhook(payload: &str) -> String {
        signature::sign(WEBHOOK_SECRET, "1700000000", payload)
    }

    /// Grant the test user blog admin rights via the operator endpoint.
    pub async fn grant_admin(&self) {
        self.server
            .post("/v1/admin/grant")
            .add_header("x-admin-key", ADMIN_API_KEY)
            .json(&serde_json::json!({ "user_id": self.test_user_id.to_string() }))
            .await
            .assert_status_ok();
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
