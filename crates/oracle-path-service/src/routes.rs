//! Router configuration.
//!
//! This module sets up the Axum router with all routes and middleware.

use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{
    admin, blog, feedback, health, predict, predictions, subscription, usage, webhooks,
};
use crate::state::AppState;

/// Maximum concurrent prediction requests.
/// Each one holds an inference call open for up to a minute.
const PREDICT_MAX_CONCURRENT_REQUESTS: usize = 100;

/// Maximum concurrent requests for general API endpoints.
const API_MAX_CONCURRENT_REQUESTS: usize = 50;

/// Create the service router with all routes and middleware.
///
/// # Routes
///
/// ## Public
/// - `GET /health` - Health check
/// - `GET /v1/blog` - List published posts
/// - `GET /v1/blog/:slug` - Get a published post
///
/// ## Authenticated (JWT)
/// - `POST /v1/predict` - Submit a question to the Oracle
/// - `GET /v1/predictions` - Prediction history
/// - `GET /v1/usage/remaining` - Remaining free predictions
/// - `GET /v1/subscription` - Entitlement state
/// - `POST /v1/subscription` - Start a premium subscription
/// - `POST /v1/subscription/cancel` - Cancel at period end
/// - `POST /v1/feedback` - Submit feedback
/// - `POST /v1/blog` - Create a post (admin profiles only)
/// - `PUT /v1/blog/:id` - Update a post (admin profiles only)
///
/// ## Operator (admin API key)
/// - `POST /v1/admin/grant` - Grant blog admin rights
///
/// ## Webhooks (signature verification)
/// - `POST /webhooks/stripe` - Stripe webhooks
pub fn create_router(state: AppState) -> Router {
    // Extract config values before moving state
    let cors_origins = state.config.cors_origins.clone();
    let max_body_bytes = state.config.max_body_bytes;
    let request_timeout_seconds = state.config.request_timeout_seconds;

    // Build CORS layer
    let cors = build_cors_layer(&cors_origins);

    let state = Arc::new(state);

    // Prediction routes get their own, higher concurrency limit: requests
    // are long-lived while the inference call is in flight.
    let predict_routes = Router::new()
        .route("/", post(predict::predict))
        .layer(ConcurrencyLimitLayer::new(PREDICT_MAX_CONCURRENT_REQUESTS));

    let api_routes = Router::new()
        // Prediction history and quota
        .route("/predictions", get(predictions::list_predictions))
        .route("/usage/remaining", get(usage::remaining))
        // Subscription
        .route(
            "/subscription",
            get(subscription::get_subscription).post(subscription::create_subscription),
        )
        .route(
            "/subscription/cancel",
            post(subscription::cancel_subscription),
        )
        // Feedback
        .route("/feedback", post(feedback::submit_feedback))
        // Blog; GET takes a slug, PUT takes a post ID
        .route("/blog", get(blog::list_posts).post(blog::create_post))
        .route(
            "/blog/:key",
            get(blog::get_post_by_slug).put(blog::update_post),
        )
        // Operator
        .route("/admin/grant", post(admin::grant_admin))
        // Prediction routes (with their own concurrency limit)
        .nest("/predict", predict_routes)
        .layer(ConcurrencyLimitLayer::new(API_MAX_CONCURRENT_REQUESTS));

    Router::new()
        // Health (public, no rate limit)
        .route("/health", get(health::health))
        // API v1 routes (rate limited)
        .nest("/v1", api_routes)
        // Webhooks (no rate limit - controlled by external services)
        .route("/webhooks/stripe", post(webhooks::stripe_webhook))
        // Global middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(
            request_timeout_seconds,
        )))
        .with_state(state)
}

/// Build the CORS layer from configured origins.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
