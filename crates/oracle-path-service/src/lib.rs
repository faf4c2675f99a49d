//! Oracle Path HTTP API Service.
//!
//! This crate provides the HTTP API for the Oracle Path service, including:
//!
//! - Prediction submission and history
//! - Daily free-tier quota tracking
//! - Subscription management and Stripe webhooks
//! - Blog content management with FAQ ingestion
//! - Feedback collection
//!
//! # Authentication
//!
//! The service supports two authentication methods:
//!
//! 1. **JWT tokens** - For end-user requests (validated against the identity
//!    provider's JWKS endpoint)
//! 2. **Admin API key** - For operator endpoints (`X-Admin-Key` header)

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Allow some pedantic lints that are noisy for Axum handler functions
#![allow(clippy::missing_errors_doc)] // Axum handlers all return Result
#![allow(clippy::unused_async)] // Some handlers need async for consistency

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod ledger;
pub mod oracle;
pub mod routes;
pub mod state;
pub mod stripe;

pub use config::ServiceConfig;
pub use error::ApiError;
pub use ledger::UsageLedger;
pub use oracle::{OracleClient, OracleError};
pub use routes::create_router;
pub use state::AppState;
pub use stripe::{StripeClient, StripeError};
