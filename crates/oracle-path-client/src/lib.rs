//! Client SDK for the Oracle Path service.
//!
//! Provides a typed HTTP client for frontends and internal tools: submitting
//! predictions, reading quota and history, and sending feedback.
//!
//! # Example
//!
//! ```no_run
//! use oracle_path_client::{OraclePathClient, PredictRequest};
//!
//! # async fn example() -> Result<(), oracle_path_client::ClientError> {
//! let client = OraclePathClient::new("https://api.oraclepath.app");
//!
//! let response = client
//!     .predict(
//!         "user-jwt",
//!         PredictRequest {
//!             prompt: "Will the journey go well?".into(),
//!             language: None,
//!             reading_type: None,
//!         },
//!     )
//!     .await?;
//!
//! println!("{}", response.prediction);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod client;
pub mod error;
pub mod types;

pub use client::{ClientOptions, OraclePathClient};
pub use error::ClientError;
pub use types::{
    FeedbackRequest, FeedbackResponse, PredictRequest, PredictResponse, PredictionHistory,
    PredictionView, RemainingResponse, SubscriptionView,
};
