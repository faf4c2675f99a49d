//! Core types and utilities for Oracle Path.
//!
//! This crate provides the foundational types used throughout the Oracle Path
//! platform:
//!
//! - **Identifiers**: `UserId`, `PredictionId`, `PostId`, `FeedbackId`
//! - **Usage**: `DailyUsage`, `UsageDay`, the free-tier `DAILY_LIMIT`
//! - **Predictions**: `PredictionRecord`, `ReadingType`, `Language`
//! - **Entitlement**: `UserProfile`, `SubscriptionStatus`
//! - **Blog**: `BlogPost`, `FaqSection`, FAQ extraction
//!
//! # Free tier
//!
//! Every user gets [`DAILY_LIMIT`] free predictions per UTC calendar day;
//! premium subscribers are unmetered. The day boundary is global (UTC), not
//! per-user.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod blog;
pub mod entitlement;
pub mod feedback;
pub mod ids;
pub mod lang;
pub mod prediction;
pub mod usage;

pub use blog::{extract_faqs, BlogPost, FaqItem, FaqSection, IngestedContent};
pub use entitlement::{SubscriptionStatus, UserProfile};
pub use feedback::Feedback;
pub use ids::{FeedbackId, IdError, PostId, PredictionId, UserId};
pub use lang::{detect_language, MIN_DETECTION_LENGTH};
pub use prediction::{Language, PredictionRecord, ReadingType};
pub use usage::{DailyUsage, UsageDay, DAILY_LIMIT};
