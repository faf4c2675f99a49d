//! Database schema definitions and column families.
//!
//! This module defines the column families used in `RocksDB` storage.

/// Column family names for the `RocksDB` database.
pub mod cf {
    /// User profiles (entitlement and admin state), keyed by `user_id`.
    pub const PROFILES: &str = "profiles";

    /// Daily usage counters, keyed by `user_id || day`.
    pub const USAGE: &str = "usage";

    /// Prediction records, keyed by `prediction_id` (ULID).
    pub const PREDICTIONS: &str = "predictions";

    /// Index: predictions by user, keyed by `user_id || prediction_id`.
    /// Value is empty (index only).
    pub const PREDICTIONS_BY_USER: &str = "predictions_by_user";

    /// Blog posts, keyed by `post_id` (ULID).
    pub const POSTS: &str = "posts";

    /// Index: published posts by slug, keyed by `slug`. Value is the
    /// 16-byte post ID.
    pub const POSTS_BY_SLUG: &str = "posts_by_slug";

    /// Feedback entries, keyed by `feedback_id` (ULID).
    pub const FEEDBACK: &str = "feedback";
}

/// Returns all column family names for database initialization.
#[must_use]
pub fn all_column_families() -> Vec<&'static str> {
    vec![
        cf::PROFILES,
        cf::USAGE,
        cf::PREDICTIONS,
        cf::PREDICTIONS_BY_USER,
        cf::POSTS,
        cf::POSTS_BY_SLUG,
        cf::FEEDBACK,
    ]
}
