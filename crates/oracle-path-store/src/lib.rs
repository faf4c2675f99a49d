//! `RocksDB` storage layer for Oracle Path.
//!
//! This crate provides persistent storage for user profiles, daily usage
//! counters, prediction history, blog posts, and feedback using `RocksDB`
//! with column families for efficient indexing.
//!
//! # Architecture
//!
//! The storage uses the following column families:
//!
//! - `profiles`: User entitlement and admin state, keyed by `user_id`
//! - `usage`: Daily prediction counters, keyed by `user_id || day`
//! - `predictions`: Prediction records, keyed by `prediction_id` (ULID)
//! - `predictions_by_user`: Index for listing predictions by user
//! - `posts`: Blog posts, keyed by `post_id` (ULID)
//! - `posts_by_slug`: Index mapping slugs to published posts
//! - `feedback`: Feedback entries, keyed by `feedback_id` (ULID)
//!
//! # Example
//!
//! ```no_run
//! use oracle_path_store::{RocksStore, Store};
//! use oracle_path_core::{UserId, UserProfile};
//!
//! let store = RocksStore::open("/tmp/oracle-path-db").unwrap();
//!
//! // Create a profile
//! let user_id = UserId::generate();
//! let profile = UserProfile::new(user_id);
//! store.put_profile(&profile).unwrap();
//!
//! // Read it back
//! let retrieved = store.get_profile(&user_id).unwrap();
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod keys;
pub mod rocks;
pub mod schema;

pub use error::{Result, StoreError};
pub use rocks::RocksStore;

use oracle_path_core::{
    BlogPost, DailyUsage, Feedback, PostId, PredictionId, PredictionRecord, UsageDay, UserId,
    UserProfile,
};

/// The storage trait defining all database operations.
///
/// This trait abstracts the storage layer, allowing for different implementations
/// (e.g., `RocksDB`, in-memory for testing).
pub trait Store: Send + Sync {
    // =========================================================================
    // Profile Operations
    // =========================================================================

    /// Insert or update a user profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn put_profile(&self, profile: &UserProfile) -> Result<()>;

    /// Get a profile by user ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_profile(&self, user_id: &UserId) -> Result<Option<UserProfile>>;

    /// Upsert a profile: load the existing record (or a fresh free-tier
    /// profile when none exists), apply the mutation, and write it back.
    ///
    /// Returns the profile as written.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn merge_profile(
        &self,
        user_id: &UserId,
        mutate: &mut dyn FnMut(&mut UserProfile),
    ) -> Result<UserProfile>;

    // =========================================================================
    // Usage Operations
    // =========================================================================

    /// Get the usage record for a (user, day), if one exists.
    ///
    /// A missing record means the user has consumed nothing that day.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_usage(&self, user_id: &UserId, day: UsageDay) -> Result<Option<DailyUsage>>;

    /// Record one more prediction for the given (user, day).
    ///
    /// Creates the day's record with a count of one if none exists.
    /// Returns the record after the increment.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn increment_usage(&self, user_id: &UserId, day: UsageDay) -> Result<DailyUsage>;

    // =========================================================================
    // Prediction Operations
    // =========================================================================

    /// Insert a prediction record.
    ///
    /// This also maintains the user index.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn put_prediction(&self, record: &PredictionRecord) -> Result<()>;

    /// Get a prediction by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_prediction(&self, prediction_id: &PredictionId) -> Result<Option<PredictionRecord>>;

    /// List predictions for a user, ordered by time (newest first).
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_predictions_by_user(
        &self,
        user_id: &UserId,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<PredictionRecord>>;

    // =========================================================================
    // Blog Operations
    // =========================================================================

    /// Insert or update a blog post, maintaining the slug index.
    ///
    /// Only published posts occupy the slug index. Unpublishing or changing
    /// the slug releases the old index entry.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::SlugTaken` if the slug already resolves to a
    /// different published post.
    fn put_post(&self, post: &BlogPost) -> Result<()>;

    /// Get a post by ID (published or draft).
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_post(&self, post_id: &PostId) -> Result<Option<BlogPost>>;

    /// Get a published post by slug.
    ///
    /// Drafts are not reachable by slug.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_post_by_slug(&self, slug: &str) -> Result<Option<BlogPost>>;

    /// List published posts, ordered by time (newest first).
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_published_posts(&self, limit: usize, offset: usize) -> Result<Vec<BlogPost>>;

    // =========================================================================
    // Feedback Operations
    // =========================================================================

    /// Insert a feedback entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn put_feedback(&self, feedback: &Feedback) -> Result<()>;
}
