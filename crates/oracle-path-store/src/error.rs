//! Error types for Oracle Path storage.

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur in storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database operation failed.
    #[error("database error: {0}")]
    Database(String),

    /// Serialization/deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Slug already in use by a different published post.
    #[error("slug already taken: {slug}")]
    SlugTaken {
        /// The conflicting slug.
        slug: String,
    },
}
