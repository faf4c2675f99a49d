//! Key encoding utilities for `RocksDB`.
//!
//! This module provides functions for encoding and decoding keys used in column families.

use oracle_path_core::{FeedbackId, PostId, PredictionId, UsageDay, UserId};

/// Create a profile key from a user ID.
#[must_use]
pub fn profile_key(user_id: &UserId) -> Vec<u8> {
    user_id.as_bytes().to_vec()
}

/// Create a daily usage key.
///
/// Format: `user_id (16 bytes) || day ("YYYY-MM-DD", 10 bytes)`
///
/// The day suffix is fixed-width, so a user's usage records sort
/// chronologically under their prefix.
#[must_use]
pub fn usage_key(user_id: &UserId, day: UsageDay) -> Vec<u8> {
    let day_str = day.to_string();
    let mut key = Vec::with_capacity(16 + day_str.len());
    key.extend_from_slice(user_id.as_bytes());
    key.extend_from_slice(day_str.as_bytes());
    key
}

/// Create a prediction key from a prediction ID.
#[must_use]
pub fn prediction_key(prediction_id: &PredictionId) -> Vec<u8> {
    prediction_id.to_bytes().to_vec()
}

/// Create a user-prediction index key.
///
/// Format: `user_id (16 bytes) || prediction_id (16 bytes)`
///
/// Since ULIDs are time-ordered, predictions for a user will be sorted by time.
#[must_use]
pub fn user_prediction_key(user_id: &UserId, prediction_id: &PredictionId) -> Vec<u8> {
    let mut key = Vec::with_capacity(32);
    key.extend_from_slice(user_id.as_bytes());
    key.extend_from_slice(&prediction_id.to_bytes());
    key
}

/// Create a prefix for iterating all predictions for a user.
#[must_use]
pub fn user_predictions_prefix(user_id: &UserId) -> Vec<u8> {
    user_id.as_bytes().to_vec()
}

/// Extract the prediction ID from a user-prediction index key.
///
/// # Panics
///
/// Panics if the key is not at least 32 bytes.
#[must_use]
pub fn extract_prediction_id_from_user_key(key: &[u8]) -> PredictionId {
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&key[16..32]);
    PredictionId::from_bytes(bytes).expect("valid ULID bytes")
}

/// Create a post key from a post ID.
#[must_use]
pub fn post_key(post_id: &PostId) -> Vec<u8> {
    post_id.to_bytes().to_vec()
}

/// Create a slug index key.
#[must_use]
pub fn slug_key(slug: &str) -> Vec<u8> {
    slug.as_bytes().to_vec()
}

/// Decode a post ID stored as a slug index value.
///
/// Returns `None` if the value is not 16 bytes.
#[must_use]
pub fn decode_post_id(value: &[u8]) -> Option<PostId> {
    let bytes: [u8; 16] = value.try_into().ok()?;
    PostId::from_bytes(bytes).ok()
}

/// Create a feedback key from a feedback ID.
#[must_use]
pub fn feedback_key(feedback_id: &FeedbackId) -> Vec<u8> {
    feedback_id.to_bytes().to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_key_length() {
        let user_id = UserId::generate();
        let key = profile_key(&user_id);
        assert_eq!(key.len(), 16);
    }

    #[test]
    fn usage_key_format() {
        let user_id = UserId::generate();
        let day: UsageDay = "2025-03-09".parse().unwrap();
        let key = usage_key(&user_id, day);

        assert_eq!(key.len(), 26);
        assert_eq!(&key[..16], user_id.as_bytes());
        assert_eq!(&key[16..], b"2025-03-09");
    }

    #[test]
    fn user_prediction_key_format() {
        let user_id = UserId::generate();
        let prediction_id = PredictionId::generate();
        let key = user_prediction_key(&user_id, &prediction_id);

        assert_eq!(key.len(), 32);
        assert_eq!(&key[..16], user_id.as_bytes());
        assert_eq!(&key[16..], prediction_id.to_bytes());
    }

    #[test]
    fn extract_prediction_id_roundtrip() {
        let user_id = UserId::generate();
        let prediction_id = PredictionId::generate();
        let key = user_prediction_key(&user_id, &prediction_id);

        let extracted = extract_prediction_id_from_user_key(&key);
        assert_eq!(extracted, prediction_id);
    }

    #[test]
    fn slug_index_value_roundtrip() {
        let post_id = PostId::generate();
        let decoded = decode_post_id(&post_id.to_bytes()).unwrap();
        assert_eq!(decoded, post_id);

        assert!(decode_post_id(b"short").is_none());
    }
}
