//! `RocksDB` storage implementation.
//!
//! This module provides the `RocksStore` implementation of the `Store` trait.

use std::path::Path;
use std::sync::Arc;

use rocksdb::{
    BoundColumnFamily, ColumnFamilyDescriptor, DBWithThreadMode, IteratorMode, MultiThreaded,
    Options, WriteBatch,
};

use oracle_path_core::{
    BlogPost, DailyUsage, Feedback, PostId, PredictionId, PredictionRecord, UsageDay, UserId,
    UserProfile,
};

use crate::error::{Result, StoreError};
use crate::keys;
use crate::schema::{all_column_families, cf};
use crate::Store;

/// RocksDB-backed storage implementation.
pub struct RocksStore {
    db: Arc<DBWithThreadMode<MultiThreaded>>,
}

impl RocksStore {
    /// Open or create a `RocksDB` database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_descriptors: Vec<_> = all_column_families()
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect();

        let db = DBWithThreadMode::open_cf_descriptors(&opts, path, cf_descriptors)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Get a column family handle.
    fn cf(&self, name: &str) -> Result<Arc<BoundColumnFamily<'_>>> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StoreError::Database(format!("column family not found: {name}")))
    }

    /// Serialize a value using CBOR.
    fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(value, &mut buf)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(buf)
    }

    /// Deserialize a value from CBOR.
    fn deserialize<T: serde::de::DeserializeOwned>(data: &[u8]) -> Result<T> {
        ciborium::from_reader(data).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    /// Look up the post ID a slug currently resolves to, if any.
    fn slug_owner(&self, slug: &str) -> Result<Option<PostId>> {
        let cf = self.cf(cf::POSTS_BY_SLUG)?;
        let value = self
            .db
            .get_cf(&cf, keys::slug_key(slug))
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(value.as_deref().and_then(keys::decode_post_id))
    }
}

impl Store for RocksStore {
    // =========================================================================
    // Profile Operations
    // =========================================================================

    fn put_profile(&self, profile: &UserProfile) -> Result<()> {
        let cf = self.cf(cf::PROFILES)?;
        let key = keys::profile_key(&profile.user_id);
        let value = Self::serialize(profile)?;

        self.db
            .put_cf(&cf, key, value)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    fn get_profile(&self, user_id: &UserId) -> Result<Option<UserProfile>> {
        let cf = self.cf(cf::PROFILES)?;
        let key = keys::profile_key(user_id);

        self.db
            .get_cf(&cf, key)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    fn merge_profile(
        &self,
        user_id: &UserId,
        mutate: &mut dyn FnMut(&mut UserProfile),
    ) -> Result<UserProfile> {
        let mut profile = self
            .get_profile(user_id)?
            .unwrap_or_else(|| UserProfile::new(*user_id));

        mutate(&mut profile);
        self.put_profile(&profile)?;

        Ok(profile)
    }

    // =========================================================================
    // Usage Operations
    // =========================================================================

    fn get_usage(&self, user_id: &UserId, day: UsageDay) -> Result<Option<DailyUsage>> {
        let cf = self.cf(cf::USAGE)?;
        let key = keys::usage_key(user_id, day);

        self.db
            .get_cf(&cf, key)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    fn increment_usage(&self, user_id: &UserId, day: UsageDay) -> Result<DailyUsage> {
        let cf = self.cf(cf::USAGE)?;
        let key = keys::usage_key(user_id, day);

        let usage = match self.get_usage(user_id, day)? {
            Some(mut usage) => {
                usage.increment();
                usage
            }
            None => DailyUsage::first(*user_id, day),
        };

        let value = Self::serialize(&usage)?;
        self.db
            .put_cf(&cf, key, value)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(usage)
    }

    // =========================================================================
    // Prediction Operations
    // =========================================================================

    fn put_prediction(&self, record: &PredictionRecord) -> Result<()> {
        let cf_predictions = self.cf(cf::PREDICTIONS)?;
        let cf_by_user = self.cf(cf::PREDICTIONS_BY_USER)?;

        let prediction_key = keys::prediction_key(&record.id);
        let user_prediction_key = keys::user_prediction_key(&record.user_id, &record.id);
        let value = Self::serialize(record)?;

        let mut batch = WriteBatch::default();
        batch.put_cf(&cf_predictions, &prediction_key, &value);
        batch.put_cf(&cf_by_user, &user_prediction_key, []); // Index entry (empty value)

        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    fn get_prediction(&self, prediction_id: &PredictionId) -> Result<Option<PredictionRecord>> {
        let cf = self.cf(cf::PREDICTIONS)?;
        let key = keys::prediction_key(prediction_id);

        self.db
            .get_cf(&cf, key)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    fn list_predictions_by_user(
        &self,
        user_id: &UserId,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<PredictionRecord>> {
        let cf_by_user = self.cf(cf::PREDICTIONS_BY_USER)?;
        let prefix = keys::user_predictions_prefix(user_id);

        let iter = self.db.iterator_cf(
            &cf_by_user,
            IteratorMode::From(&prefix, rocksdb::Direction::Forward),
        );

        // Collect all matching keys first (ULIDs are naturally time-ordered)
        let mut all_keys: Vec<Vec<u8>> = Vec::new();
        for item in iter {
            let (key, _) = item.map_err(|e| StoreError::Database(e.to_string()))?;

            if !key.starts_with(&prefix) {
                break;
            }

            all_keys.push(key.to_vec());
        }

        // Reverse to get newest first
        all_keys.reverse();

        let mut records = Vec::new();
        let mut skipped = 0;

        for key in all_keys {
            if skipped < offset {
                skipped += 1;
                continue;
            }

            if records.len() >= limit {
                break;
            }

            let prediction_id = keys::extract_prediction_id_from_user_key(&key);
            if let Some(record) = self.get_prediction(&prediction_id)? {
                records.push(record);
            }
        }

        Ok(records)
    }

    // =========================================================================
    // Blog Operations
    // =========================================================================

    fn put_post(&self, post: &BlogPost) -> Result<()> {
        let cf_posts = self.cf(cf::POSTS)?;
        let cf_by_slug = self.cf(cf::POSTS_BY_SLUG)?;

        if post.published {
            if let Some(owner) = self.slug_owner(&post.slug)? {
                if owner != post.id {
                    return Err(StoreError::SlugTaken {
                        slug: post.slug.clone(),
                    });
                }
            }
        }

        let previous = self.get_post(&post.id)?;

        let post_key = keys::post_key(&post.id);
        let value = Self::serialize(post)?;

        let mut batch = WriteBatch::default();
        batch.put_cf(&cf_posts, &post_key, &value);

        // Release the old slug entry when the slug changed or the post was
        // unpublished, but only if this post still owns it.
        if let Some(previous) = previous {
            let stale = previous.slug != post.slug || !post.published;
            if stale && self.slug_owner(&previous.slug)? == Some(post.id) {
                batch.delete_cf(&cf_by_slug, keys::slug_key(&previous.slug));
            }
        }

        if post.published {
            batch.put_cf(&cf_by_slug, keys::slug_key(&post.slug), post.id.to_bytes());
        }

        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    fn get_post(&self, post_id: &PostId) -> Result<Option<BlogPost>> {
        let cf = self.cf(cf::POSTS)?;
        let key = keys::post_key(post_id);

        self.db
            .get_cf(&cf, key)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    fn get_post_by_slug(&self, slug: &str) -> Result<Option<BlogPost>> {
        let Some(post_id) = self.slug_owner(slug)? else {
            return Ok(None);
        };

        // The index only holds published posts, but check anyway in case the
        // record was rewritten without going through put_post.
        Ok(self.get_post(&post_id)?.filter(|post| post.published))
    }

    fn list_published_posts(&self, limit: usize, offset: usize) -> Result<Vec<BlogPost>> {
        let cf = self.cf(cf::POSTS)?;

        // Post keys are ULIDs, so a forward scan yields oldest first.
        let iter = self.db.iterator_cf(&cf, IteratorMode::Start);

        let mut published: Vec<BlogPost> = Vec::new();
        for item in iter {
            let (_, value) = item.map_err(|e| StoreError::Database(e.to_string()))?;
            let post: BlogPost = Self::deserialize(&value)?;
            if post.published {
                published.push(post);
            }
        }

        // Reverse to get newest first
        published.reverse();

        Ok(published.into_iter().skip(offset).take(limit).collect())
    }

    // =========================================================================
    // Feedback Operations
    // =========================================================================

    fn put_feedback(&self, feedback: &Feedback) -> Result<()> {
        let cf = self.cf(cf::FEEDBACK)?;
        let key = keys::feedback_key(&feedback.id);
        let value = Self::serialize(feedback)?;

        self.db
            .put_cf(&cf, key, value)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oracle_path_core::{SubscriptionStatus, DAILY_LIMIT};
    use tempfile::TempDir;

    fn create_test_store() -> (RocksStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = RocksStore::open(dir.path()).unwrap();
        (store, dir)
    }

    fn test_post(title: &str, slug: &str, published: bool) -> BlogPost {
        let now = chrono::Utc::now();
        BlogPost {
            id: PostId::generate(),
            title: title.to_string(),
            slug: slug.to_string(),
            content: format!("<p>{title}</p>"),
            excerpt: String::new(),
            author: "The Oracle".to_string(),
            published,
            seo_title: String::new(),
            seo_description: String::new(),
            seo_keywords: Vec::new(),
            faqs: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn profile_crud() {
        let (store, _dir) = create_test_store();
        let user_id = UserId::generate();

        assert!(store.get_profile(&user_id).unwrap().is_none());

        let mut profile = UserProfile::new(user_id);
        store.put_profile(&profile).unwrap();

        let retrieved = store.get_profile(&user_id).unwrap().unwrap();
        assert!(!retrieved.has_premium_access);

        profile.apply_subscription(
            SubscriptionStatus::Active,
            true,
            Some("sub_123".into()),
            Some("cus_456".into()),
            None,
        );
        store.put_profile(&profile).unwrap();

        let updated = store.get_profile(&user_id).unwrap().unwrap();
        assert!(updated.has_premium_access);
        assert_eq!(updated.subscription_id.as_deref(), Some("sub_123"));
    }

    #[test]
    fn merge_profile_creates_when_absent() {
        let (store, _dir) = create_test_store();
        let user_id = UserId::generate();

        let profile = store
            .merge_profile(&user_id, &mut |p| p.is_admin = true)
            .unwrap();
        assert!(profile.is_admin);
        assert!(!profile.has_premium_access);

        // Merging again preserves fields set earlier.
        let profile = store
            .merge_profile(&user_id, &mut |p| {
                p.apply_subscription(SubscriptionStatus::Active, true, None, None, None);
            })
            .unwrap();
        assert!(profile.is_admin);
        assert!(profile.has_premium_access);
    }

    #[test]
    fn usage_increments_from_zero() {
        let (store, _dir) = create_test_store();
        let user_id = UserId::generate();
        let day = UsageDay::today();

        assert!(store.get_usage(&user_id, day).unwrap().is_none());

        let first = store.increment_usage(&user_id, day).unwrap();
        assert_eq!(first.count, 1);

        for _ in 1..DAILY_LIMIT {
            store.increment_usage(&user_id, day).unwrap();
        }

        let usage = store.get_usage(&user_id, day).unwrap().unwrap();
        assert_eq!(usage.count, DAILY_LIMIT);
        assert!(!usage.under_limit());
    }

    #[test]
    fn usage_is_per_day() {
        let (store, _dir) = create_test_store();
        let user_id = UserId::generate();
        let yesterday: UsageDay = "2025-03-08".parse().unwrap();
        let today: UsageDay = "2025-03-09".parse().unwrap();

        store.increment_usage(&user_id, yesterday).unwrap();
        store.increment_usage(&user_id, yesterday).unwrap();

        // A new day starts from zero.
        assert!(store.get_usage(&user_id, today).unwrap().is_none());
        let usage = store.increment_usage(&user_id, today).unwrap();
        assert_eq!(usage.count, 1);

        let old = store.get_usage(&user_id, yesterday).unwrap().unwrap();
        assert_eq!(old.count, 2);
    }

    #[test]
    fn prediction_listing_newest_first() {
        let (store, _dir) = create_test_store();
        let user_id = UserId::generate();

        // ULIDs are generated at creation time, so space them out to
        // guarantee distinct timestamps.
        let first = PredictionRecord::new(
            user_id,
            "Will I travel?".into(),
            "The road calls.".into(),
            false,
            None,
            None,
        );
        store.put_prediction(&first).unwrap();

        std::thread::sleep(std::time::Duration::from_millis(2));

        let second = PredictionRecord::new(
            user_id,
            "Will I prosper?".into(),
            "Fortune gathers.".into(),
            true,
            None,
            None,
        );
        store.put_prediction(&second).unwrap();

        let retrieved = store.get_prediction(&first.id).unwrap().unwrap();
        assert_eq!(retrieved.prompt, "Will I travel?");

        let records = store.list_predictions_by_user(&user_id, 10, 0).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].prompt, "Will I prosper?"); // Newest first
        assert_eq!(records[1].prompt, "Will I travel?");

        // Pagination
        let page1 = store.list_predictions_by_user(&user_id, 1, 0).unwrap();
        let page2 = store.list_predictions_by_user(&user_id, 1, 1).unwrap();
        assert_eq!(page1[0].prompt, "Will I prosper?");
        assert_eq!(page2[0].prompt, "Will I travel?");
    }

    #[test]
    fn predictions_are_isolated_per_user() {
        let (store, _dir) = create_test_store();
        let alice = UserId::generate();
        let bob = UserId::generate();

        let record =
            PredictionRecord::new(alice, "Mine?".into(), "Yours.".into(), false, None, None);
        store.put_prediction(&record).unwrap();

        assert_eq!(store.list_predictions_by_user(&alice, 10, 0).unwrap().len(), 1);
        assert!(store.list_predictions_by_user(&bob, 10, 0).unwrap().is_empty());
    }

    #[test]
    fn post_slug_lookup_published_only() {
        let (store, _dir) = create_test_store();

        let published = test_post("Visible", "visible", true);
        let draft = test_post("Hidden", "hidden", false);
        store.put_post(&published).unwrap();
        store.put_post(&draft).unwrap();

        assert!(store.get_post_by_slug("visible").unwrap().is_some());
        assert!(store.get_post_by_slug("hidden").unwrap().is_none());

        // Drafts remain reachable by ID.
        assert!(store.get_post(&draft.id).unwrap().is_some());
    }

    #[test]
    fn slug_conflict_rejected() {
        let (store, _dir) = create_test_store();

        let first = test_post("First", "shared-slug", true);
        store.put_post(&first).unwrap();

        let second = test_post("Second", "shared-slug", true);
        let result = store.put_post(&second);
        assert!(matches!(result, Err(StoreError::SlugTaken { .. })));

        // Re-saving the owning post is fine.
        store.put_post(&first).unwrap();
    }

    #[test]
    fn slug_released_on_unpublish_and_change() {
        let (store, _dir) = create_test_store();

        let mut post = test_post("Post", "original", true);
        store.put_post(&post).unwrap();

        // Changing the slug frees the old one.
        post.slug = "renamed".to_string();
        store.put_post(&post).unwrap();
        assert!(store.get_post_by_slug("original").unwrap().is_none());
        assert!(store.get_post_by_slug("renamed").unwrap().is_some());

        let takeover = test_post("New owner", "original", true);
        store.put_post(&takeover).unwrap();

        // Unpublishing frees the slug too.
        post.published = false;
        store.put_post(&post).unwrap();
        assert!(store.get_post_by_slug("renamed").unwrap().is_none());
    }

    #[test]
    fn published_listing_newest_first() {
        let (store, _dir) = create_test_store();

        let older = test_post("Older", "older", true);
        store.put_post(&older).unwrap();

        std::thread::sleep(std::time::Duration::from_millis(2));

        let draft = test_post("Draft", "draft", false);
        store.put_post(&draft).unwrap();

        std::thread::sleep(std::time::Duration::from_millis(2));

        let newer = test_post("Newer", "newer", true);
        store.put_post(&newer).unwrap();

        let posts = store.list_published_posts(10, 0).unwrap();
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].title, "Newer");
        assert_eq!(posts[1].title, "Older");

        let page2 = store.list_published_posts(1, 1).unwrap();
        assert_eq!(page2[0].title, "Older");
    }

    #[test]
    fn feedback_persists() {
        let (store, _dir) = create_test_store();
        let feedback = Feedback::new(
            UserId::generate(),
            Some("seer@example.com".into()),
            "More tarot spreads please".into(),
            None,
            None,
        );

        store.put_feedback(&feedback).unwrap();
    }
}
