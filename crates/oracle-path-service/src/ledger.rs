//! Free-tier quota policy over the usage store.
//!
//! The two read paths deliberately degrade differently on storage errors:
//! the enforcement check fails closed (no free prediction when the count
//! cannot be read), while the informational remaining-count view fails open
//! (shows the full allowance rather than scaring users with a zero).

use oracle_path_core::{DailyUsage, UsageDay, UserId, DAILY_LIMIT};
use oracle_path_store::{Store, StoreError};

/// Quota decisions for the free prediction tier.
pub struct UsageLedger<'a, S: Store + ?Sized> {
    store: &'a S,
}

impl<'a, S: Store + ?Sized> UsageLedger<'a, S> {
    /// Wrap a store for quota decisions.
    #[must_use]
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Whether the user may make another free prediction today.
    ///
    /// Fails closed: a storage read error denies the prediction.
    #[must_use]
    pub fn check_daily_limit(&self, user_id: &UserId) -> bool {
        match self.store.get_usage(user_id, UsageDay::today()) {
            Ok(None) => true,
            Ok(Some(usage)) => usage.under_limit(),
            Err(e) => {
                tracing::error!(user_id = %user_id, error = %e, "Usage read failed, denying free prediction");
                false
            }
        }
    }

    /// Record one more free prediction for today.
    ///
    /// Write failures propagate; swallowing them would allow unlimited use.
    pub fn increment_daily_usage(&self, user_id: &UserId) -> Result<DailyUsage, StoreError> {
        self.store.increment_usage(user_id, UsageDay::today())
    }

    /// Free predictions left today, clamped to `[0, DAILY_LIMIT]`.
    ///
    /// Fails open: a storage read error reports the full allowance. This is
    /// an informational view only; enforcement goes through
    /// [`check_daily_limit`](Self::check_daily_limit).
    #[must_use]
    pub fn remaining_predictions(&self, user_id: &UserId) -> u32 {
        match self.store.get_usage(user_id, UsageDay::today()) {
            Ok(None) => DAILY_LIMIT,
            Ok(Some(usage)) => usage.remaining(),
            Err(e) => {
                tracing::error!(user_id = %user_id, error = %e, "Usage read failed, reporting full allowance");
                DAILY_LIMIT
            }
        }
    }
}
