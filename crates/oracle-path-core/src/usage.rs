//! Daily usage tracking for the free prediction tier.
//!
//! Free users get a fixed number of predictions per UTC calendar day. Usage is
//! recorded as one `DailyUsage` document per (user, day); a missing record
//! means zero usage for that day.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::UserId;

/// Number of free predictions allowed per user per day.
pub const DAILY_LIMIT: u32 = 5;

/// A UTC calendar date used as the usage ledger key, formatted `YYYY-MM-DD`.
///
/// All users share one global day boundary; there is no per-user timezone
/// normalization. A user near a day boundary may see their quota reset at a
/// time that does not correspond to their local midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UsageDay(NaiveDate);

impl UsageDay {
    /// The usage day for the current wall-clock instant.
    #[must_use]
    pub fn today() -> Self {
        Self(Utc::now().date_naive())
    }

    /// Construct a usage day from a calendar date.
    #[must_use]
    pub const fn from_date(date: NaiveDate) -> Self {
        Self(date)
    }

    /// The underlying calendar date.
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for UsageDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for UsageDay {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(NaiveDate::parse_from_str(s, "%Y-%m-%d")?))
    }
}

impl TryFrom<String> for UsageDay {
    type Error = chrono::ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<UsageDay> for String {
    fn from(day: UsageDay) -> Self {
        day.to_string()
    }
}

/// A per-user, per-day prediction counter.
///
/// Invariants: at most one record per (user, day); `count` only increases
/// within a given day. Records are never deleted; a new day implicitly starts
/// from zero because no record exists yet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyUsage {
    /// The user this record belongs to.
    pub user_id: UserId,

    /// The UTC calendar day.
    pub day: UsageDay,

    /// Number of free predictions consumed on this day.
    pub count: u32,

    /// When the record was last written.
    pub last_updated: DateTime<Utc>,
}

impl DailyUsage {
    /// Create the first usage record of the day, with a count of one.
    #[must_use]
    pub fn first(user_id: UserId, day: UsageDay) -> Self {
        Self {
            user_id,
            day,
            count: 1,
            last_updated: Utc::now(),
        }
    }

    /// Record one more prediction.
    pub fn increment(&mut self) {
        self.count += 1;
        self.last_updated = Utc::now();
    }

    /// Whether this record still permits another free prediction.
    #[must_use]
    pub const fn under_limit(&self) -> bool {
        self.count < DAILY_LIMIT
    }

    /// Free predictions left today, clamped to `[0, DAILY_LIMIT]`.
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        DAILY_LIMIT.saturating_sub(self.count)
    }
}
