//! Freshness policy for cached official descriptions.

use chrono::{DateTime, Duration, Utc};

use crate::domain::models::{CacheEntry, FreshnessWindow};

/// Decide whether `entry` may be served without asking the remote service.
///
/// - `NoExpiry`: any existing entry is fresh.
/// - `Hours(h)`: fresh iff `now - fetched_at <= h` hours.
/// - An entry whose fetch time is unknown is never fresh under a finite window.
pub fn is_fresh(entry: &CacheEntry, window: FreshnessWindow, now: DateTime<Utc>) -> bool {
    match window {
        FreshnessWindow::NoExpiry => true,
        FreshnessWindow::Hours(hours) => entry
            .age(now)
            .is_some_and(|age| age <= Duration::hours(i64::from(hours))),
    }
}
