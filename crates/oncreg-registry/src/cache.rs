//! Single-entry TTL cache for verification outcomes.
//!
//! The cache holds at most one [`VerificationResult`] together with the
//! instant it was produced. An entry is usable only while
//! `now - cached_at < ttl`; past that it is treated as absent even though
//! it is still stored. Successes and failures are cached alike.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::verifier::VerificationResult;

/// A stored verification outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CachedVerification {
    pub result: VerificationResult,
    pub cached_at: DateTime<Utc>,
}

impl CachedVerification {
    /// Whether the entry is still usable at `now`.
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.cached_at < ttl
    }
}

/// Holds the last verification outcome for one verifier.
#[derive(Debug, Clone)]
pub struct VerificationCache {
    entry: Option<CachedVerification>,
    ttl: Duration,
}

impl VerificationCache {
    /// Create an empty cache with the given time-to-live.
    pub fn new(ttl: Duration) -> Self {
        Self { entry: None, ttl }
    }

    /// The cached result, if one exists and is fresh at `now`.
    pub fn get_fresh(&self, now: DateTime<Utc>) -> Option<&VerificationResult> {
        self.entry
            .as_ref()
            .filter(|e| e.is_fresh(now, self.ttl))
            .map(|e| &e.result)
    }

    /// Replace the cached entry.
    pub fn store(&mut self, result: VerificationResult, now: DateTime<Utc>) {
        self.entry = Some(CachedVerification {
            result,
            cached_at: now,
        });
    }

    /// Drop the cached entry.
    pub fn clear(&mut self) {
        self.entry = None;
    }

    /// The stored entry regardless of freshness.
    pub fn peek(&self) -> Option<&CachedVerification> {
        self.entry.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn cached_entry_serializes_with_utc_timestamp() {
        let entry = CachedVerification {
            result: VerificationResult::unavailable("Unable to fetch published URLs page"),
            cached_at: t0(),
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["cached_at"], "2026-01-15T12:00:00Z");
        assert_eq!(json["result"]["registered"], false);
        assert_eq!(json["result"]["error"], "Unable to fetch published URLs page");
    }

    #[test]
    fn empty_cache_has_nothing_fresh() {
        let cache = VerificationCache::new(Duration::seconds(300));
        assert!(cache.get_fresh(t0()).is_none());
        assert!(cache.peek().is_none());
    }

    #[test]
    fn entry_is_fresh_strictly_before_ttl() {
        let mut cache = VerificationCache::new(Duration::seconds(300));
        cache.store(VerificationResult::registered(true), t0());

        assert!(cache.get_fresh(t0()).is_some());
        assert!(cache.get_fresh(t0() + Duration::seconds(299)).is_some());
        assert!(cache.get_fresh(t0() + Duration::seconds(300)).is_none());
        // Expired entries stay stored but are not served.
        assert!(cache.peek().is_some());
    }

    #[test]
    fn failures_are_cached_like_successes() {
        let mut cache = VerificationCache::new(Duration::seconds(300));
        cache.store(VerificationResult::unavailable("Unable to fetch published URLs page"), t0());
        let hit = cache.get_fresh(t0() + Duration::seconds(10)).unwrap();
        assert!(!hit.registered);
        assert!(hit.error.is_some());
    }

    #[test]
    fn clear_drops_the_entry() {
        let mut cache = VerificationCache::new(Duration::seconds(300));
        cache.store(VerificationResult::registered(false), t0());
        cache.clear();
        assert!(cache.get_fresh(t0()).is_none());
        assert!(cache.peek().is_none());
    }
}
