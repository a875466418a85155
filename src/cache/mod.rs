//! Single-slot TTL cache.

use chrono::{DateTime, Duration, Utc};

/// A TTL-gated cache holding exactly one value and its last-refresh timestamp.
///
/// The cached resource is a single upstream document ("latest rates", "latest
/// metal quote"), so there is no keying and no eviction policy beyond the
/// wholesale overwrite in [`put`](Self::put).
///
/// Freshness checks take `now` explicitly; the caller supplies the clock. An
/// entry that was never fetched is always stale. A failed refresh must leave
/// the slot untouched: both payload and timestamp survive, so the next call
/// retries immediately instead of waiting out another full TTL.
#[derive(Debug)]
pub struct TtlCache<T> {
    entry: Option<(T, DateTime<Utc>)>,
    ttl: Duration,
}

impl<T> TtlCache<T> {
    /// Create an empty cache with the given time-to-live.
    pub fn new(ttl: Duration) -> Self {
        Self { entry: None, ttl }
    }

    /// The cached payload, if present and fetched less than one TTL before
    /// `now`. `None` is a cache miss, not an error.
    pub fn fresh(&self, now: DateTime<Utc>) -> Option<&T> {
        match &self.entry {
            Some((value, at)) if now - *at < self.ttl => Some(value),
            _ => None,
        }
    }

    /// The cached payload regardless of age. Used to serve stale data when a
    /// refresh fails.
    pub fn stale(&self) -> Option<&T> {
        self.entry.as_ref().map(|(value, _)| value)
    }

    /// When the current payload was fetched, if any.
    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.entry.as_ref().map(|(_, at)| *at)
    }

    /// Replace payload and timestamp wholesale.
    pub fn put(&mut self, value: T, at: DateTime<Utc>) {
        self.entry = Some((value, at));
    }

    /// Drop the cached payload, if any.
    pub fn clear(&mut self) {
        self.entry = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minutes(n: i64) -> Duration {
        Duration::minutes(n)
    }

    #[test]
    fn never_fetched_is_always_stale() {
        let cache: TtlCache<u32> = TtlCache::new(minutes(10));
        assert!(cache.fresh(Utc::now()).is_none());
        assert!(cache.stale().is_none());
        assert!(cache.fetched_at().is_none());
    }

    #[test]
    fn fresh_within_ttl_window() {
        let t0 = Utc::now();
        let mut cache = TtlCache::new(minutes(10));
        cache.put(42, t0);

        // just inside the window
        let t1 = t0 + minutes(10) - Duration::seconds(1);
        assert_eq!(cache.fresh(t1), Some(&42));

        // exactly at the boundary the entry has aged out
        assert!(cache.fresh(t0 + minutes(10)).is_none());

        // just past the window
        let t2 = t0 + minutes(10) + Duration::seconds(1);
        assert!(cache.fresh(t2).is_none());
        assert_eq!(cache.stale(), Some(&42));
    }

    #[test]
    fn put_replaces_wholesale() {
        let t0 = Utc::now();
        let mut cache = TtlCache::new(minutes(10));
        cache.put(1, t0);

        let t1 = t0 + minutes(20);
        cache.put(2, t1);
        assert_eq!(cache.fresh(t1), Some(&2));
        assert_eq!(cache.fetched_at(), Some(t1));
    }

    #[test]
    fn clear_empties_the_slot() {
        let t0 = Utc::now();
        let mut cache = TtlCache::new(minutes(10));
        cache.put(7, t0);
        cache.clear();
        assert!(cache.fresh(t0).is_none());
        assert!(cache.stale().is_none());
    }
}
