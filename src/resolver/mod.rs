//! Three-tier conversion resolution over the cached rate table.

use chrono::{Duration, Utc};
use log::{debug, warn};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::cache::TtlCache;
use crate::errors::FetchError;
use crate::models::{normalize_code, round_rate, RateTable};
use crate::source::{PairSource, RateSource};

/// Resolves arbitrary currency pairs against the primary provider's
/// USD-relative table, falling back to a secondary provider for pairs the
/// table cannot answer.
///
/// Resolution order is strict: identity, then direct (`USD -> X`), inverse
/// (`X -> USD`), cross rate (`X -> Y` via USD), and finally the fallback
/// provider. The first four never leave the cached table, so the common case
/// costs at most one upstream round-trip per TTL window.
pub struct ConversionResolver {
    source: Arc<dyn RateSource>,
    fallback: Arc<dyn PairSource>,
    cache: Mutex<TtlCache<Arc<RateTable>>>,
}

impl ConversionResolver {
    pub fn new(source: Arc<dyn RateSource>, fallback: Arc<dyn PairSource>, ttl: Duration) -> Self {
        Self {
            source,
            fallback,
            cache: Mutex::new(TtlCache::new(ttl)),
        }
    }

    /// The current rate table, refreshed through the primary source when the
    /// cached copy has aged out.
    ///
    /// A failed refresh falls back to the stale table when one exists and the
    /// failure is transient; the slot is left untouched so the next call
    /// retries immediately. With no prior table the failure propagates.
    pub async fn table(&self) -> Result<Arc<RateTable>, FetchError> {
        let mut slot = self.cache.lock().await;
        let now = Utc::now();

        if let Some(table) = slot.fresh(now) {
            return Ok(Arc::clone(table));
        }

        match self.source.fetch_all().await {
            Ok(table) => {
                let table = Arc::new(table);
                slot.put(Arc::clone(&table), now);
                Ok(table)
            }
            Err(err) if err.is_recoverable() => match slot.stale() {
                Some(table) => {
                    warn!("{}: refresh failed, serving stale rates: {}", self.source.id(), err);
                    Ok(Arc::clone(table))
                }
                None => Err(err),
            },
            Err(err) => Err(err),
        }
    }

    /// Resolve one unit of `base` into `target`.
    ///
    /// Returns `Ok(None)` when neither the primary table nor the fallback
    /// provider can price the pair; upstream failures with no cached table
    /// propagate as errors.
    pub async fn resolve(&self, base: &str, target: &str) -> Result<Option<f64>, FetchError> {
        let base = normalize_code(base);
        let target = normalize_code(target);

        if base == target {
            return Ok(Some(1.0));
        }

        let table = self.table().await?;

        // Direct: USD -> X
        if base == "USD" {
            if let Some(&rate) = table.get(&target) {
                return Ok(Some(round_rate(rate)));
            }
        }

        // Inverse: X -> USD
        if target == "USD" {
            if let Some(&rate) = table.get(&base) {
                if rate != 0.0 {
                    return Ok(Some(round_rate(1.0 / rate)));
                }
            }
        }

        // Cross rate: X -> Y via USD
        if let (Some(&rate_base), Some(&rate_target)) = (table.get(&base), table.get(&target)) {
            if rate_base != 0.0 {
                return Ok(Some(round_rate(rate_target / rate_base)));
            }
        }

        // Pair not covered by the primary table; one shot at the fallback
        // provider, any failure there is a plain "unavailable".
        match self.fallback.convert(&base, &target).await {
            Ok(rate) => Ok(Some(round_rate(rate))),
            Err(err) => {
                debug!(
                    "{}: fallback conversion {}->{} failed: {}",
                    self.fallback.id(),
                    base,
                    target,
                    err
                );
                Ok(None)
            }
        }
    }

    /// Drop the cached table.
    pub async fn clear(&self) {
        self.cache.lock().await.clear();
    }

    #[cfg(test)]
    pub(crate) async fn table_fetched_at(&self) -> Option<chrono::DateTime<Utc>> {
        self.cache.lock().await.fetched_at()
    }
}
