//! Top-level fetcher composing the rate resolver and the metals cache.

use chrono::{Duration, Utc};
use log::warn;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::cache::TtlCache;
use crate::errors::FetchError;
use crate::models::{normalize_code, MetalQuote};
use crate::resolver::ConversionResolver;
use crate::source::{ExchangeRateApi, ExchangeRateHost, GoldPriceOrg, MetalSource, PairSource, RateSource};

/// Default time-to-live for the cached rate table.
pub const DEFAULT_RATES_TTL_SECS: i64 = 600;
/// Default time-to-live for the cached metal quote. Metals are more volatile,
/// so the window is shorter at the cost of more upstream calls.
pub const DEFAULT_METALS_TTL_SECS: i64 = 120;

/// Construction-time configuration for [`MarketFetcher`].
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// Credential for the primary rates provider, immutable for the
    /// fetcher's lifetime.
    pub api_key: String,
    /// TTL for the rate table cache.
    pub rates_ttl: Duration,
    /// TTL for the metal quote cache.
    pub metals_ttl: Duration,
}

impl FetcherConfig {
    /// Configuration with default TTLs (10 minutes for rates, 2 minutes for
    /// metals).
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            rates_ttl: Duration::seconds(DEFAULT_RATES_TTL_SECS),
            metals_ttl: Duration::seconds(DEFAULT_METALS_TTL_SECS),
        }
    }

    pub fn with_rates_ttl(mut self, ttl: Duration) -> Self {
        self.rates_ttl = ttl;
        self
    }

    pub fn with_metals_ttl(mut self, ttl: Duration) -> Self {
        self.metals_ttl = ttl;
        self
    }
}

/// Fetch-and-cache layer over two independent upstream data sources: a
/// currency-conversion provider and a metals-price provider.
///
/// Each instance owns its own caches and HTTP clients; there is no process
/// level shared state, so independent instances stay independent (and
/// testable). The two cache slots sit behind separate mutexes and are never
/// locked together.
pub struct MarketFetcher {
    resolver: ConversionResolver,
    metals: Arc<dyn MetalSource>,
    metal_cache: Mutex<TtlCache<MetalQuote>>,
}

impl MarketFetcher {
    /// Build a fetcher backed by the production HTTP sources.
    pub fn new(config: FetcherConfig) -> Self {
        let rates = Arc::new(ExchangeRateApi::new(config.api_key.clone()));
        let pairs = Arc::new(ExchangeRateHost::new());
        let metals = Arc::new(GoldPriceOrg::new());
        Self::with_sources(rates, pairs, metals, config)
    }

    /// Build a fetcher over caller-provided sources.
    pub fn with_sources(
        rates: Arc<dyn RateSource>,
        pairs: Arc<dyn PairSource>,
        metals: Arc<dyn MetalSource>,
        config: FetcherConfig,
    ) -> Self {
        Self {
            resolver: ConversionResolver::new(rates, pairs, config.rates_ttl),
            metals,
            metal_cache: Mutex::new(TtlCache::new(config.metals_ttl)),
        }
    }

    /// Look up one USD-relative rate in the cached table.
    ///
    /// Returns the raw table value (unrounded) or `None` when the provider
    /// does not track the code. Errs only when there is no table at all and
    /// the refresh failed.
    pub async fn rate(&self, code: &str) -> Result<Option<f64>, FetchError> {
        let table = self.resolver.table().await?;
        Ok(table.get(&normalize_code(code)).copied())
    }

    pub async fn usd_rub(&self) -> Result<Option<f64>, FetchError> {
        self.rate("RUB").await
    }

    pub async fn usd_jpy(&self) -> Result<Option<f64>, FetchError> {
        self.rate("JPY").await
    }

    pub async fn usd_eur(&self) -> Result<Option<f64>, FetchError> {
        self.rate("EUR").await
    }

    pub async fn usd_uzs(&self) -> Result<Option<f64>, FetchError> {
        self.rate("UZS").await
    }

    pub async fn usd_aud(&self) -> Result<Option<f64>, FetchError> {
        self.rate("AUD").await
    }

    pub async fn usd_gbp(&self) -> Result<Option<f64>, FetchError> {
        self.rate("GBP").await
    }

    /// Resolve an arbitrary pair through the full identity / direct /
    /// inverse / cross / fallback chain. `Ok(None)` means the pair is
    /// unsupported, not that an upstream is down.
    pub async fn resolve_pair(&self, base: &str, target: &str) -> Result<Option<f64>, FetchError> {
        self.resolver.resolve(base, target).await
    }

    /// The current gold/silver quote, cached or refreshed.
    ///
    /// A transient refresh failure falls back to the previous quote when one
    /// exists; a malformed body always propagates and never caches a partial
    /// quote.
    pub async fn metal_quote(&self) -> Result<MetalQuote, FetchError> {
        let mut slot = self.metal_cache.lock().await;
        let now = Utc::now();

        if let Some(quote) = slot.fresh(now) {
            return Ok(quote.clone());
        }

        match self.metals.fetch_quote().await {
            Ok(quote) => {
                slot.put(quote.clone(), now);
                Ok(quote)
            }
            Err(err) if err.is_recoverable() => match slot.stale() {
                Some(quote) => {
                    warn!("{}: refresh failed, serving stale quote: {}", self.metals.id(), err);
                    Ok(quote.clone())
                }
                None => Err(err),
            },
            Err(err) => Err(err),
        }
    }

    /// Gold spot price in USD per troy ounce.
    pub async fn gold_price(&self) -> Result<f64, FetchError> {
        Ok(self.metal_quote().await?.gold_usd)
    }

    /// Silver spot price in USD per troy ounce.
    pub async fn silver_price(&self) -> Result<f64, FetchError> {
        Ok(self.metal_quote().await?.silver_usd)
    }

    /// Best-effort population of both caches at startup, so the first real
    /// request is never a cold-cache miss. Failures are logged and swallowed;
    /// a transient upstream outage never prevents the process from starting.
    pub async fn prewarm(&self) {
        if let Err(err) = self.resolver.table().await {
            warn!("currency prewarm failed: {}", err);
        }

        if let Err(err) = self.metal_quote().await {
            warn!("metals prewarm failed: {}", err);
        }
    }

    /// Drop both cached payloads. Idempotent and safe to call whether or not
    /// [`prewarm`](Self::prewarm) ever ran; the HTTP clients release their
    /// pooled connections when the fetcher is dropped.
    pub async fn close(&self) {
        self.resolver.clear().await;
        self.metal_cache.lock().await.clear();
    }
}
