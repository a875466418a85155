//! Market Fetcher Crate
//!
//! Fetch-and-cache layer over two independent upstream market data sources:
//! a currency-conversion API and a metals spot-price API. Each source sits
//! behind its own single-slot TTL cache with stale-serving on transient
//! refresh failures, and arbitrary currency pairs are resolved through a
//! three-tier algorithm with a secondary-provider fallback.
//!
//! # Architecture
//!
//! ```text
//! +-----------------+
//! |  MarketFetcher  |  (query surface, prewarm, close)
//! +-----------------+
//!      |         |
//!      v         v
//! +-----------+  +-----------------+
//! | Conversion|  | TtlCache        |
//! | Resolver  |  | <MetalQuote>    |
//! +-----------+  +-----------------+
//!      |                 |
//!      v                 v
//! +-----------+  +-----------------+
//! | RateSource|  |  MetalSource    |  (HTTP providers)
//! | PairSource|  |                 |
//! +-----------+  +-----------------+
//! ```
//!
//! # Resolution order
//!
//! `resolve_pair(base, target)` short-circuits on the first success:
//! identity (exactly `1.0`), direct (`USD -> X` from the table), inverse
//! (`X -> USD` as `1/rate`), cross rate (`X -> Y` via USD), and finally a
//! single request to the fallback provider. All pair results are rounded to
//! 6 decimal digits.
//!
//! # Core Types
//!
//! - [`MarketFetcher`] - owns the caches and HTTP clients, exposes queries
//! - [`FetcherConfig`] - API key and per-cache TTLs
//! - [`RateTable`] - currency code -> units per 1 USD
//! - [`MetalQuote`] - gold/silver spot prices and daily deltas
//! - [`FetchError`] - upstream failure taxonomy

pub mod cache;
pub mod errors;
pub mod fetcher;
pub mod models;
pub mod resolver;
pub mod source;

pub use cache::TtlCache;
pub use errors::FetchError;
pub use fetcher::{FetcherConfig, MarketFetcher, DEFAULT_METALS_TTL_SECS, DEFAULT_RATES_TTL_SECS};
pub use models::{normalize_code, round_rate, MetalQuote, RateTable};
pub use resolver::ConversionResolver;
pub use source::{
    ExchangeRateApi, ExchangeRateHost, GoldPriceOrg, MetalSource, PairSource, RateSource,
};
