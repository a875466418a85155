//! Upstream source abstractions and HTTP implementations.
//!
//! Each upstream is modeled as a trait so the resolver and fetcher can be
//! exercised against mocks:
//! - [`RateSource`]: the primary currency provider, returning a full
//!   USD-relative [`RateTable`]
//! - [`PairSource`]: the secondary, unauthenticated fallback provider that
//!   converts one pair directly
//! - [`MetalSource`]: the metals spot-price provider
//!
//! Every call is a single attempt; there is no retry or backoff at this layer.

use async_trait::async_trait;

use crate::errors::FetchError;
use crate::models::{MetalQuote, RateTable};

mod exchange_rate_api;
mod exchange_rate_host;
mod gold_price_org;

pub use exchange_rate_api::ExchangeRateApi;
pub use exchange_rate_host::ExchangeRateHost;
pub use gold_price_org::GoldPriceOrg;

/// Primary currency provider: the full table of rates relative to USD.
#[async_trait]
pub trait RateSource: Send + Sync {
    /// Unique identifier for this source, used in logs and error payloads.
    fn id(&self) -> &'static str;

    /// Fetch the full latest-rates table in one request.
    async fn fetch_all(&self) -> Result<RateTable, FetchError>;
}

/// Secondary conversion provider, consulted only for pairs the primary table
/// cannot resolve.
#[async_trait]
pub trait PairSource: Send + Sync {
    /// Unique identifier for this source, used in logs and error payloads.
    fn id(&self) -> &'static str;

    /// Convert one unit of `base` into `target`.
    async fn convert(&self, base: &str, target: &str) -> Result<f64, FetchError>;
}

/// Metals spot-price provider.
#[async_trait]
pub trait MetalSource: Send + Sync {
    /// Unique identifier for this source, used in logs and error payloads.
    fn id(&self) -> &'static str;

    /// Fetch the current gold/silver quote in one request.
    async fn fetch_quote(&self) -> Result<MetalQuote, FetchError>;
}
