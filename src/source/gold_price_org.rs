//! Metals spot-price provider backed by goldprice.org.
//!
//! One GET per call to `{base_url}/USD`. The body carries an `items` array
//! whose first element holds both metals, plus a top-level `date` string that
//! is kept verbatim as the quote timestamp.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::errors::FetchError;
use crate::models::MetalQuote;
use crate::source::MetalSource;

const SOURCE_ID: &str = "GOLD_PRICE_ORG";
const DEFAULT_BASE_URL: &str = "https://data-asg.goldprice.org/dbXRates";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);
// The endpoint refuses default library user agents.
const USER_AGENT: &str = "Mozilla/5.0";

#[derive(Debug, Deserialize)]
struct MetalsResponse {
    date: Option<String>,
    #[serde(default)]
    items: Vec<MetalsItem>,
}

#[derive(Debug, Deserialize)]
struct MetalsItem {
    #[serde(rename = "xauPrice")]
    xau_price: f64,
    #[serde(rename = "xagPrice")]
    xag_price: f64,
    #[serde(rename = "chgXau")]
    chg_xau: f64,
    #[serde(rename = "chgXag")]
    chg_xag: f64,
    #[serde(rename = "pcXau")]
    pc_xau: f64,
    #[serde(rename = "pcXag")]
    pc_xag: f64,
}

/// HTTP client for the metals spot-price endpoint.
pub struct GoldPriceOrg {
    client: Client,
    base_url: String,
}

impl GoldPriceOrg {
    /// Create a client against the production endpoint.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL.to_string())
    }

    /// Create a client against a custom endpoint.
    pub fn with_base_url(base_url: String) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client, base_url }
    }

    fn parse(body: MetalsResponse) -> Result<MetalQuote, FetchError> {
        let date = body.date;
        let item = body
            .items
            .into_iter()
            .next()
            .ok_or_else(|| FetchError::MalformedResponse {
                provider: SOURCE_ID,
                message: "empty items array".to_string(),
            })?;

        Ok(MetalQuote {
            gold_usd: item.xau_price,
            silver_usd: item.xag_price,
            gold_change: item.chg_xau,
            silver_change: item.chg_xag,
            gold_pct: item.pc_xau,
            silver_pct: item.pc_xag,
            timestamp: date.unwrap_or_default(),
        })
    }
}

impl Default for GoldPriceOrg {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MetalSource for GoldPriceOrg {
    fn id(&self) -> &'static str {
        SOURCE_ID
    }

    async fn fetch_quote(&self) -> Result<MetalQuote, FetchError> {
        let url = format!("{}/USD", self.base_url);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(FetchError::UpstreamStatus {
                provider: SOURCE_ID,
                status: response.status(),
            });
        }

        let body: MetalsResponse =
            response
                .json()
                .await
                .map_err(|e| FetchError::MalformedResponse {
                    provider: SOURCE_ID,
                    message: e.to_string(),
                })?;

        Self::parse(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(value: serde_json::Value) -> MetalsResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn parses_first_item() {
        let body = decode(serde_json::json!({
            "date": "Aug 26th 2026, 09:14:02 am NY",
            "items": [{
                "xauPrice": 2511.4,
                "xagPrice": 29.85,
                "chgXau": 12.3,
                "chgXag": -0.14,
                "pcXau": 0.49,
                "pcXag": -0.47
            }]
        }));

        let quote = GoldPriceOrg::parse(body).unwrap();
        assert_eq!(quote.gold_usd, 2511.4);
        assert_eq!(quote.silver_usd, 29.85);
        assert_eq!(quote.gold_change, 12.3);
        assert_eq!(quote.silver_change, -0.14);
        assert_eq!(quote.gold_pct, 0.49);
        assert_eq!(quote.silver_pct, -0.47);
        // kept verbatim, no normalization
        assert_eq!(quote.timestamp, "Aug 26th 2026, 09:14:02 am NY");
    }

    #[test]
    fn empty_items_is_malformed() {
        let body = decode(serde_json::json!({ "date": "today", "items": [] }));
        assert!(matches!(
            GoldPriceOrg::parse(body),
            Err(FetchError::MalformedResponse { .. })
        ));
    }

    #[test]
    fn missing_items_field_is_malformed() {
        let body = decode(serde_json::json!({ "date": "today" }));
        assert!(matches!(
            GoldPriceOrg::parse(body),
            Err(FetchError::MalformedResponse { .. })
        ));
    }
}
