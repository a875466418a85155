//! Primary currency provider backed by exchangerate-api.com.
//!
//! One GET per call to `{base_url}/{api_key}/latest/USD`, authenticated via
//! the API key embedded in the path. The v6 API reports its own outcome in a
//! `result` field alongside the `conversion_rates` map.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

use crate::errors::FetchError;
use crate::models::RateTable;
use crate::source::RateSource;

const SOURCE_ID: &str = "EXCHANGE_RATE_API";
const DEFAULT_BASE_URL: &str = "https://v6.exchangerate-api.com/v6";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    /// "success" on a good response, an error code otherwise
    result: String,
    #[serde(rename = "error-type")]
    error_type: Option<String>,
    conversion_rates: Option<HashMap<String, f64>>,
}

/// HTTP client for the primary rates endpoint.
pub struct ExchangeRateApi {
    client: Client,
    base_url: String,
    api_key: String,
}

impl ExchangeRateApi {
    /// Create a client against the production endpoint.
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string())
    }

    /// Create a client against a custom endpoint.
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url,
            api_key,
        }
    }

    fn parse(body: LatestRatesResponse) -> Result<RateTable, FetchError> {
        if body.result != "success" {
            return Err(FetchError::UpstreamRejected {
                provider: SOURCE_ID,
                message: body.error_type.unwrap_or(body.result),
            });
        }

        body.conversion_rates
            .ok_or_else(|| FetchError::MalformedResponse {
                provider: SOURCE_ID,
                message: "missing conversion_rates map".to_string(),
            })
    }
}

#[async_trait]
impl RateSource for ExchangeRateApi {
    fn id(&self) -> &'static str {
        SOURCE_ID
    }

    async fn fetch_all(&self) -> Result<RateTable, FetchError> {
        let url = format!("{}/{}/latest/USD", self.base_url, self.api_key);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(FetchError::UpstreamStatus {
                provider: SOURCE_ID,
                status: response.status(),
            });
        }

        let body: LatestRatesResponse =
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

    fn decode(value: serde_json::Value) -> LatestRatesResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn parses_success_body() {
        let body = decode(serde_json::json!({
            "result": "success",
            "conversion_rates": { "RUB": 95.0, "EUR": 0.92 }
        }));

        let table = ExchangeRateApi::parse(body).unwrap();
        assert_eq!(table.get("RUB"), Some(&95.0));
        assert_eq!(table.get("EUR"), Some(&0.92));
    }

    #[test]
    fn failure_flag_is_rejected() {
        let body = decode(serde_json::json!({
            "result": "error",
            "error-type": "invalid-key"
        }));

        match ExchangeRateApi::parse(body) {
            Err(FetchError::UpstreamRejected { message, .. }) => {
                assert_eq!(message, "invalid-key");
            }
            other => panic!("expected UpstreamRejected, got {:?}", other),
        }
    }

    #[test]
    fn success_without_rates_is_malformed() {
        let body = decode(serde_json::json!({ "result": "success" }));

        assert!(matches!(
            ExchangeRateApi::parse(body),
            Err(FetchError::MalformedResponse { .. })
        ));
    }
}
