//! Fallback conversion provider backed by exchangerate.host.
//!
//! Unauthenticated, one GET per call to `{base_url}/convert?from=X&to=Y`.
//! Consulted only for pairs the primary table cannot resolve.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::errors::FetchError;
use crate::source::PairSource;

const SOURCE_ID: &str = "EXCHANGE_RATE_HOST";
const DEFAULT_BASE_URL: &str = "https://api.exchangerate.host";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Deserialize)]
struct ConvertResponse {
    success: bool,
    result: Option<f64>,
}

/// HTTP client for the fallback conversion endpoint.
pub struct ExchangeRateHost {
    client: Client,
    base_url: String,
}

impl ExchangeRateHost {
    /// Create a client against the production endpoint.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL.to_string())
    }

    /// Create a client against a custom endpoint.
    pub fn with_base_url(base_url: String) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client, base_url }
    }

    fn parse(body: ConvertResponse) -> Result<f64, FetchError> {
        if !body.success {
            return Err(FetchError::UpstreamRejected {
                provider: SOURCE_ID,
                message: "success flag not set".to_string(),
            });
        }

        body.result.ok_or_else(|| FetchError::MalformedResponse {
            provider: SOURCE_ID,
            message: "missing result field".to_string(),
        })
    }
}

impl Default for ExchangeRateHost {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PairSource for ExchangeRateHost {
    fn id(&self) -> &'static str {
        SOURCE_ID
    }

    async fn convert(&self, base: &str, target: &str) -> Result<f64, FetchError> {
        let url = format!("{}/convert?from={}&to={}", self.base_url, base, target);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(FetchError::UpstreamStatus {
                provider: SOURCE_ID,
                status: response.status(),
            });
        }

        let body: ConvertResponse =
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

    fn decode(value: serde_json::Value) -> ConvertResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn parses_success_body() {
        let body = decode(serde_json::json!({ "success": true, "result": 0.854301 }));
        assert_eq!(ExchangeRateHost::parse(body).unwrap(), 0.854301);
    }

    #[test]
    fn failure_flag_is_rejected() {
        let body = decode(serde_json::json!({ "success": false }));
        assert!(matches!(
            ExchangeRateHost::parse(body),
            Err(FetchError::UpstreamRejected { .. })
        ));
    }

    #[test]
    fn null_result_is_malformed() {
        let body = decode(serde_json::json!({ "success": true, "result": null }));
        assert!(matches!(
            ExchangeRateHost::parse(body),
            Err(FetchError::MalformedResponse { .. })
        ));
    }
}
