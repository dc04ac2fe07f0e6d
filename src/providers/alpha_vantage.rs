use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;

use super::client::{endpoint, truncate_body};
use super::error::ProviderError;
use super::throttle::Throttle;
use super::types::GrowthMetrics;
use super::GrowthProvider;

pub const DEFAULT_BASE_URL: &str = "https://www.alphavantage.co";

/// Free tier allows 5 requests per minute
pub const DEFAULT_REQUEST_INTERVAL: Duration = Duration::from_secs(12);

/// Keys Alpha Vantage uses instead of data for rate limits, bad keys and bad calls
const NOTICE_KEYS: [&str; 3] = ["Note", "Information", "Error Message"];

/// Growth and margin figures from Alpha Vantage's OVERVIEW function
pub struct AlphaVantageClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    throttle: Throttle,
}

impl AlphaVantageClient {
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        request_interval: Duration,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
            throttle: Throttle::new(request_interval),
        }
    }
}

#[async_trait]
impl GrowthProvider for AlphaVantageClient {
    async fn growth_metrics(&self, ticker: &str) -> Result<GrowthMetrics, ProviderError> {
        let url = endpoint(
            &self.base_url,
            &["query"],
            &[
                ("function", "OVERVIEW"),
                ("symbol", ticker),
                ("apikey", self.api_key.as_str()),
            ],
        )?;

        self.throttle.ready().await;

        // The URL carries the key; neither the log line nor errors may include it
        tracing::debug!("GET {}/query?function=OVERVIEW&symbol={}", self.base_url, ticker);
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| ProviderError::Http(e.without_url()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::Http(e.without_url()))?;

        classify_overview_response(ticker, status, &body)
    }
}

/// Map an OVERVIEW response to growth metrics. Non-2xx is a provider error;
/// a 2xx body must be JSON.
pub fn classify_overview_response(
    ticker: &str,
    status: StatusCode,
    body: &str,
) -> Result<GrowthMetrics, ProviderError> {
    if !status.is_success() {
        return Err(ProviderError::Status {
            status: status.as_u16(),
            body: truncate_body(body),
        });
    }

    let json: Value = serde_json::from_str(body).map_err(|e| {
        ProviderError::Decode(format!("Invalid JSON from Alpha Vantage for {}: {}", ticker, e))
    })?;
    Ok(parse_overview(ticker, &json))
}

/// Extract growth metrics from an OVERVIEW response.
///
/// Alpha Vantage sends numbers as strings and uses "None" or "-" for gaps;
/// those become `None`. Rate-limit and error notices carry no data and
/// yield an empty record. Unknown symbols come back as `{}`.
pub fn parse_overview(ticker: &str, body: &Value) -> GrowthMetrics {
    if let Some(notice) = NOTICE_KEYS
        .iter()
        .find_map(|key| body.get(*key).and_then(Value::as_str))
    {
        tracing::warn!("Alpha Vantage returned no data for {}: {}", ticker, notice);
        return GrowthMetrics::default();
    }

    GrowthMetrics {
        eps_growth_5y: numeric_field(body, "EPSGrowth5Y"),
        operating_margin: numeric_field(body, "OperatingMarginTTM"),
    }
}

fn numeric_field(body: &Value, key: &str) -> Option<f64> {
    let n = match body.get(key)? {
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}
