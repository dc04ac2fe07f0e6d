use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use tokio::sync::Mutex;

use super::client::{endpoint, truncate_body};
use super::error::ProviderError;
use super::types::Fundamentals;
use super::FundamentalsProvider;

pub const DEFAULT_BASE_URL: &str = "https://query2.finance.yahoo.com";

/// Visiting this host sets the session cookie the crumb endpoint requires
const COOKIE_URL: &str = "https://fc.yahoo.com";

const MODULES: &str = "summaryDetail,defaultKeyStatistics,financialData";

/// Fundamentals from Yahoo Finance's quoteSummary endpoint
pub struct YahooClient {
    http: reqwest::Client,
    base_url: String,
    cookie_url: String,
    crumb: Mutex<Option<String>>,
}

impl YahooClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            cookie_url: COOKIE_URL.to_string(),
            crumb: Mutex::new(None),
        }
    }

    #[cfg(test)]
    fn with_cookie_url(mut self, cookie_url: impl Into<String>) -> Self {
        self.cookie_url = cookie_url.into();
        self
    }

    /// Session crumb, fetched once and reused. `None` if Yahoo would not
    /// hand one out; the request is then tried without it.
    async fn crumb(&self) -> Option<String> {
        let mut cached = self.crumb.lock().await;
        if let Some(crumb) = cached.as_ref() {
            return Some(crumb.clone());
        }

        match self.fetch_crumb().await {
            Ok(crumb) => {
                *cached = Some(crumb.clone());
                Some(crumb)
            }
            Err(e) => {
                tracing::warn!("Could not get Yahoo crumb, continuing without: {}", e);
                None
            }
        }
    }

    async fn fetch_crumb(&self) -> Result<String, ProviderError> {
        // Only the Set-Cookie matters here; fc.yahoo.com answers 404
        if let Err(e) = self.http.get(&self.cookie_url).send().await {
            tracing::debug!("Cookie request failed: {}", e);
        }

        let url = endpoint(&self.base_url, &["v1", "test", "getcrumb"], &[])?;
        let response = self.http.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;
        let crumb = body.trim();

        if !status.is_success() || crumb.is_empty() || crumb.contains('<') {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }
        Ok(crumb.to_string())
    }
}

#[async_trait]
impl FundamentalsProvider for YahooClient {
    async fn fundamentals(&self, ticker: &str) -> Result<Fundamentals, ProviderError> {
        let crumb = self.crumb().await;
        let mut params = vec![("modules", MODULES)];
        if let Some(crumb) = crumb.as_deref() {
            params.push(("crumb", crumb));
        }
        let url = endpoint(
            &self.base_url,
            &["v10", "finance", "quoteSummary", ticker],
            &params,
        )?;

        tracing::debug!("GET {}", url);
        let response = self.http.get(url).send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            // Stale crumb; fetch a new one on the next request
            self.crumb.lock().await.take();
        }

        let body = response.text().await?;
        classify_quote_response(ticker, status, &body)
    }
}

/// Map a quoteSummary response to fundamentals.
///
/// Yahoo answers unknown symbols with a 404, usually carrying a JSON error
/// description; a 404 without a readable body is still "not found". Any
/// other non-2xx status is a provider error.
pub fn classify_quote_response(
    ticker: &str,
    status: StatusCode,
    body: &str,
) -> Result<Fundamentals, ProviderError> {
    if !status.is_success() && status != StatusCode::NOT_FOUND {
        return Err(ProviderError::Status {
            status: status.as_u16(),
            body: truncate_body(body),
        });
    }

    let json: Value = match serde_json::from_str(body) {
        Ok(json) => json,
        Err(_) if status == StatusCode::NOT_FOUND => {
            return Err(ProviderError::NotFound(ticker.to_string()));
        }
        Err(e) => {
            return Err(ProviderError::Decode(format!(
                "Invalid JSON from Yahoo for {}: {}",
                ticker, e
            )));
        }
    };

    parse_quote_summary(ticker, &json)
}

/// Extract fundamentals from a quoteSummary response.
///
/// An empty or null `result` means Yahoo does not know the ticker. Metrics
/// are looked up by key across all returned modules; values come either as
/// `{"raw": 12.3, "fmt": "12.30"}` or as bare numbers, and `{}` means absent.
pub fn parse_quote_summary(ticker: &str, body: &Value) -> Result<Fundamentals, ProviderError> {
    let summary = body
        .get("quoteSummary")
        .ok_or_else(|| ProviderError::Decode("Response has no quoteSummary".to_string()))?;

    let result = summary
        .get("result")
        .and_then(|r| r.as_array())
        .and_then(|r| r.first());

    let Some(result) = result else {
        let detail = summary
            .get("error")
            .and_then(|e| e.get("description"))
            .and_then(|d| d.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| ticker.to_string());
        return Err(ProviderError::NotFound(detail));
    };

    Ok(Fundamentals {
        pe: find_raw(result, "trailingPE"),
        pb: find_raw(result, "priceToBook"),
        roe: find_raw(result, "returnOnEquity"),
        debt_to_equity: find_raw(result, "debtToEquity"),
    })
}

fn find_raw(result: &Value, key: &str) -> Option<f64> {
    result
        .as_object()?
        .values()
        .filter_map(|module| module.get(key))
        .find_map(raw_number)
}

fn raw_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::Object(obj) => obj.get("raw").and_then(Value::as_f64),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::client::{create_http_client, test_server};
    use serde_json::json;
    use std::time::Duration;

    const FULL_BODY: &str = r#"{"quoteSummary": {"result": [{"summaryDetail": {"trailingPE": {"raw": 14.5}}}], "error": null}}"#;

    #[test]
    fn test_classify_success() {
        let f = classify_quote_response("EQNR.OL", StatusCode::OK, FULL_BODY).unwrap();
        assert_eq!(f.pe, Some(14.5));
        assert_eq!(f.pb, None);
    }

    #[test]
    fn test_classify_404_without_json_is_not_found() {
        let err = classify_quote_response("NOPE.OL", StatusCode::NOT_FOUND, "Not Found").unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Ticker not found: NOPE.OL");
    }

    #[test]
    fn test_classify_404_with_json_description() {
        let body = r#"{"quoteSummary": {"result": null, "error": {"code": "Not Found", "description": "Quote not found for symbol: NOPE.OL"}}}"#;
        let err = classify_quote_response("NOPE.OL", StatusCode::NOT_FOUND, body).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(
            err.to_string(),
            "Ticker not found: Quote not found for symbol: NOPE.OL"
        );
    }

    #[test]
    fn test_classify_server_error_is_status() {
        let err = classify_quote_response("EQNR.OL", StatusCode::BAD_GATEWAY, "upstream down")
            .unwrap_err();
        assert!(!err.is_not_found());
        assert!(matches!(err, ProviderError::Status { status: 502, .. }));
    }

    #[test]
    fn test_classify_invalid_json_on_success_is_decode() {
        let err = classify_quote_response("EQNR.OL", StatusCode::OK, "<html></html>").unwrap_err();
        assert!(matches!(err, ProviderError::Decode(_)));
    }

    #[tokio::test]
    async fn test_unauthorized_clears_crumb() {
        let (base_url, requests) = test_server::spawn(vec![
            (200, ""),
            (200, "first"),
            (401, r#"{"finance": {"error": {"code": "Unauthorized"}}}"#),
            (200, ""),
            (200, "second"),
            (200, FULL_BODY),
        ])
        .await;
        let http = create_http_client(Duration::from_secs(5)).unwrap();
        let client =
            YahooClient::new(http, base_url.as_str()).with_cookie_url(format!("{}/cookie", base_url));

        let err = client.fundamentals("EQNR.OL").await.unwrap_err();
        assert!(matches!(err, ProviderError::Status { status: 401, .. }));
        assert!(client.crumb.lock().await.is_none());

        let f = client.fundamentals("EQNR.OL").await.unwrap();
        assert_eq!(f.pe, Some(14.5));

        let requests = requests.lock().unwrap();
        assert_eq!(requests.len(), 6);
        assert!(requests[1].starts_with("GET /v1/test/getcrumb "));
        assert!(requests[2].contains("crumb=first"));
        assert!(requests[4].starts_with("GET /v1/test/getcrumb "));
        assert!(requests[5].contains("/v10/finance/quoteSummary/EQNR.OL?"));
        assert!(requests[5].contains("crumb=second"));
    }

    #[tokio::test]
    async fn test_crumb_reused_between_requests() {
        let (base_url, requests) = test_server::spawn(vec![
            (200, ""),
            (200, "only"),
            (200, FULL_BODY),
            (200, FULL_BODY),
        ])
        .await;
        let http = create_http_client(Duration::from_secs(5)).unwrap();
        let client =
            YahooClient::new(http, base_url.as_str()).with_cookie_url(format!("{}/cookie", base_url));

        client.fundamentals("A").await.unwrap();
        client.fundamentals("B").await.unwrap();

        let requests = requests.lock().unwrap();
        assert_eq!(requests.len(), 4);
        assert!(requests[3].contains("/quoteSummary/B?"));
        assert!(requests[3].contains("crumb=only"));
    }

    fn sample_response() -> Value {
        json!({
            "quoteSummary": {
                "result": [{
                    "summaryDetail": {
                        "trailingPE": {"raw": 14.8721, "fmt": "14.87"},
                        "dividendYield": {"raw": 0.05, "fmt": "5.00%"}
                    },
                    "defaultKeyStatistics": {
                        "priceToBook": {"raw": 2.31, "fmt": "2.31"}
                    },
                    "financialData": {
                        "returnOnEquity": {"raw": 0.1834, "fmt": "18.34%"},
                        "debtToEquity": {"raw": 48.2, "fmt": "48.20"}
                    }
                }],
                "error": null
            }
        })
    }

    #[test]
    fn test_parse_full_response() {
        let f = parse_quote_summary("EQNR.OL", &sample_response()).unwrap();
        assert_eq!(f.pe, Some(14.8721));
        assert_eq!(f.pb, Some(2.31));
        assert_eq!(f.roe, Some(0.1834));
        assert_eq!(f.debt_to_equity, Some(48.2));
    }

    #[test]
    fn test_parse_empty_values_are_missing() {
        let body = json!({
            "quoteSummary": {
                "result": [{
                    "summaryDetail": {"trailingPE": {}},
                    "financialData": {"returnOnEquity": {"raw": 0.0, "fmt": "0.00%"}}
                }],
                "error": null
            }
        });
        let f = parse_quote_summary("HEX.OL", &body).unwrap();
        assert_eq!(f.pe, None);
        assert_eq!(f.pb, None);
        assert_eq!(f.roe, Some(0.0));
        assert_eq!(f.debt_to_equity, None);
    }

    #[test]
    fn test_parse_bare_numbers() {
        let body = json!({
            "quoteSummary": {
                "result": [{"summaryDetail": {"trailingPE": 21.5, "priceToBook": "n/a"}}]
            }
        });
        let f = parse_quote_summary("AAPL", &body).unwrap();
        assert_eq!(f.pe, Some(21.5));
        assert_eq!(f.pb, None);
    }

    #[test]
    fn test_parse_falls_through_empty_module_value() {
        let body = json!({
            "quoteSummary": {
                "result": [{
                    "defaultKeyStatistics": {"priceToBook": {}},
                    "summaryDetail": {"priceToBook": {"raw": 1.7}}
                }]
            }
        });
        let f = parse_quote_summary("X", &body).unwrap();
        assert_eq!(f.pb, Some(1.7));
    }

    #[test]
    fn test_parse_not_found_with_description() {
        let body = json!({
            "quoteSummary": {
                "result": null,
                "error": {
                    "code": "Not Found",
                    "description": "Quote not found for symbol: NOPE.OL"
                }
            }
        });
        let err = parse_quote_summary("NOPE.OL", &body).unwrap_err();
        assert!(err.is_not_found());
        assert!(err.to_string().contains("Quote not found for symbol: NOPE.OL"));
    }

    #[test]
    fn test_parse_empty_result_is_not_found() {
        let body = json!({"quoteSummary": {"result": [], "error": null}});
        let err = parse_quote_summary("GONE", &body).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Ticker not found: GONE");
    }

    #[test]
    fn test_parse_malformed_response() {
        let err = parse_quote_summary("X", &json!({"chart": {}})).unwrap_err();
        assert!(matches!(err, ProviderError::Decode(_)));
    }
}
