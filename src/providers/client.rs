use anyhow::{Context, Result};
use reqwest::Url;
use std::time::Duration;

use super::error::ProviderError;

/// Yahoo rejects requests without a browser-like user agent
const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Longest response body kept in error messages
const MAX_ERROR_BODY: usize = 200;

/// Create the HTTP client shared by both providers
pub fn create_http_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .cookie_store(true)
        .timeout(timeout)
        .build()
        .context("Failed to create HTTP client")
}

/// Build `{base}/{segments...}?{params}`, percent-encoding each part
pub(crate) fn endpoint(
    base_url: &str,
    segments: &[&str],
    params: &[(&str, &str)],
) -> Result<Url, ProviderError> {
    let mut url = Url::parse(base_url)
        .map_err(|e| ProviderError::Decode(format!("Invalid base URL '{}': {}", base_url, e)))?;

    url.path_segments_mut()
        .map_err(|_| ProviderError::Decode(format!("Base URL cannot have a path: {}", base_url)))?
        .pop_if_empty()
        .extend(segments);

    if !params.is_empty() {
        let mut query = url.query_pairs_mut();
        for (key, value) in params {
            query.append_pair(key, value);
        }
    }

    Ok(url)
}

/// Shorten a response body for inclusion in an error message
pub(crate) fn truncate_body(body: &str) -> String {
    let body = body.trim();
    if body.chars().count() <= MAX_ERROR_BODY {
        body.to_string()
    } else {
        format!("{}...", body.chars().take(MAX_ERROR_BODY).collect::<String>())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_segments() {
        let url = endpoint("https://example.com", &["v10", "finance", "EQNR.OL"], &[]).unwrap();
        assert_eq!(url.as_str(), "https://example.com/v10/finance/EQNR.OL");
    }

    #[test]
    fn test_endpoint_trailing_slash_base() {
        let url = endpoint("https://example.com/", &["query"], &[("function", "OVERVIEW")]).unwrap();
        assert_eq!(url.as_str(), "https://example.com/query?function=OVERVIEW");
    }

    #[test]
    fn test_endpoint_encodes_parts() {
        let url = endpoint("https://example.com", &["a b"], &[("crumb", "x/y=z")]).unwrap();
        assert_eq!(url.as_str(), "https://example.com/a%20b?crumb=x%2Fy%3Dz");
    }

    #[test]
    fn test_endpoint_rejects_bad_base() {
        assert!(endpoint("not a url", &["x"], &[]).is_err());
    }

    #[test]
    fn test_truncate_body() {
        assert_eq!(truncate_body("  short  "), "short");
        let long = "x".repeat(500);
        let truncated = truncate_body(&long);
        assert_eq!(truncated.len(), MAX_ERROR_BODY + 3);
        assert!(truncated.ends_with("..."));
    }
}
