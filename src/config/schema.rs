use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::providers::{alpha_vantage, yahoo};
use crate::scoring::ScoringConfig;
use crate::ticker::{TickerPolicy, DEFAULT_SUFFIX};

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Suffix added to bare symbols of up to 5 characters. `null` or "" turns it off.
    pub ticker_suffix: Option<String>,

    /// Minimum spacing between Alpha Vantage requests (e.g. "12s")
    pub request_interval: String,

    /// Per-request HTTP timeout (e.g. "10s")
    pub request_timeout: String,

    pub yahoo_base_url: String,

    pub alpha_vantage_base_url: String,

    pub scoring: ScoringConfig,
}

impl Config {
    pub fn request_interval(&self) -> Result<Duration> {
        humantime::parse_duration(self.request_interval.trim())
            .with_context(|| format!("Invalid request_interval '{}'", self.request_interval))
    }

    pub fn request_timeout(&self) -> Result<Duration> {
        humantime::parse_duration(self.request_timeout.trim())
            .with_context(|| format!("Invalid request_timeout '{}'", self.request_timeout))
    }

    pub fn ticker_policy(&self) -> TickerPolicy {
        TickerPolicy::new(self.ticker_suffix.as_deref())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ticker_suffix: Some(DEFAULT_SUFFIX.to_string()),
            request_interval: humantime::format_duration(alpha_vantage::DEFAULT_REQUEST_INTERVAL)
                .to_string(),
            request_timeout: "10s".to_string(),
            yahoo_base_url: yahoo::DEFAULT_BASE_URL.to_string(),
            alpha_vantage_base_url: alpha_vantage::DEFAULT_BASE_URL.to_string(),
            scoring: ScoringConfig::default(),
        }
    }
}
