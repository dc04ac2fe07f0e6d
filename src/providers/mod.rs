pub mod alpha_vantage;
pub mod client;
pub mod error;
pub mod throttle;
pub mod types;
pub mod yahoo;

pub use alpha_vantage::AlphaVantageClient;
pub use client::create_http_client;
pub use error::ProviderError;
pub use throttle::Throttle;
pub use types::{Fundamentals, GrowthMetrics};
pub use yahoo::YahooClient;

use async_trait::async_trait;

/// Source of valuation and balance-sheet ratios. Decides whether a ticker
/// exists at all: [`ProviderError::NotFound`] marks an unknown instrument.
#[async_trait]
pub trait FundamentalsProvider: Send + Sync {
    async fn fundamentals(&self, ticker: &str) -> Result<Fundamentals, ProviderError>;
}

/// Source of EPS growth and operating margin
#[async_trait]
pub trait GrowthProvider: Send + Sync {
    async fn growth_metrics(&self, ticker: &str) -> Result<GrowthMetrics, ProviderError>;
}
