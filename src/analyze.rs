use crate::providers::{FundamentalsProvider, GrowthMetrics, GrowthProvider, ProviderError};
use crate::scoring::{calculate_score, RawMetrics, ScoreResult, ScoringConfig};

/// Runs tickers through both providers and the scoring engine.
pub struct Analyzer<'a> {
    fundamentals: &'a dyn FundamentalsProvider,
    growth: &'a dyn GrowthProvider,
    scoring: &'a ScoringConfig,
}

impl<'a> Analyzer<'a> {
    pub fn new(
        fundamentals: &'a dyn FundamentalsProvider,
        growth: &'a dyn GrowthProvider,
        scoring: &'a ScoringConfig,
    ) -> Self {
        Self {
            fundamentals,
            growth,
            scoring,
        }
    }

    /// Analyze one ticker. Always returns a row.
    ///
    /// A fundamentals failure (unknown ticker, provider down) produces a
    /// failed row and skips the growth request. A growth failure only means
    /// those two metrics are unavailable.
    pub async fn analyze_ticker(&self, ticker: &str) -> ScoreResult {
        let fundamentals = match self.fundamentals.fundamentals(ticker).await {
            Ok(f) => f,
            Err(e) if e.is_not_found() => {
                tracing::info!("{}: {}", ticker, e);
                return ScoreResult::failed(ticker, describe_failure(&e));
            }
            Err(e) => {
                tracing::warn!("{}: {}", ticker, e);
                return ScoreResult::failed(ticker, describe_failure(&e));
            }
        };

        let growth = match self.growth.growth_metrics(ticker).await {
            Ok(g) => g,
            Err(e) => {
                tracing::warn!("{}: growth metrics unavailable - {}", ticker, e);
                GrowthMetrics::default()
            }
        };
        if growth.is_empty() {
            tracing::debug!("{}: no growth metrics available", ticker);
        }

        let raw = RawMetrics::combine(fundamentals, growth);
        tracing::debug!("{}: {:?}", ticker, raw);
        calculate_score(ticker, &raw, self.scoring)
    }

    /// Analyze tickers one at a time, in order. One row per ticker; a
    /// failing ticker never stops the batch.
    pub async fn analyze_batch(&self, tickers: &[String]) -> Vec<ScoreResult> {
        tracing::info!("Analyzing {} companies", tickers.len());

        let mut results = Vec::with_capacity(tickers.len());
        for (i, ticker) in tickers.iter().enumerate() {
            tracing::info!("Analyzing {} ({}/{})", ticker, i + 1, tickers.len());
            let result = self.analyze_ticker(ticker).await;
            tracing::debug!("{}: score {}", ticker, result.score);
            results.push(result);
        }

        let failed = results.iter().filter(|r| r.is_failed()).count();
        if failed > 0 {
            tracing::info!("Done: {} analyzed, {} failed", results.len() - failed, failed);
        } else {
            tracing::info!("Done: {} analyzed", results.len());
        }

        results
    }
}

/// Human-readable error for a failed row
fn describe_failure(error: &ProviderError) -> String {
    match error {
        ProviderError::Http(e) if e.is_timeout() => "Request timed out".to_string(),
        ProviderError::Http(e) if e.is_connect() => {
            "Could not connect to the data provider".to_string()
        }
        other => other.to_string(),
    }
}
