use serde::Serialize;

use super::config::ScoringConfig;
use super::metrics::{Metric, MetricValues, RawMetrics};
use super::threshold::Threshold;

/// Highest possible score: one point per metric
pub const MAX_SCORE: u8 = Metric::ALL.len() as u8;

#[derive(Debug, Clone, PartialEq)]
pub struct CheckOutcome {
    pub metric: Metric,
    pub value: Option<f64>, // Normalized, unrounded
    pub threshold: Threshold,
    pub passed: bool,
}

/// Scored row for one ticker
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreResult {
    pub ticker: String,
    pub metrics: MetricValues, // Rounded to 2 decimals
    pub score: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip)]
    pub checks: Vec<CheckOutcome>,
}

impl ScoreResult {
    /// Row for a ticker whose metrics could not be retrieved at all
    pub fn failed(ticker: &str, error: impl Into<String>) -> Self {
        Self {
            ticker: ticker.to_string(),
            metrics: MetricValues::default(),
            score: 0,
            error: Some(error.into()),
            checks: Vec::new(),
        }
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }
}

/// Score one company. Every check is independent: a metric that is missing
/// scores nothing, a present metric scores one point when it satisfies its
/// threshold. A present 0.0 is still a value and is compared normally.
pub fn calculate_score(ticker: &str, raw: &RawMetrics, config: &ScoringConfig) -> ScoreResult {
    let values = raw.normalized();

    let checks: Vec<CheckOutcome> = Metric::ALL
        .iter()
        .map(|&metric| {
            // Validated at startup; fall back rather than drop the check
            let threshold = Threshold::parse(config.threshold_for(metric))
                .unwrap_or_else(|_| metric.default_threshold());
            let value = values.get(metric);
            let passed = match value {
                Some(v) => threshold.passes(v),
                None => false,
            };
            CheckOutcome {
                metric,
                value,
                threshold,
                passed,
            }
        })
        .collect();

    let score = checks.iter().filter(|c| c.passed).count() as u8;

    ScoreResult {
        ticker: ticker.to_string(),
        metrics: values.rounded(),
        score,
        error: None,
        checks,
    }
}
