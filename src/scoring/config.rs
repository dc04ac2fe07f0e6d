use serde::{Deserialize, Serialize};

use super::metrics::Metric;

/// Pass conditions for the six checks.
///
/// Each value is a comparison against the normalized metric. Keys left out
/// of the config fall back to the defaults, so there are always six checks.
///
/// Example YAML:
/// ```yaml
/// scoring:
///   pe: "<20"
///   pb: "<3"
///   roe: ">15"
///   eps_growth_5y: ">10"
///   debt_to_equity: "<100"
///   operating_margin: ">10"
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ScoringConfig {
    /// Price-to-earnings ratio
    pub pe: String,

    /// Price-to-book ratio
    pub pb: String,

    /// Return on equity, in percent
    pub roe: String,

    /// Five-year EPS growth, in percent
    pub eps_growth_5y: String,

    /// Debt-to-equity ratio
    pub debt_to_equity: String,

    /// Trailing operating margin, in percent
    pub operating_margin: String,
}

impl ScoringConfig {
    /// Threshold expression configured for a metric
    pub fn threshold_for(&self, metric: Metric) -> &str {
        match metric {
            Metric::PriceToEarnings => &self.pe,
            Metric::PriceToBook => &self.pb,
            Metric::ReturnOnEquity => &self.roe,
            Metric::EpsGrowth5y => &self.eps_growth_5y,
            Metric::DebtToEquity => &self.debt_to_equity,
            Metric::OperatingMargin => &self.operating_margin,
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            pe: "<20".to_string(),
            pb: "<3".to_string(),
            roe: ">15".to_string(),
            eps_growth_5y: ">10".to_string(),
            debt_to_equity: "<100".to_string(),
            operating_margin: ">10".to_string(),
        }
    }
}
