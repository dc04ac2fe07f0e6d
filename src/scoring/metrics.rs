use serde::Serialize;

use super::threshold::Threshold;

/// The six fundamentals that feed the score, in column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Metric {
    PriceToEarnings,
    PriceToBook,
    ReturnOnEquity,
    EpsGrowth5y,
    DebtToEquity,
    OperatingMargin,
}

impl Metric {
    pub const ALL: [Metric; 6] = [
        Metric::PriceToEarnings,
        Metric::PriceToBook,
        Metric::ReturnOnEquity,
        Metric::EpsGrowth5y,
        Metric::DebtToEquity,
        Metric::OperatingMargin,
    ];

    /// Column heading used in tables and exports
    pub fn label(&self) -> &'static str {
        match self {
            Metric::PriceToEarnings => "P/E",
            Metric::PriceToBook => "P/B",
            Metric::ReturnOnEquity => "ROE (%)",
            Metric::EpsGrowth5y => "EPS growth 5y (%)",
            Metric::DebtToEquity => "Debt/Equity",
            Metric::OperatingMargin => "Op. Margin (%)",
        }
    }

    /// Key under `scoring:` in the config file
    pub fn config_key(&self) -> &'static str {
        match self {
            Metric::PriceToEarnings => "pe",
            Metric::PriceToBook => "pb",
            Metric::ReturnOnEquity => "roe",
            Metric::EpsGrowth5y => "eps_growth_5y",
            Metric::DebtToEquity => "debt_to_equity",
            Metric::OperatingMargin => "operating_margin",
        }
    }

    pub fn default_threshold(&self) -> Threshold {
        match self {
            Metric::PriceToEarnings => Threshold::Below(20.0),
            Metric::PriceToBook => Threshold::Below(3.0),
            Metric::ReturnOnEquity => Threshold::Above(15.0),
            Metric::EpsGrowth5y => Threshold::Above(10.0),
            Metric::DebtToEquity => Threshold::Below(100.0),
            Metric::OperatingMargin => Threshold::Above(10.0),
        }
    }
}

/// Fundamentals for one company as delivered by the providers.
///
/// `None` means the provider had no usable value; it is never the same as 0.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RawMetrics {
    pub pe: Option<f64>,
    pub pb: Option<f64>,
    /// Fraction, e.g. 0.15 for 15 %
    pub roe: Option<f64>,
    pub debt_to_equity: Option<f64>,
    /// Percent
    pub eps_growth_5y: Option<f64>,
    /// Percent
    pub operating_margin: Option<f64>,
}

impl RawMetrics {
    /// Bring every metric to its display unit. Non-finite values become `None`.
    pub fn normalized(&self) -> MetricValues {
        MetricValues {
            pe: finite(self.pe),
            pb: finite(self.pb),
            roe_pct: finite(self.roe).map(|roe| roe * 100.0),
            eps_growth_5y: finite(self.eps_growth_5y),
            debt_to_equity: finite(self.debt_to_equity),
            operating_margin: finite(self.operating_margin),
        }
    }
}

/// Metrics in display units (ROE in percent). `None` renders as "N/A".
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MetricValues {
    pub pe: Option<f64>,
    pub pb: Option<f64>,
    pub roe_pct: Option<f64>,
    pub eps_growth_5y: Option<f64>,
    pub debt_to_equity: Option<f64>,
    pub operating_margin: Option<f64>,
}

impl MetricValues {
    pub fn get(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::PriceToEarnings => self.pe,
            Metric::PriceToBook => self.pb,
            Metric::ReturnOnEquity => self.roe_pct,
            Metric::EpsGrowth5y => self.eps_growth_5y,
            Metric::DebtToEquity => self.debt_to_equity,
            Metric::OperatingMargin => self.operating_margin,
        }
    }

    /// Round every present value to 2 decimals
    pub fn rounded(&self) -> MetricValues {
        MetricValues {
            pe: self.pe.map(round2),
            pb: self.pb.map(round2),
            roe_pct: self.roe_pct.map(round2),
            eps_growth_5y: self.eps_growth_5y.map(round2),
            debt_to_equity: self.debt_to_equity.map(round2),
            operating_margin: self.operating_margin.map(round2),
        }
    }
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roe_rescaled_to_percent() {
        let raw = RawMetrics {
            roe: Some(0.18),
            ..Default::default()
        };
        let roe = raw.normalized().rounded().roe_pct.unwrap();
        assert!((roe - 18.0).abs() < 0.01);
    }

    #[test]
    fn test_missing_roe_stays_missing() {
        let raw = RawMetrics::default();
        assert_eq!(raw.normalized().roe_pct, None);
    }

    #[test]
    fn test_non_finite_treated_as_missing() {
        let raw = RawMetrics {
            pe: Some(f64::NAN),
            pb: Some(f64::INFINITY),
            debt_to_equity: Some(0.0),
            ..Default::default()
        };
        let values = raw.normalized();
        assert_eq!(values.pe, None);
        assert_eq!(values.pb, None);
        assert_eq!(values.debt_to_equity, Some(0.0));
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(12.3456), 12.35);
        assert_eq!(round2(-1.005_1), -1.01);
        assert_eq!(round2(7.0), 7.0);
    }

    #[test]
    fn test_labels_in_column_order() {
        let labels: Vec<_> = Metric::ALL.iter().map(|m| m.label()).collect();
        assert_eq!(
            labels,
            vec![
                "P/E",
                "P/B",
                "ROE (%)",
                "EPS growth 5y (%)",
                "Debt/Equity",
                "Op. Margin (%)"
            ]
        );
    }
}
