use crate::scoring::RawMetrics;

/// Valuation and balance-sheet ratios from the fundamentals provider
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Fundamentals {
    pub pe: Option<f64>,             // Trailing P/E
    pub pb: Option<f64>,             // Price to book
    pub roe: Option<f64>,            // Fraction, 0.15 = 15 %
    pub debt_to_equity: Option<f64>, // Percent-style ratio, 50 = 0.5x
}

/// Growth and profitability figures from the secondary provider
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GrowthMetrics {
    pub eps_growth_5y: Option<f64>,    // Percent
    pub operating_margin: Option<f64>, // Percent
}

impl GrowthMetrics {
    pub fn is_empty(&self) -> bool {
        self.eps_growth_5y.is_none() && self.operating_margin.is_none()
    }
}

impl RawMetrics {
    pub fn combine(fundamentals: Fundamentals, growth: GrowthMetrics) -> Self {
        Self {
            pe: fundamentals.pe,
            pb: fundamentals.pb,
            roe: fundamentals.roe,
            debt_to_equity: fundamentals.debt_to_equity,
            eps_growth_5y: growth.eps_growth_5y,
            operating_margin: growth.operating_margin,
        }
    }
}
