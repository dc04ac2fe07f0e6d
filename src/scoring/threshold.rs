use anyhow::{bail, Context, Result};
use std::fmt;

/// A pass condition for one metric. All comparisons are against the
/// normalized value (ROE in percent).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Threshold {
    Below(f64),
    AtMost(f64),
    Above(f64),
    AtLeast(f64),
}

impl Threshold {
    /// Parse a comparison such as "<20", "<=3", ">15" or ">= 10".
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        let number = |rest: &str| -> Result<f64> {
            let value: f64 = rest
                .trim()
                .parse()
                .with_context(|| format!("Invalid threshold number: {}", rest.trim()))?;
            if !value.is_finite() {
                bail!("Threshold must be a finite number: {}", s);
            }
            Ok(value)
        };

        if let Some(rest) = s.strip_prefix(">=") {
            Ok(Threshold::AtLeast(number(rest)?))
        } else if let Some(rest) = s.strip_prefix("<=") {
            Ok(Threshold::AtMost(number(rest)?))
        } else if let Some(rest) = s.strip_prefix('>') {
            Ok(Threshold::Above(number(rest)?))
        } else if let Some(rest) = s.strip_prefix('<') {
            Ok(Threshold::Below(number(rest)?))
        } else {
            bail!("Threshold must start with <, <=, > or >=: {}", s)
        }
    }

    pub fn passes(&self, value: f64) -> bool {
        match self {
            Threshold::Below(n) => value < *n,
            Threshold::AtMost(n) => value <= *n,
            Threshold::Above(n) => value > *n,
            Threshold::AtLeast(n) => value >= *n,
        }
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Threshold::Below(n) => write!(f, "<{}", n),
            Threshold::AtMost(n) => write!(f, "<={}", n),
            Threshold::Above(n) => write!(f, ">{}", n),
            Threshold::AtLeast(n) => write!(f, ">={}", n),
        }
    }
}
