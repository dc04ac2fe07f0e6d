use super::config::ScoringConfig;
use super::metrics::Metric;
use super::threshold::Threshold;

/// Validate scoring configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_scoring(config: &ScoringConfig) -> Result<(), Vec<String>> {
    let errors: Vec<String> = Metric::ALL
        .iter()
        .filter_map(|metric| {
            let expr = config.threshold_for(*metric);
            Threshold::parse(expr).err().map(|e| {
                format!(
                    "scoring.{}: invalid '{}' - {}",
                    metric.config_key(),
                    expr,
                    e
                )
            })
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        assert!(validate_scoring(&ScoringConfig::default()).is_ok());
    }

    #[test]
    fn test_custom_valid_config() {
        let config = ScoringConfig {
            pe: "<=25".to_string(),
            pb: "< 1.5".to_string(),
            ..Default::default()
        };
        assert!(validate_scoring(&config).is_ok());
    }

    #[test]
    fn test_invalid_operator() {
        let config = ScoringConfig {
            pb: "3".to_string(),
            ..Default::default()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("scoring.pb"));
        assert!(errors[0].contains("'3'"));
    }

    #[test]
    fn test_invalid_number() {
        let config = ScoringConfig {
            debt_to_equity: "<lots".to_string(),
            ..Default::default()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert!(errors[0].contains("scoring.debt_to_equity"));
    }

    #[test]
    fn test_collects_all_errors() {
        let config = ScoringConfig {
            pe: "bad".to_string(),
            roe: ">".to_string(),
            operating_margin: "".to_string(),
            ..Default::default()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors[0].contains("scoring.pe"));
        assert!(errors[1].contains("scoring.roe"));
        assert!(errors[2].contains("scoring.operating_margin"));
    }
}
