pub mod config;
pub mod engine;
pub mod metrics;
pub mod threshold;
pub mod validation;

pub use config::ScoringConfig;
pub use engine::{calculate_score, CheckOutcome, ScoreResult, MAX_SCORE};
pub use metrics::{Metric, MetricValues, RawMetrics};
pub use threshold::Threshold;
pub use validation::validate_scoring;
