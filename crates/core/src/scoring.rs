//! Candidate engagement and dropout-risk scoring.
//!
//! Scores are produced by a [`ScoringStrategy`] held in application state so
//! that tests can swap in [`FixedScoring`].

use rand::Rng;

/// Engagement scores fall in `[ENGAGEMENT_MIN, ENGAGEMENT_MAX)`.
pub const ENGAGEMENT_MIN: f64 = 27.0;
pub const ENGAGEMENT_MAX: f64 = 85.0;

/// Dropout-risk scores fall in `[DROPOUT_RISK_MIN, DROPOUT_RISK_MAX)`.
pub const DROPOUT_RISK_MIN: f64 = 5.0;
pub const DROPOUT_RISK_MAX: f64 = 45.0;

/// Default threshold for the at-risk candidate listing.
pub const DEFAULT_RISK_THRESHOLD: f64 = 50.0;

pub trait ScoringStrategy: Send + Sync {
    fn engagement_score(&self) -> f64;
    fn dropout_risk_score(&self) -> f64;
}

/// Placeholder scoring: uniform random draws within the configured bands.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomScoring;

impl ScoringStrategy for RandomScoring {
    fn engagement_score(&self) -> f64 {
        random_score(ENGAGEMENT_MIN, ENGAGEMENT_MAX)
    }

    fn dropout_risk_score(&self) -> f64 {
        random_score(DROPOUT_RISK_MIN, DROPOUT_RISK_MAX)
    }
}

/// Always returns the same pair of scores.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedScoring {
    pub engagement: f64,
    pub dropout_risk: f64,
}

impl ScoringStrategy for FixedScoring {
    fn engagement_score(&self) -> f64 {
        self.engagement
    }

    fn dropout_risk_score(&self) -> f64 {
        self.dropout_risk
    }
}

fn random_score(min: f64, max: f64) -> f64 {
    round2(rand::rng().random_range(min..max))
}

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
