//! RiskBucket enum - discrete attrition risk levels.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Lower bound (inclusive) of the Medium bucket.
pub const MEDIUM_THRESHOLD: f64 = 30.0;

/// Lower bound (inclusive) of the High bucket.
pub const HIGH_THRESHOLD: f64 = 60.0;

/// Discrete risk level derived from an attrition probability.
///
/// Ordered by severity, so `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskBucket {
    Low,
    Medium,
    High,
}

impl RiskBucket {
    /// Returns all buckets from least to most severe.
    pub fn all() -> &'static [RiskBucket] {
        &[RiskBucket::Low, RiskBucket::Medium, RiskBucket::High]
    }

    /// Maps a probability on the 0-100 scale to its bucket.
    ///
    /// Lower edges are inclusive: 30 is Medium, 60 is High. Values outside
    /// 0-100 are not clamped; NaN falls through to Low.
    pub fn from_probability(probability: f64) -> Self {
        if probability >= HIGH_THRESHOLD {
            RiskBucket::High
        } else if probability >= MEDIUM_THRESHOLD {
            RiskBucket::Medium
        } else {
            RiskBucket::Low
        }
    }

    /// Returns the display label.
    pub fn label(&self) -> &'static str {
        match self {
            RiskBucket::Low => "Low",
            RiskBucket::Medium => "Medium",
            RiskBucket::High => "High",
        }
    }
}

impl fmt::Display for RiskBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for RiskBucket {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(RiskBucket::Low),
            "medium" => Ok(RiskBucket::Medium),
            "high" => Ok(RiskBucket::High),
            other => Err(ValidationError::invalid_format(
                "risk_bucket",
                format!("unknown risk level '{}'", other),
            )),
        }
    }
}
