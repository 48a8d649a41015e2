use serde::{Deserialize, Serialize};
use std::fmt;

/// Strength bucket of a correlation coefficient, taken from `|r|`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrelationStrength {
    None,
    Weak,
    Moderate,
    Strong,
}

impl CorrelationStrength {
    /// Buckets `|r|` at the 0.2 / 0.4 / 0.7 thresholds.
    pub fn from_coefficient(r: f64) -> Self {
        let abs = r.abs();
        if abs >= 0.7 {
            CorrelationStrength::Strong
        } else if abs >= 0.4 {
            CorrelationStrength::Moderate
        } else if abs >= 0.2 {
            CorrelationStrength::Weak
        } else {
            CorrelationStrength::None
        }
    }
}

impl fmt::Display for CorrelationStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CorrelationStrength::None => "no",
            CorrelationStrength::Weak => "weak",
            CorrelationStrength::Moderate => "moderate",
            CorrelationStrength::Strong => "strong",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrelationDirection {
    Positive,
    Negative,
    None,
}

impl CorrelationDirection {
    /// Anything inside the ±0.1 band has no direction.
    pub fn from_coefficient(r: f64) -> Self {
        if r > 0.1 {
            CorrelationDirection::Positive
        } else if r < -0.1 {
            CorrelationDirection::Negative
        } else {
            CorrelationDirection::None
        }
    }
}

impl fmt::Display for CorrelationDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CorrelationDirection::Positive => "positive",
            CorrelationDirection::Negative => "negative",
            CorrelationDirection::None => "neutral",
        };
        f.write_str(s)
    }
}

/// Overall risk bucket of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl RiskLevel {
    pub fn from_score(score: f64) -> Self {
        if score < 25.0 {
            RiskLevel::Low
        } else if score < 50.0 {
            RiskLevel::Medium
        } else if score < 75.0 {
            RiskLevel::High
        } else {
            RiskLevel::VeryHigh
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::VeryHigh => "very_high",
        };
        f.write_str(s)
    }
}

/// Rating of a metric relative to the rest of the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceRating {
    Poor,
    BelowAverage,
    Average,
    AboveAverage,
    Excellent,
}

impl PerformanceRating {
    /// Expects a percentile where higher is always better.
    pub fn from_percentile(percentile: f64) -> Self {
        if percentile >= 90.0 {
            PerformanceRating::Excellent
        } else if percentile >= 70.0 {
            PerformanceRating::AboveAverage
        } else if percentile >= 30.0 {
            PerformanceRating::Average
        } else if percentile >= 10.0 {
            PerformanceRating::BelowAverage
        } else {
            PerformanceRating::Poor
        }
    }
}

impl fmt::Display for PerformanceRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PerformanceRating::Poor => "poor",
            PerformanceRating::BelowAverage => "below_average",
            PerformanceRating::Average => "average",
            PerformanceRating::AboveAverage => "above_average",
            PerformanceRating::Excellent => "excellent",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SharpeInterpretation {
    Poor,
    Acceptable,
    Good,
    VeryGood,
    Excellent,
}

impl SharpeInterpretation {
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio >= 3.0 {
            SharpeInterpretation::Excellent
        } else if ratio >= 2.0 {
            SharpeInterpretation::VeryGood
        } else if ratio >= 1.0 {
            SharpeInterpretation::Good
        } else if ratio >= 0.5 {
            SharpeInterpretation::Acceptable
        } else {
            SharpeInterpretation::Poor
        }
    }
}

/// Reliability bucket derived from a consistency score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reliability {
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl Reliability {
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            Reliability::VeryHigh
        } else if score >= 75.0 {
            Reliability::High
        } else if score >= 50.0 {
            Reliability::Moderate
        } else {
            Reliability::Low
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Up,
    Down,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolatilityTrend {
    Increasing,
    Decreasing,
    Stable,
}
