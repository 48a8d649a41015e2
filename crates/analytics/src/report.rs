use core_types::{CorrelationDirection, CorrelationStrength, TrendDirection};
use serde::{Deserialize, Serialize};

/// Outcome of a Pearson correlation test between two series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationResult {
    /// Always within [-1, 1].
    pub coefficient: f64,
    pub p_value: f64,
    pub significant: bool,
    pub strength: CorrelationStrength,
    pub direction: CorrelationDirection,
    pub sample_size: usize,
}

impl CorrelationResult {
    /// The uninformative answer for too few points or zero variance.
    pub fn degenerate(sample_size: usize) -> Self {
        Self {
            coefficient: 0.0,
            p_value: 1.0,
            significant: false,
            strength: CorrelationStrength::None,
            direction: CorrelationDirection::None,
            sample_size,
        }
    }

    /// A series correlated with itself.
    ///
    /// The coefficient is always 1. Only a `testable` series (three or more
    /// points with some spread) reports p = 0 and significance.
    pub fn identity(sample_size: usize, testable: bool) -> Self {
        Self {
            coefficient: 1.0,
            p_value: if testable { 0.0 } else { 1.0 },
            significant: testable,
            strength: CorrelationStrength::Strong,
            direction: CorrelationDirection::Positive,
            sample_size,
        }
    }
}

/// Two named metrics and their correlation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationPair {
    pub metric_a: String,
    pub metric_b: String,
    pub correlation: CorrelationResult,
}

/// Square matrix of pairwise correlations, indexed in `metrics` order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub metrics: Vec<String>,
    pub matrix: Vec<Vec<CorrelationResult>>,
}

/// A band around a point estimate. `lower <= upper` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub lower: f64,
    pub upper: f64,
}

/// Ordinary least squares fit of `y` on `x`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionResult {
    pub slope: f64,
    pub intercept: f64,
    /// Always within [0, 1].
    pub r_squared: f64,
    /// Residual standard error.
    pub standard_error: f64,
    pub slope_standard_error: f64,
    /// Finite; a perfect fit reports `±f64::MAX`.
    pub t_statistic: f64,
    pub p_value: f64,
    pub sample_size: usize,
    pub confidence_level: f64,
    /// One entry per input point.
    pub confidence_intervals: Vec<ConfidenceInterval>,
    pub predictions: Vec<f64>,
    pub residuals: Vec<f64>,
}

impl RegressionResult {
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

/// An out-of-sample prediction with its prediction interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionInterval {
    pub x: f64,
    pub predicted: f64,
    pub lower: f64,
    pub upper: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendAnalysis {
    pub direction: TrendDirection,
    /// R² scaled to 0-100.
    pub strength: f64,
    /// Slope per step.
    pub momentum: f64,
    pub significant: bool,
    pub r_squared: f64,
    pub p_value: f64,
}

/// Whether forecast values live on a bounded percentage scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastDomain {
    /// Clamp predictions and bounds to [0, 100].
    Percentage,
    Unbounded,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    /// 1-based number of days past the last observation.
    pub day: usize,
    pub timestamp: i64,
    pub predicted: f64,
    pub lower: f64,
    pub upper: f64,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendForecast {
    pub metric: String,
    pub current_value: f64,
    pub trend: TrendAnalysis,
    pub domain: ForecastDomain,
    pub predictions: Vec<ForecastPoint>,
    /// Change from the current value to the last prediction, in percent.
    pub expected_change_pct: f64,
    pub confidence: f64,
}
