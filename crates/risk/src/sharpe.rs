use core_types::SharpeInterpretation;
use serde::{Deserialize, Serialize};

/// Sharpe-like risk-adjusted score of a metric series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharpeRatio {
    pub ratio: f64,
    pub interpretation: SharpeInterpretation,
    /// Smooth 25-75 mapping of the ratio, centred on a ratio of 1.
    pub percentile: f64,
}

/// `(mean - risk_free_rate) / stdev` over the raw values.
///
/// With zero spread there is nothing to divide by: the ratio is
/// `zero_variance_ratio` when the excess is positive and 0 otherwise.
pub fn calculate_sharpe_ratio(
    values: &[f64],
    risk_free_rate: f64,
    zero_variance_ratio: f64,
) -> SharpeRatio {
    let excess = stats::mean(values) - risk_free_rate;
    let std = stats::std_dev(values);

    let ratio = if std > 0.0 {
        excess / std
    } else if excess > 0.0 {
        zero_variance_ratio
    } else {
        0.0
    };

    SharpeRatio {
        ratio,
        interpretation: SharpeInterpretation::from_ratio(ratio),
        percentile: sharpe_percentile(ratio),
    }
}

pub fn sharpe_percentile(ratio: f64) -> f64 {
    (50.0 + 25.0 * (ratio - 1.0).tanh()).clamp(0.0, 100.0)
}
