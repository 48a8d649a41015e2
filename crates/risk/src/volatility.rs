use core_types::VolatilityTrend;
use serde::{Deserialize, Serialize};

/// Relative change between the halves of the rolling series that counts as a trend.
const VOLATILITY_TREND_BAND: f64 = 0.1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolatilityMetrics {
    /// Population standard deviation of the whole series.
    pub std_dev: f64,
    /// Population standard deviation of each full window, oldest first.
    pub rolling: Vec<f64>,
    pub annualized: f64,
    pub coefficient_of_variation: f64,
    /// 0-100, higher means calmer.
    pub score: f64,
    pub trend: VolatilityTrend,
}

/// Maps a coefficient of variation onto 0-100; CV of 0.5 or more scores 0.
///
/// A NaN CV (from a series whose sums overflow) scores 0 as well.
pub fn volatility_score(coefficient_of_variation: f64) -> f64 {
    if coefficient_of_variation.is_nan() {
        return 0.0;
    }
    (100.0 - coefficient_of_variation * 200.0).clamp(0.0, 100.0)
}

/// `std / |mean|`. A zero mean gives 0 for a flat series and infinity otherwise.
pub fn coefficient_of_variation(values: &[f64]) -> f64 {
    let std = stats::population_std_dev(values);
    let mean = stats::mean(values);
    if mean == 0.0 {
        if std == 0.0 { 0.0 } else { f64::INFINITY }
    } else {
        std / mean.abs()
    }
}

/// Compares the later half of the rolling volatilities with the earlier half.
pub fn volatility_trend(rolling: &[f64]) -> VolatilityTrend {
    if rolling.len() < 2 {
        return VolatilityTrend::Stable;
    }
    let mid = rolling.len() / 2;
    let earlier = stats::mean(&rolling[..mid]);
    let later = stats::mean(&rolling[mid..]);

    if earlier == 0.0 {
        return if later > 0.0 {
            VolatilityTrend::Increasing
        } else {
            VolatilityTrend::Stable
        };
    }
    let change = (later - earlier) / earlier;
    if change > VOLATILITY_TREND_BAND {
        VolatilityTrend::Increasing
    } else if change < -VOLATILITY_TREND_BAND {
        VolatilityTrend::Decreasing
    } else {
        VolatilityTrend::Stable
    }
}

/// Full volatility profile of a series.
///
/// `annualization_factor` is the number of periods per year (252 by
/// convention) and is applied regardless of how often the series was sampled.
pub fn calculate_volatility(
    values: &[f64],
    window: usize,
    annualization_factor: f64,
) -> VolatilityMetrics {
    let std_dev = stats::population_std_dev(values);

    let rolling: Vec<f64> = if window == 0 {
        Vec::new()
    } else {
        values.windows(window).map(stats::population_std_dev).collect()
    };

    let cv = coefficient_of_variation(values);
    let trend = volatility_trend(&rolling);

    VolatilityMetrics {
        std_dev,
        annualized: std_dev * annualization_factor.sqrt(),
        // Keep the reported CV finite; the score is already pinned at 0.
        coefficient_of_variation: if cv.is_finite() { cv } else { f64::MAX },
        score: volatility_score(cv),
        rolling,
        trend,
    }
}
