use crate::regression::{linear_regression, predict_with_confidence};
use crate::report::{ForecastDomain, ForecastPoint, TrendAnalysis, TrendForecast};
use configuration::{StatisticsSettings, TrendSettings};
use core_types::{TimeSeriesPoint, TrendDirection, series_values};

pub const DAY_MS: i64 = 86_400_000;

/// Lowest per-point confidence a forecast will report.
const MIN_POINT_CONFIDENCE: f64 = 0.05;

fn index_axis(n: usize) -> Vec<f64> {
    (0..n).map(|i| i as f64).collect()
}

/// Regresses `values` against their index and classifies the slope.
///
/// A direction is only called when the slope clears `slope_threshold` and its
/// p-value is below `direction_p_value`.
pub fn analyze_trend(
    values: &[f64],
    settings: &TrendSettings,
    statistics: &StatisticsSettings,
) -> TrendAnalysis {
    let x = index_axis(values.len());
    let regression = linear_regression(&x, values, statistics.confidence_level);
    classify(regression.slope, regression.r_squared, regression.p_value, settings, statistics)
}

fn classify(
    slope: f64,
    r_squared: f64,
    p_value: f64,
    settings: &TrendSettings,
    statistics: &StatisticsSettings,
) -> TrendAnalysis {
    let direction = if slope > settings.slope_threshold && p_value < settings.direction_p_value {
        TrendDirection::Up
    } else if slope < -settings.slope_threshold && p_value < settings.direction_p_value {
        TrendDirection::Down
    } else {
        TrendDirection::Neutral
    };

    TrendAnalysis {
        direction,
        strength: (r_squared * 100.0).clamp(0.0, 100.0),
        momentum: slope,
        significant: p_value < statistics.significance_level,
        r_squared,
        p_value,
    }
}

/// Blends significance and fit quality into a single 0-1 confidence.
pub fn forecast_confidence(significant: bool, r_squared: f64) -> f64 {
    if significant {
        (0.5 + r_squared * 0.45).min(0.95)
    } else {
        (0.3 + r_squared * 0.4).min(0.7)
    }
}

/// Projects `history` `days_ahead` steps past its last point.
///
/// Each step is treated as one day. In the percentage domain the prediction
/// and both bounds are clamped to [0, 100]; clamping is monotone, so the
/// bounds still bracket the prediction.
pub fn generate_trend_forecast(
    history: &[TimeSeriesPoint],
    days_ahead: usize,
    metric_name: &str,
    domain: ForecastDomain,
    settings: &TrendSettings,
    statistics: &StatisticsSettings,
) -> TrendForecast {
    let values = series_values(history);
    let n = values.len();
    let x = index_axis(n);
    let regression = linear_regression(&x, &values, statistics.confidence_level);
    let trend = classify(
        regression.slope,
        regression.r_squared,
        regression.p_value,
        settings,
        statistics,
    );
    let confidence = forecast_confidence(trend.significant, trend.r_squared);

    let current_value = values.last().copied().unwrap_or(0.0);
    let last_timestamp = history.last().map(|p| p.timestamp).unwrap_or(0);

    let bound = |v: f64| match domain {
        ForecastDomain::Percentage => v.clamp(0.0, 100.0),
        ForecastDomain::Unbounded => v,
    };

    let predictions: Vec<ForecastPoint> = (1..=days_ahead)
        .map(|day| {
            let x_new = (n as f64 - 1.0).max(0.0) + day as f64;
            let interval =
                predict_with_confidence(&regression, x_new, &x, statistics.confidence_level);
            let decay = 1.0 - settings.horizon_decay * (day - 1) as f64;
            ForecastPoint {
                day,
                timestamp: last_timestamp + day as i64 * DAY_MS,
                predicted: bound(interval.predicted),
                lower: bound(interval.lower),
                upper: bound(interval.upper),
                confidence: (confidence * decay).max(MIN_POINT_CONFIDENCE),
            }
        })
        .collect();

    let expected_change_pct = match predictions.last() {
        Some(last) if current_value != 0.0 => {
            (last.predicted - current_value) / current_value.abs() * 100.0
        }
        _ => 0.0,
    };

    tracing::debug!(
        metric = metric_name,
        points = n,
        days_ahead,
        direction = ?trend.direction,
        "Generated trend forecast."
    );

    TrendForecast {
        metric: metric_name.to_string(),
        current_value,
        trend,
        domain,
        predictions,
        expected_change_pct,
        confidence,
    }
}
