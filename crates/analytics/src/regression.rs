use crate::report::{ConfidenceInterval, PredictionInterval, RegressionResult};
use stats::{t_critical_value, t_distribution_p_value};

/// Half-width of a prediction interval around a fitted value.
///
/// `leverage` is `1/n + (x - x̄)² / Σ(x - x̄)²`. Non-finite widths collapse to
/// zero so the interval never inverts.
fn interval_margin(standard_error: f64, leverage: f64, t_critical: f64) -> f64 {
    let margin = t_critical * standard_error * (1.0 + leverage).sqrt();
    if margin.is_finite() { margin.abs() } else { 0.0 }
}

fn sum_sq_dev(x: &[f64], mean: f64) -> f64 {
    x.iter().map(|v| (v - mean) * (v - mean)).sum()
}

/// Fit returned when the data cannot support a slope.
fn flat_fit(y: &[f64], confidence_level: f64) -> RegressionResult {
    let intercept = stats::mean(y);
    RegressionResult {
        slope: 0.0,
        intercept,
        r_squared: 0.0,
        standard_error: 0.0,
        slope_standard_error: 0.0,
        t_statistic: 0.0,
        p_value: 1.0,
        sample_size: y.len(),
        confidence_level,
        confidence_intervals: vec![
            ConfidenceInterval {
                lower: intercept,
                upper: intercept,
            };
            y.len()
        ],
        predictions: vec![intercept; y.len()],
        residuals: y.iter().map(|v| v - intercept).collect(),
    }
}

/// Ordinary least squares regression of `y` on `x`.
///
/// Uses the first `min(x.len(), y.len())` points. With fewer than three points,
/// no spread in `x` or sums of squares that overflow `f64`, the fit is flat:
/// slope 0, intercept `mean(y)`, R² 0.
pub fn linear_regression(x: &[f64], y: &[f64], confidence_level: f64) -> RegressionResult {
    let n = x.len().min(y.len());
    let (x, y) = (&x[..n], &y[..n]);
    if n < 3 {
        return flat_fit(y, confidence_level);
    }

    let mean_x = stats::mean(x);
    let mean_y = stats::mean(y);
    let sxx = sum_sq_dev(x, mean_x);
    if sxx <= 0.0 || !sxx.is_finite() {
        tracing::debug!(n, "Regression input has no usable spread in x; returning flat fit.");
        return flat_fit(y, confidence_level);
    }

    let sxy: f64 = x
        .iter()
        .zip(y)
        .map(|(xi, yi)| (xi - mean_x) * (yi - mean_y))
        .sum();
    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;

    let predictions: Vec<f64> = x.iter().map(|xi| intercept + slope * xi).collect();
    let residuals: Vec<f64> = y.iter().zip(&predictions).map(|(yi, p)| yi - p).collect();

    let ss_res: f64 = residuals.iter().map(|r| r * r).sum();
    let ss_tot = sum_sq_dev(y, mean_y);
    if !ss_res.is_finite() || !ss_tot.is_finite() {
        tracing::debug!(n, "Regression sums overflowed; returning flat fit.");
        return flat_fit(y, confidence_level);
    }
    let r_squared = if ss_tot > 0.0 {
        (1.0 - ss_res / ss_tot).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let df = (n - 2) as f64;
    let standard_error = (ss_res / df).sqrt();
    let slope_standard_error = standard_error / sxx.sqrt();

    let raw_t = if slope_standard_error > 0.0 {
        slope / slope_standard_error
    } else if slope == 0.0 {
        0.0
    } else {
        f64::INFINITY.copysign(slope)
    };
    let p_value = t_distribution_p_value(raw_t, df);
    // Keep the reported statistic finite so it serializes as a number.
    let t_statistic = raw_t.clamp(-f64::MAX, f64::MAX);

    let t_critical = t_critical_value(1.0 - confidence_level, df);
    let confidence_intervals = x
        .iter()
        .zip(&predictions)
        .map(|(xi, p)| {
            let leverage = 1.0 / n as f64 + (xi - mean_x).powi(2) / sxx;
            let margin = interval_margin(standard_error, leverage, t_critical);
            ConfidenceInterval {
                lower: p - margin,
                upper: p + margin,
            }
        })
        .collect();

    RegressionResult {
        slope,
        intercept,
        r_squared,
        standard_error,
        slope_standard_error,
        t_statistic,
        p_value,
        sample_size: n,
        confidence_level,
        confidence_intervals,
        predictions,
        residuals,
    }
}

/// Predicts `y` at `x_new` with the prediction interval of `regression`.
///
/// `x_data` must be the `x` values the regression was fitted on.
pub fn predict_with_confidence(
    regression: &RegressionResult,
    x_new: f64,
    x_data: &[f64],
    confidence_level: f64,
) -> PredictionInterval {
    let predicted = regression.predict(x_new);
    let n = x_data.len().min(regression.sample_size);
    if n < 3 {
        return PredictionInterval {
            x: x_new,
            predicted,
            lower: predicted,
            upper: predicted,
        };
    }

    let x_data = &x_data[..n];
    let mean_x = stats::mean(x_data);
    let sxx = sum_sq_dev(x_data, mean_x);
    let spread = if sxx > 0.0 {
        (x_new - mean_x).powi(2) / sxx
    } else {
        0.0
    };
    let leverage = 1.0 / n as f64 + spread;

    let t_critical = t_critical_value(1.0 - confidence_level, (n - 2) as f64);
    let margin = interval_margin(regression.standard_error, leverage, t_critical);

    PredictionInterval {
        x: x_new,
        predicted,
        lower: predicted - margin,
        upper: predicted + margin,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    #[test]
    fn exact_line() {
        let r = linear_regression(&[1.0, 2.0, 3.0, 4.0, 5.0], &[2.0, 4.0, 6.0, 8.0, 10.0], 0.95);
        assert_abs_diff_eq!(r.slope, 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(r.intercept, 0.0, epsilon = 1e-12);
        assert_eq!(r.r_squared, 1.0);
        assert_eq!(r.p_value, 0.0);
        assert!(r.t_statistic.is_finite());
        assert_eq!(r.predictions.len(), 5);
        assert!(r.residuals.iter().all(|e| e.abs() < 1e-12));
    }

    #[test]
    fn short_input_is_flat() {
        let r = linear_regression(&[1.0, 2.0], &[3.0, 5.0], 0.95);
        assert_eq!(r.slope, 0.0);
        assert_eq!(r.intercept, 4.0);
        assert_eq!(r.r_squared, 0.0);
        assert_eq!(r.p_value, 1.0);
        assert_eq!(r.residuals, vec![-1.0, 1.0]);
    }

    #[test]
    fn constant_x_is_flat() {
        let r = linear_regression(&[2.0, 2.0, 2.0], &[1.0, 2.0, 3.0], 0.95);
        assert_eq!(r.slope, 0.0);
        assert_eq!(r.intercept, 2.0);
    }

    #[test]
    fn noisy_fit_reports_uncertainty() {
        let x = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0];
        let y = [1.0, 3.2, 4.8, 7.1, 9.2, 10.7, 13.1, 15.0];
        let r = linear_regression(&x, &y, 0.95);
        assert!(r.slope > 1.9 && r.slope < 2.1);
        assert!(r.r_squared > 0.99 && r.r_squared <= 1.0);
        assert!(r.standard_error > 0.0);
        assert!(r.p_value < 0.001);

        // Intervals widen away from the centre of the data.
        let width = |i: usize| r.confidence_intervals[i].upper - r.confidence_intervals[i].lower;
        assert!(width(0) > width(3));

        let near = predict_with_confidence(&r, 4.0, &x, 0.95);
        let far = predict_with_confidence(&r, 20.0, &x, 0.95);
        assert!(far.upper - far.lower > near.upper - near.lower);
        assert_abs_diff_eq!(far.predicted, r.intercept + r.slope * 20.0, epsilon = 1e-12);
    }

    #[test]
    fn higher_confidence_widens_the_band() {
        let x = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [1.0, 2.5, 2.9, 4.4, 5.1, 5.8];
        let r95 = linear_regression(&x, &y, 0.95);
        let r99 = linear_regression(&x, &y, 0.99);
        let w95 = r95.confidence_intervals[0].upper - r95.confidence_intervals[0].lower;
        let w99 = r99.confidence_intervals[0].upper - r99.confidence_intervals[0].lower;
        assert!(w99 > w95);
    }

    #[test]
    fn overflowing_sums_fall_back_to_flat_fit() {
        let r = linear_regression(&[0.0, 1.0, 2.0], &[1e308, -1e308, 1e308], 0.95);
        assert_eq!(r.r_squared, 0.0);
        assert_eq!(r.slope, 0.0);
        assert_eq!(r.p_value, 1.0);

        let r = linear_regression(&[0.0, 1.0, 2.0, 3.0], &[1e200, 3e200, 2e200, 4e200], 0.95);
        assert_eq!(r.r_squared, 0.0);
        assert_eq!(r.standard_error, 0.0);
        assert_eq!(r.sample_size, 4);

        let r = linear_regression(&[-1e200, 0.0, 1e200], &[1.0, 2.0, 3.0], 0.95);
        assert_eq!(r.r_squared, 0.0);
        assert_eq!(r.intercept, 2.0);
    }

    proptest! {
        #[test]
        fn r_squared_in_unit_interval_and_bands_ordered(
            points in prop::collection::vec((-100.0f64..100.0, -100.0f64..100.0), 0..40),
        ) {
            let (x, y): (Vec<f64>, Vec<f64>) = points.into_iter().unzip();
            let r = linear_regression(&x, &y, 0.95);
            prop_assert!((0.0..=1.0).contains(&r.r_squared));
            for (ci, p) in r.confidence_intervals.iter().zip(&r.predictions) {
                prop_assert!(ci.lower <= *p && *p <= ci.upper);
            }
            let out = predict_with_confidence(&r, 150.0, &x, 0.95);
            prop_assert!(out.lower <= out.predicted && out.predicted <= out.upper);
        }
    }
}
