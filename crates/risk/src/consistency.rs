use crate::volatility::coefficient_of_variation;

/// `100 * (1 - min(2 * CV, 1))`; fewer than two points are perfectly consistent.
pub fn consistency_score(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 100.0;
    }
    let cv = coefficient_of_variation(values);
    (100.0 * (1.0 - (cv * 2.0).min(1.0))).clamp(0.0, 100.0)
}

/// Number of trailing point-to-point changes no larger than `max_delta`,
/// looking at the last `window` points only.
pub fn consistency_streak(values: &[f64], window: usize, max_delta: f64) -> usize {
    let start = values.len().saturating_sub(window);
    values[start..]
        .windows(2)
        .rev()
        .take_while(|w| (w[1] - w[0]).abs() <= max_delta)
        .count()
}
