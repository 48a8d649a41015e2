//! Descriptive statistics over `f64` slices.

pub fn sum(values: &[f64]) -> f64 {
    values.iter().sum()
}

/// Arithmetic mean. `0.0` for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    sum(values) / values.len() as f64
}

/// Variance around the mean.
///
/// With `sample = true` the sum of squares is divided by `n - 1`, otherwise by
/// `n`. Fewer than two points have zero variance.
pub fn variance(values: &[f64], sample: bool) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let m = mean(values);
    let ss: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    let denom = if sample { n - 1 } else { n };
    ss / denom as f64
}

/// Sample standard deviation.
pub fn std_dev(values: &[f64]) -> f64 {
    variance(values, true).sqrt()
}

pub fn population_std_dev(values: &[f64]) -> f64 {
    variance(values, false).sqrt()
}

fn sorted(values: &[f64]) -> Vec<f64> {
    let mut v = values.to_vec();
    v.sort_by(|a, b| a.total_cmp(b));
    v
}

/// Middle value; the average of the two middle values for even lengths.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let s = sorted(values);
    let mid = s.len() / 2;
    if s.len() % 2 == 0 {
        (s[mid - 1] + s[mid]) / 2.0
    } else {
        s[mid]
    }
}

/// The `p`-th percentile (0-100), linearly interpolated between order statistics.
pub fn percentile(values: &[f64], p: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let s = sorted(values);
    let p = p.clamp(0.0, 100.0);
    let index = p / 100.0 * (s.len() - 1) as f64;
    let lower = index.floor() as usize;
    let upper = index.ceil() as usize;
    if lower == upper {
        return s[lower];
    }
    let weight = index - lower as f64;
    s[lower] * (1.0 - weight) + s[upper] * weight
}

/// Percentile rank of `value` within `population`, 0-100.
///
/// Counts the members strictly below `value` plus half of its ties, over
/// `n - 1`. `value` is expected to be a member of `population`, so the
/// minimum ranks at 0, the maximum at 100 and a population of identical
/// values at 50. Populations of fewer than two values rank everything at 50.
pub fn percentile_rank(value: f64, population: &[f64]) -> f64 {
    let n = population.len();
    if n < 2 {
        return 50.0;
    }
    let below = population.iter().filter(|v| **v < value).count();
    let equal = population.iter().filter(|v| **v == value).count();
    let ties = equal.saturating_sub(1) as f64 * 0.5;
    ((below as f64 + ties) / (n - 1) as f64 * 100.0).clamp(0.0, 100.0)
}

/// Distance from `reference_mean` in units of `reference_std`; 0 when the
/// spread is zero.
pub fn z_score(value: f64, reference_mean: f64, reference_std: f64) -> f64 {
    if reference_std <= 0.0 || !reference_std.is_finite() {
        return 0.0;
    }
    (value - reference_mean) / reference_std
}

/// Smallest value, `0.0` when empty.
pub fn min(values: &[f64]) -> f64 {
    values.iter().copied().reduce(f64::min).unwrap_or(0.0)
}

/// Largest value, `0.0` when empty.
pub fn max(values: &[f64]) -> f64 {
    values.iter().copied().reduce(f64::max).unwrap_or(0.0)
}
