use crate::report::{CorrelationMatrix, CorrelationPair, CorrelationResult};
use core_types::{CorrelationDirection, CorrelationStrength};
use stats::t_distribution_p_value;
use std::cmp::Ordering;

/// Pearson correlation between `x` and `y` with a two-tailed t test.
///
/// Only the first `min(x.len(), y.len())` points are used. Fewer than three
/// points, or a constant series, give the degenerate zero/p=1 result.
pub fn pearson_correlation(x: &[f64], y: &[f64], significance_level: f64) -> CorrelationResult {
    let n = x.len().min(y.len());
    if n < 3 {
        return CorrelationResult::degenerate(n);
    }
    let (x, y) = (&x[..n], &y[..n]);

    let mean_x = stats::mean(x);
    let mean_y = stats::mean(y);
    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (xi, yi) in x.iter().zip(y) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x <= 0.0 || var_y <= 0.0 {
        return CorrelationResult::degenerate(n);
    }

    let r = (cov / (var_x * var_y).sqrt()).clamp(-1.0, 1.0);
    if !r.is_finite() {
        return CorrelationResult::degenerate(n);
    }

    let df = (n - 2) as f64;
    // |r| == 1 makes the statistic infinite, which the p-value maps to 0.
    let t = r * (df / (1.0 - r * r)).sqrt();
    let p_value = t_distribution_p_value(t, df);

    CorrelationResult {
        coefficient: r,
        p_value,
        significant: p_value < significance_level,
        strength: CorrelationStrength::from_coefficient(r),
        direction: CorrelationDirection::from_coefficient(r),
        sample_size: n,
    }
}

fn diagonal(values: &[f64]) -> CorrelationResult {
    let testable = values.len() >= 3 && stats::population_std_dev(values) > 0.0;
    CorrelationResult::identity(values.len(), testable)
}

/// Correlates every pair of named series.
///
/// The diagonal is the identity result by construction and the lower triangle
/// mirrors the upper one, so the matrix is exactly symmetric.
pub fn correlation_matrix(
    series: &[(String, Vec<f64>)],
    significance_level: f64,
) -> CorrelationMatrix {
    let n = series.len();
    tracing::debug!(metrics = n, "Building correlation matrix.");

    let mut matrix: Vec<Vec<CorrelationResult>> = series
        .iter()
        .map(|(_, values)| vec![diagonal(values); n])
        .collect();

    for i in 0..n {
        for j in (i + 1)..n {
            let result = pearson_correlation(&series[i].1, &series[j].1, significance_level);
            matrix[j][i] = result.clone();
            matrix[i][j] = result;
        }
    }

    CorrelationMatrix {
        metrics: series.iter().map(|(name, _)| name.clone()).collect(),
        matrix,
    }
}

impl CorrelationMatrix {
    fn index_of(&self, metric: &str) -> Option<usize> {
        self.metrics.iter().position(|m| m == metric)
    }

    /// Looks up the correlation between two metrics by name.
    pub fn get(&self, a: &str, b: &str) -> Option<&CorrelationResult> {
        let i = self.index_of(a)?;
        let j = self.index_of(b)?;
        Some(&self.matrix[i][j])
    }

    /// All off-diagonal pairs, each listed once.
    pub fn pairs(&self) -> Vec<CorrelationPair> {
        let n = self.metrics.len();
        let mut pairs = Vec::with_capacity(n * n.saturating_sub(1) / 2);
        for i in 0..n {
            for j in (i + 1)..n {
                pairs.push(CorrelationPair {
                    metric_a: self.metrics[i].clone(),
                    metric_b: self.metrics[j].clone(),
                    correlation: self.matrix[i][j].clone(),
                });
            }
        }
        pairs
    }

    pub fn significant_pairs(&self) -> Vec<CorrelationPair> {
        self.pairs()
            .into_iter()
            .filter(|p| p.correlation.significant)
            .collect()
    }

    /// Up to `k` pairs with the largest positive coefficients, strongest first.
    pub fn top_positive(&self, k: usize) -> Vec<CorrelationPair> {
        let mut pairs: Vec<_> = self
            .pairs()
            .into_iter()
            .filter(|p| p.correlation.coefficient > 0.0)
            .collect();
        pairs.sort_by(|a, b| {
            b.correlation
                .coefficient
                .partial_cmp(&a.correlation.coefficient)
                .unwrap_or(Ordering::Equal)
        });
        pairs.truncate(k);
        pairs
    }

    /// Up to `k` pairs with the most negative coefficients, strongest first.
    pub fn top_negative(&self, k: usize) -> Vec<CorrelationPair> {
        let mut pairs: Vec<_> = self
            .pairs()
            .into_iter()
            .filter(|p| p.correlation.coefficient < 0.0)
            .collect();
        pairs.sort_by(|a, b| {
            a.correlation
                .coefficient
                .partial_cmp(&b.correlation.coefficient)
                .unwrap_or(Ordering::Equal)
        });
        pairs.truncate(k);
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    const ALPHA: f64 = 0.05;

    #[test]
    fn perfect_negative_correlation() {
        let r = pearson_correlation(&[1.0, 2.0, 3.0, 4.0, 5.0], &[5.0, 4.0, 3.0, 2.0, 1.0], ALPHA);
        assert_eq!(r.coefficient, -1.0);
        assert_eq!(r.strength, CorrelationStrength::Strong);
        assert_eq!(r.direction, CorrelationDirection::Negative);
        assert_eq!(r.p_value, 0.0);
        assert!(r.significant);
        assert_eq!(r.sample_size, 5);
    }

    #[test]
    fn short_inputs_are_degenerate() {
        let r = pearson_correlation(&[1.0, 2.0], &[2.0, 4.0], ALPHA);
        assert_eq!(r, CorrelationResult::degenerate(2));
        assert_eq!(r.p_value, 1.0);
        assert!(!r.significant);

        // Only the overlapping prefix counts.
        let r = pearson_correlation(&[1.0, 2.0, 3.0, 4.0], &[1.0, 2.0], ALPHA);
        assert_eq!(r.sample_size, 2);
        assert_eq!(r.coefficient, 0.0);
    }

    #[test]
    fn constant_series_is_degenerate() {
        let r = pearson_correlation(&[3.0, 3.0, 3.0, 3.0], &[1.0, 2.0, 3.0, 4.0], ALPHA);
        assert_eq!(r.coefficient, 0.0);
        assert_eq!(r.p_value, 1.0);
    }

    #[test]
    fn weak_noise_is_not_significant() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let y = [2.0, 1.0, 4.0, 3.0, 1.0, 2.0];
        let r = pearson_correlation(&x, &y, ALPHA);
        assert!(!r.significant);
        assert!(r.p_value > 0.05);
    }

    fn sample_matrix() -> CorrelationMatrix {
        correlation_matrix(
            &[
                ("a".to_string(), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]),
                ("b".to_string(), vec![2.1, 3.9, 6.2, 8.1, 9.8, 12.2]),
                ("c".to_string(), vec![9.0, 7.5, 6.1, 4.2, 3.3, 1.0]),
                ("d".to_string(), vec![5.0, 1.0, 4.0, 2.0, 6.0, 3.0]),
            ],
            ALPHA,
        )
    }

    #[test]
    fn matrix_is_symmetric_with_unit_diagonal() {
        let m = sample_matrix();
        for i in 0..4 {
            assert_eq!(m.matrix[i][i].coefficient, 1.0);
            for j in 0..4 {
                assert_eq!(m.matrix[i][j].coefficient, m.matrix[j][i].coefficient);
            }
        }
        assert_eq!(m.get("a", "c"), m.get("c", "a"));
        assert!(m.get("a", "zzz").is_none());
    }

    #[test]
    fn untestable_diagonal_is_not_significant() {
        let m = correlation_matrix(
            &[
                ("flat".to_string(), vec![4.0, 4.0, 4.0, 4.0]),
                ("short".to_string(), vec![1.0, 2.0]),
                ("empty".to_string(), Vec::new()),
                ("live".to_string(), vec![1.0, 3.0, 2.0, 5.0]),
            ],
            ALPHA,
        );
        for i in 0..3 {
            let cell = &m.matrix[i][i];
            assert_eq!(cell.coefficient, 1.0);
            assert_eq!(cell.p_value, 1.0);
            assert!(!cell.significant);
        }
        let live = m.get("live", "live").unwrap();
        assert_eq!(live.p_value, 0.0);
        assert!(live.significant);
        assert_eq!(live.sample_size, 4);
    }

    #[test]
    fn pair_extraction() {
        let m = sample_matrix();
        assert_eq!(m.pairs().len(), 6);

        let positive = m.top_positive(3);
        assert_eq!(positive[0].metric_a, "a");
        assert_eq!(positive[0].metric_b, "b");
        assert!(positive.iter().all(|p| p.correlation.coefficient > 0.0));

        let negative = m.top_negative(3);
        assert!(!negative.is_empty());
        assert!(negative.windows(2).all(|w| {
            w[0].correlation.coefficient <= w[1].correlation.coefficient
        }));

        let significant = m.significant_pairs();
        assert!(significant.iter().all(|p| p.correlation.p_value < ALPHA));
        assert!(significant.iter().any(|p| p.metric_a == "a" && p.metric_b == "c"));
    }

    proptest! {
        #[test]
        fn self_correlation_is_one(values in prop::collection::vec(-1000.0f64..1000.0, 3..50)) {
            prop_assume!(stats::variance(&values, true) > 1e-6);
            let r = pearson_correlation(&values, &values, ALPHA);
            assert_abs_diff_eq!(r.coefficient, 1.0, epsilon = 1e-9);
        }

        #[test]
        fn coefficient_and_p_value_stay_in_range(
            x in prop::collection::vec(-100.0f64..100.0, 0..40),
            y in prop::collection::vec(-100.0f64..100.0, 0..40),
        ) {
            let r = pearson_correlation(&x, &y, ALPHA);
            prop_assert!((-1.0..=1.0).contains(&r.coefficient));
            prop_assert!((0.0..=1.0).contains(&r.p_value));
        }
    }
}
