//! Natural-language reading of correlation pairs.

use analytics::CorrelationPair;
use core_types::{CorrelationDirection, CorrelationStrength};
use serde::{Deserialize, Serialize};

/// |r| from which a significant pair earns a recommendation.
const RECOMMENDATION_THRESHOLD: f64 = 0.4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationInsight {
    pub metric_a: String,
    pub metric_b: String,
    pub coefficient: f64,
    pub p_value: f64,
    pub significant: bool,
    pub strength: CorrelationStrength,
    pub direction: CorrelationDirection,
    pub interpretation: String,
    pub recommendation: Option<String>,
}

impl From<CorrelationPair> for CorrelationInsight {
    fn from(pair: CorrelationPair) -> Self {
        let c = pair.correlation;
        let interpretation = interpret(
            &pair.metric_a,
            &pair.metric_b,
            c.coefficient,
            c.p_value,
            c.strength,
            c.direction,
            c.significant,
        );
        let recommendation = if c.significant && c.coefficient.abs() >= RECOMMENDATION_THRESHOLD {
            recommend(&pair.metric_a, &pair.metric_b, c.coefficient)
        } else {
            None
        };
        Self {
            metric_a: pair.metric_a,
            metric_b: pair.metric_b,
            coefficient: c.coefficient,
            p_value: c.p_value,
            significant: c.significant,
            strength: c.strength,
            direction: c.direction,
            interpretation,
            recommendation,
        }
    }
}

fn label(metric: &str) -> String {
    metric.replace('_', " ")
}

fn interpret(
    a: &str,
    b: &str,
    r: f64,
    p: f64,
    strength: CorrelationStrength,
    direction: CorrelationDirection,
    significant: bool,
) -> String {
    let (a, b) = (label(a), label(b));
    if strength == CorrelationStrength::None {
        return format!("No meaningful relationship between {a} and {b} (r = {r:.2}).");
    }

    let movement = match direction {
        CorrelationDirection::Positive => format!("{a} and {b} tend to rise together"),
        CorrelationDirection::Negative => format!("{b} tends to fall as {a} rises"),
        CorrelationDirection::None => format!("{a} and {b} show no consistent direction"),
    };
    let confidence = if significant {
        format!("statistically significant, p = {p:.3}")
    } else {
        format!("not significant, p = {p:.3}")
    };
    let mut strength = strength.to_string();
    if let Some(first) = strength.get_mut(0..1) {
        first.make_ascii_uppercase();
    }
    format!("{strength} {direction} correlation (r = {r:.2}, {confidence}): {movement}.")
}

/// Operational advice for the metric pairs the dashboard knows how to act on.
fn recommend(a: &str, b: &str, r: f64) -> Option<String> {
    let positive = r > 0.0;
    let mut key = [a, b];
    key.sort_unstable();

    let text = match (key[0], key[1], positive) {
        ("performance", "uptime", true) => {
            "Availability drives performance scores; prioritise uptime monitoring and alerting."
        }
        ("latency", "performance", false) => {
            "Lower latency goes with higher performance; network path optimisation should lift scores."
        }
        ("latency", "performance", true) => {
            "Higher latency coincides with higher scores; check whether the score weights latency correctly."
        }
        ("latency", "uptime", false) => {
            "Latency spikes coincide with downtime; investigate connectivity on the affected nodes."
        }
        ("performance", "storage_utilization", false) => {
            "Heavily utilized nodes perform worse; review capacity planning before nodes saturate."
        }
        ("performance", "storage_utilization", true) => {
            "Well-used nodes perform better; underused capacity may point to onboarding issues."
        }
        ("capacity", "performance", _) => {
            "Performance depends on provider size; benchmark nodes against peers of similar capacity."
        }
        ("capacity", "storage_utilization", _) => {
            "Utilization depends on provider size; watch the affected size band for saturation."
        }
        _ => return None,
    };
    Some(text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use analytics::CorrelationResult;

    fn pair(a: &str, b: &str, r: f64, p: f64) -> CorrelationPair {
        CorrelationPair {
            metric_a: a.to_string(),
            metric_b: b.to_string(),
            correlation: CorrelationResult {
                coefficient: r,
                p_value: p,
                significant: p < 0.05,
                strength: CorrelationStrength::from_coefficient(r),
                direction: CorrelationDirection::from_coefficient(r),
                sample_size: 20,
            },
        }
    }

    #[test]
    fn strong_significant_pair_gets_a_recommendation() {
        let insight = CorrelationInsight::from(pair("uptime", "performance", 0.82, 0.001));
        assert!(insight.interpretation.starts_with("Strong positive correlation"));
        assert!(insight.interpretation.contains("statistically significant"));
        assert!(insight.recommendation.is_some());
    }

    #[test]
    fn weak_or_insignificant_pairs_get_none() {
        let weak = CorrelationInsight::from(pair("performance", "uptime", 0.3, 0.01));
        assert!(weak.recommendation.is_none());

        let noisy = CorrelationInsight::from(pair("performance", "uptime", 0.6, 0.2));
        assert!(noisy.recommendation.is_none());
        assert!(noisy.interpretation.contains("not significant"));
    }

    #[test]
    fn unknown_pairs_get_no_recommendation() {
        let insight = CorrelationInsight::from(pair("foo", "bar", -0.9, 0.0001));
        assert!(insight.recommendation.is_none());
        assert!(insight.interpretation.contains("bar tends to fall as foo rises"));
    }

    #[test]
    fn no_correlation_wording() {
        let insight = CorrelationInsight::from(pair("latency", "capacity", 0.05, 0.8));
        assert!(insight.interpretation.starts_with("No meaningful relationship"));
    }
}
