use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single observation of a metric.
///
/// Series are ordered by `timestamp` (epoch milliseconds). Duplicate
/// timestamps are allowed; insertion order is what counts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    pub timestamp: i64,
    pub value: f64,
}

impl TimeSeriesPoint {
    pub fn new(timestamp: i64, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// Extracts the raw values of a series, dropping the timestamps.
pub fn series_values(points: &[TimeSeriesPoint]) -> Vec<f64> {
    points.iter().map(|p| p.value).collect()
}

/// Named metric series attached to a snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricHistory {
    series: BTreeMap<String, Vec<TimeSeriesPoint>>,
}

impl MetricHistory {
    pub const PERFORMANCE: &'static str = "performance";
    pub const UPTIME: &'static str = "uptime";
    pub const LATENCY: &'static str = "latency";
    pub const STORAGE_UTILIZATION: &'static str = "storage_utilization";

    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, handy for tests and fixtures.
    pub fn with_series(mut self, name: impl Into<String>, points: Vec<TimeSeriesPoint>) -> Self {
        self.series.insert(name.into(), points);
        self
    }

    pub fn get(&self, name: &str) -> Option<&[TimeSeriesPoint]> {
        self.series.get(name).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[TimeSeriesPoint])> {
        self.series.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

/// Read-only view of one storage provider as supplied by the data provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    pub id: String,
    /// 0-100
    pub performance_score: f64,
    /// 0-100
    pub uptime_pct: f64,
    pub avg_latency_ms: f64,
    /// 0-100
    pub storage_utilization_pct: f64,
    pub capacity_bytes: f64,
    #[serde(default)]
    pub history: Option<MetricHistory>,
}

impl EntitySnapshot {
    /// Points of a named history series, empty when absent.
    pub fn series(&self, name: &str) -> &[TimeSeriesPoint] {
        self.history
            .as_ref()
            .and_then(|h| h.get(name))
            .unwrap_or(&[])
    }

    /// Values of the performance history. Without history the current score
    /// stands in as a one-point series so downstream fallbacks still apply.
    pub fn performance_values(&self) -> Vec<f64> {
        let points = self.series(MetricHistory::PERFORMANCE);
        if points.is_empty() {
            vec![self.performance_score]
        } else {
            series_values(points)
        }
    }

    /// Checks the ranges promised by the data provider.
    pub fn validate(&self) -> Result<(), CoreError> {
        let percentages = [
            ("performance_score", self.performance_score),
            ("uptime_pct", self.uptime_pct),
            ("storage_utilization_pct", self.storage_utilization_pct),
        ];
        for (field, value) in percentages {
            if !value.is_finite() || !(0.0..=100.0).contains(&value) {
                return Err(CoreError::InvalidInput(
                    format!("{}.{}", self.id, field),
                    format!("expected a value in [0, 100], got {}", value),
                ));
            }
        }

        let non_negative = [
            ("avg_latency_ms", self.avg_latency_ms),
            ("capacity_bytes", self.capacity_bytes),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(CoreError::InvalidInput(
                    format!("{}.{}", self.id, field),
                    format!("expected a non-negative value, got {}", value),
                ));
            }
        }

        if let Some(history) = &self.history {
            for (name, points) in history.iter() {
                if let Some(bad) = points.iter().find(|p| !p.value.is_finite()) {
                    return Err(CoreError::InvalidInput(
                        format!("{}.history.{}", self.id, name),
                        format!("non-finite value at timestamp {}", bad.timestamp),
                    ));
                }
                if let Some(index) = points
                    .windows(2)
                    .position(|w| w[1].timestamp < w[0].timestamp)
                {
                    return Err(CoreError::UnorderedHistory {
                        series: name.to_string(),
                        index: index + 1,
                    });
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> EntitySnapshot {
        EntitySnapshot {
            id: "sp-1".to_string(),
            performance_score: 92.0,
            uptime_pct: 99.5,
            avg_latency_ms: 120.0,
            storage_utilization_pct: 61.0,
            capacity_bytes: 4.0e12,
            history: None,
        }
    }

    #[test]
    fn performance_values_fall_back_to_current_score() {
        assert_eq!(snapshot().performance_values(), vec![92.0]);

        let mut with_history = snapshot();
        with_history.history = Some(MetricHistory::new().with_series(
            MetricHistory::PERFORMANCE,
            vec![TimeSeriesPoint::new(1, 90.0), TimeSeriesPoint::new(2, 91.0)],
        ));
        assert_eq!(with_history.performance_values(), vec![90.0, 91.0]);
    }

    #[test]
    fn validate_rejects_out_of_range_fields() {
        assert!(snapshot().validate().is_ok());

        let mut bad = snapshot();
        bad.uptime_pct = 101.0;
        assert!(matches!(bad.validate(), Err(CoreError::InvalidInput(..))));

        let mut bad = snapshot();
        bad.avg_latency_ms = f64::NAN;
        assert!(bad.validate().is_err());
    }

    #[test]
    fn validate_rejects_unordered_history() {
        let mut s = snapshot();
        s.history = Some(MetricHistory::new().with_series(
            MetricHistory::UPTIME,
            vec![
                TimeSeriesPoint::new(10, 99.0),
                TimeSeriesPoint::new(10, 99.1),
                TimeSeriesPoint::new(5, 98.0),
            ],
        ));
        assert_eq!(
            s.validate(),
            Err(CoreError::UnorderedHistory { series: "uptime".to_string(), index: 2 })
        );
    }

    #[test]
    fn history_deserializes_from_a_plain_map() {
        let json = r#"{
            "id": "sp-9",
            "performance_score": 80.0,
            "uptime_pct": 97.0,
            "avg_latency_ms": 40.0,
            "storage_utilization_pct": 55.0,
            "capacity_bytes": 1000.0,
            "history": { "performance": [{ "timestamp": 1, "value": 79.5 }] }
        }"#;
        let s: EntitySnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(s.series("performance").len(), 1);
        assert!(s.series("latency").is_empty());
    }
}
