use crate::Analyzer;
use chrono::{DateTime, Utc};
use core_types::{
    EntitySnapshot, Reliability, RiskLevel, SharpeInterpretation, VolatilityTrend,
};
use rayon::prelude::*;
use risk::{DrawdownAnalysis, SharpeRatio, VolatilityMetrics};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolatilityProfile {
    /// 0-100, higher means calmer.
    pub score: f64,
    pub std_dev: f64,
    pub annualized: f64,
    /// Rank of `std_dev` within the network, 0-100.
    pub percentile: f64,
    pub trend: VolatilityTrend,
    pub rolling: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsistencyProfile {
    pub score: f64,
    pub streak: usize,
    pub reliability: Reliability,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAdjustedPerformance {
    pub sharpe_ratio: f64,
    pub interpretation: SharpeInterpretation,
    /// 1-based position by Sharpe-like ratio, best first.
    pub network_rank: usize,
    pub percentile: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawdownProfile {
    pub max_drawdown_pct: f64,
    pub current_drawdown_pct: f64,
    pub recovery_factor: f64,
    pub days_in_drawdown: usize,
    pub average_drawdown_pct: f64,
    pub time_to_recovery: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskProfile {
    pub entity_id: String,
    pub volatility: VolatilityProfile,
    pub consistency: ConsistencyProfile,
    pub risk_adjusted: RiskAdjustedPerformance,
    pub drawdown: DrawdownProfile,
    /// 0-100, higher is riskier.
    pub risk_score: f64,
    pub risk_level: RiskLevel,
    pub computed_at: DateTime<Utc>,
}

/// Per-entity metrics that need no knowledge of the rest of the network.
#[derive(Debug, Clone)]
pub(crate) struct EntityMetrics {
    pub entity_id: String,
    pub volatility: VolatilityMetrics,
    pub drawdown: DrawdownAnalysis,
    pub sharpe: SharpeRatio,
    pub consistency: f64,
    pub streak: usize,
    pub risk_score: f64,
}

/// Network-wide reference values a profile is ranked against.
pub(crate) struct NetworkContext {
    volatilities: Vec<f64>,
    sharpe_ratios: Vec<f64>,
}

impl NetworkContext {
    pub(crate) fn from_metrics(metrics: &[EntityMetrics]) -> Self {
        Self {
            volatilities: metrics.iter().map(|m| m.volatility.std_dev).collect(),
            sharpe_ratios: metrics.iter().map(|m| m.sharpe.ratio).collect(),
        }
    }

    fn sharpe_rank(&self, ratio: f64) -> usize {
        1 + self.sharpe_ratios.iter().filter(|r| **r > ratio).count()
    }
}

impl Analyzer {
    pub(crate) fn entity_metrics(&self, entity: &EntitySnapshot) -> EntityMetrics {
        let values = entity.performance_values();
        let volatility = self.risk.volatility(&values);
        let drawdown = self.risk.drawdown(&values);
        let risk_score = self.risk.risk_score(&volatility, &drawdown);

        EntityMetrics {
            entity_id: entity.id.clone(),
            sharpe: self.risk.sharpe(&values),
            consistency: self.risk.consistency(&values),
            streak: self.risk.streak(&values),
            volatility,
            drawdown,
            risk_score,
        }
    }

    /// Computes [`EntityMetrics`] for every entity, in input order.
    pub(crate) fn network_metrics(&self, network: &[EntitySnapshot]) -> Vec<EntityMetrics> {
        network.par_iter().map(|e| self.entity_metrics(e)).collect()
    }

    pub(crate) fn assemble_profile(
        &self,
        metrics: EntityMetrics,
        context: &NetworkContext,
        computed_at: DateTime<Utc>,
    ) -> RiskProfile {
        let EntityMetrics {
            entity_id,
            volatility,
            drawdown,
            sharpe,
            consistency,
            streak,
            risk_score,
        } = metrics;

        RiskProfile {
            entity_id,
            volatility: VolatilityProfile {
                score: volatility.score,
                std_dev: volatility.std_dev,
                annualized: volatility.annualized,
                percentile: stats::percentile_rank(volatility.std_dev, &context.volatilities),
                trend: volatility.trend,
                rolling: volatility.rolling,
            },
            consistency: ConsistencyProfile {
                score: consistency,
                streak,
                reliability: Reliability::from_score(consistency),
            },
            risk_adjusted: RiskAdjustedPerformance {
                sharpe_ratio: sharpe.ratio,
                interpretation: sharpe.interpretation,
                network_rank: context.sharpe_rank(sharpe.ratio),
                percentile: sharpe.percentile,
            },
            drawdown: DrawdownProfile {
                max_drawdown_pct: drawdown.max_drawdown_pct,
                current_drawdown_pct: drawdown.current_drawdown_pct,
                recovery_factor: drawdown.recovery_factor,
                days_in_drawdown: drawdown.current_drawdown_duration,
                average_drawdown_pct: drawdown.average_drawdown_pct,
                time_to_recovery: drawdown.time_to_recovery,
            },
            risk_score,
            risk_level: RiskLevel::from_score(risk_score),
            computed_at,
        }
    }

    /// Builds the risk profile of `entity`, ranked against `network`.
    ///
    /// `network` normally contains `entity` itself. When it does not, the
    /// entity is ranked as if it had been added.
    pub fn risk_profile(&self, entity: &EntitySnapshot, network: &[EntitySnapshot]) -> RiskProfile {
        let own = self.entity_metrics(entity);
        let mut metrics = self.network_metrics(network);
        if !network.iter().any(|e| e.id == entity.id) {
            metrics.push(own.clone());
        }
        let context = NetworkContext::from_metrics(&metrics);
        self.assemble_profile(own, &context, Utc::now())
    }

    /// Risk profiles of every entity in `network`, in input order.
    pub fn risk_profiles(&self, network: &[EntitySnapshot]) -> Vec<RiskProfile> {
        let metrics = self.network_metrics(network);
        let context = NetworkContext::from_metrics(&metrics);
        let computed_at = Utc::now();
        tracing::debug!(entities = metrics.len(), "Assembling risk profiles.");
        metrics
            .into_iter()
            .map(|m| self.assemble_profile(m, &context, computed_at))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use configuration::Config;
    use core_types::{MetricHistory, TimeSeriesPoint};

    fn entity(id: &str, history: &[f64]) -> EntitySnapshot {
        let points = history
            .iter()
            .enumerate()
            .map(|(i, v)| TimeSeriesPoint::new(i as i64, *v))
            .collect();
        EntitySnapshot {
            id: id.to_string(),
            performance_score: history.last().copied().unwrap_or(0.0),
            uptime_pct: 99.0,
            avg_latency_ms: 100.0,
            storage_utilization_pct: 50.0,
            capacity_bytes: 1.0e12,
            history: Some(MetricHistory::new().with_series(MetricHistory::PERFORMANCE, points)),
        }
    }

    #[test]
    fn steady_entity_is_low_risk_and_ranked_first() {
        let analyzer = Analyzer::new(&Config::default()).unwrap();
        let steady = entity("steady", &[90.0, 90.5, 91.0, 90.8, 91.2, 91.5, 91.4, 91.9]);
        let choppy = entity("choppy", &[90.0, 40.0, 85.0, 30.0, 80.0, 20.0, 75.0, 35.0]);
        let network = vec![steady.clone(), choppy.clone()];

        let profile = analyzer.risk_profile(&steady, &network);
        assert_eq!(profile.entity_id, "steady");
        assert_eq!(profile.risk_level, RiskLevel::Low);
        assert_eq!(profile.risk_adjusted.network_rank, 1);
        assert_eq!(profile.volatility.percentile, 0.0);
        assert_eq!(profile.consistency.reliability, Reliability::VeryHigh);

        let profile = analyzer.risk_profile(&choppy, &network);
        assert!(matches!(profile.risk_level, RiskLevel::High | RiskLevel::VeryHigh));
        assert_eq!(profile.risk_adjusted.network_rank, 2);
        assert_eq!(profile.volatility.percentile, 100.0);
        assert!(profile.drawdown.max_drawdown_pct > 70.0);
        assert!(profile.drawdown.days_in_drawdown > 0);
    }

    #[test]
    fn entity_without_history_gets_fallbacks() {
        let analyzer = Analyzer::new(&Config::default()).unwrap();
        let mut bare = entity("bare", &[]);
        bare.history = None;
        bare.performance_score = 75.0;

        let profile = analyzer.risk_profile(&bare, &[]);
        assert_eq!(profile.volatility.score, 100.0);
        assert_eq!(profile.consistency.score, 100.0);
        assert_eq!(profile.consistency.streak, 0);
        assert_eq!(profile.drawdown.max_drawdown_pct, 0.0);
        assert_eq!(profile.risk_score, 0.0);
        assert_eq!(profile.risk_level, RiskLevel::Low);
        // Zero variance with a positive mean takes the configured ratio.
        assert_eq!(profile.risk_adjusted.sharpe_ratio, 10.0);
        assert_eq!(profile.risk_adjusted.network_rank, 1);
    }

    #[test]
    fn profiles_keep_input_order() {
        let analyzer = Analyzer::new(&Config::default()).unwrap();
        let network: Vec<_> = (0..12)
            .map(|i| entity(&format!("sp-{i}"), &[80.0, 81.0 + i as f64, 79.0, 82.0]))
            .collect();
        let profiles = analyzer.risk_profiles(&network);
        let ids: Vec<_> = profiles.iter().map(|p| p.entity_id.as_str()).collect();
        let expected: Vec<_> = network.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, expected);
        assert!(profiles.iter().all(|p| (0.0..=100.0).contains(&p.risk_score)));
    }
}
