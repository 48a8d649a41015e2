use crate::Analyzer;
use crate::insights::CorrelationInsight;
use crate::profile::RiskProfile;
use analytics::{CorrelationPair, CorrelationResult};
use chrono::{DateTime, Utc};
use core_types::{EntitySnapshot, MetricHistory, RiskLevel, SharpeInterpretation};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Metrics correlated across the network, in matrix order.
pub const NETWORK_METRICS: [&str; 5] = [
    MetricHistory::PERFORMANCE,
    MetricHistory::UPTIME,
    MetricHistory::LATENCY,
    MetricHistory::STORAGE_UTILIZATION,
    CAPACITY,
];

/// Snapshot-only metric; it has no history series.
const CAPACITY: &str = "capacity";

const TOP_PAIRS: usize = 3;
const RANKED_ENTITIES: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrixData {
    pub metrics: Vec<String>,
    pub matrix: Vec<Vec<CorrelationResult>>,
    pub significant_pairs: Vec<CorrelationInsight>,
    pub top_positive: Vec<CorrelationInsight>,
    pub top_negative: Vec<CorrelationInsight>,
    /// Number of entities the matrix was computed over.
    pub sample_size: usize,
}

/// One value per risk level.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskLevelBreakdown<T> {
    pub low: T,
    pub medium: T,
    pub high: T,
    pub very_high: T,
}

impl<T> RiskLevelBreakdown<T> {
    fn get_mut(&mut self, level: RiskLevel) -> &mut T {
        match level {
            RiskLevel::Low => &mut self.low,
            RiskLevel::Medium => &mut self.medium,
            RiskLevel::High => &mut self.high,
            RiskLevel::VeryHigh => &mut self.very_high,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Quartiles {
    pub q1: f64,
    pub q2: f64,
    pub q3: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkRiskDistribution {
    pub total_entities: usize,
    pub counts: RiskLevelBreakdown<usize>,
    /// Sums to 100 for a non-empty network.
    pub percentages: RiskLevelBreakdown<f64>,
    pub mean_risk_score: f64,
    pub median_risk_score: f64,
    pub std_dev_risk_score: f64,
    pub quartiles: Quartiles,
}

impl NetworkRiskDistribution {
    pub fn from_scores(scores: &[f64]) -> Self {
        let mut counts = RiskLevelBreakdown::<usize>::default();
        for score in scores {
            *counts.get_mut(RiskLevel::from_score(*score)) += 1;
        }

        let total = scores.len();
        let share = |count: usize| {
            if total == 0 {
                0.0
            } else {
                count as f64 / total as f64 * 100.0
            }
        };
        let percentages = RiskLevelBreakdown {
            low: share(counts.low),
            medium: share(counts.medium),
            high: share(counts.high),
            very_high: share(counts.very_high),
        };

        Self {
            total_entities: total,
            counts,
            percentages,
            mean_risk_score: stats::mean(scores),
            median_risk_score: stats::median(scores),
            std_dev_risk_score: stats::std_dev(scores),
            quartiles: Quartiles {
                q1: stats::percentile(scores, 25.0),
                q2: stats::percentile(scores, 50.0),
                q3: stats::percentile(scores, 75.0),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedEntity {
    pub entity_id: String,
    pub sharpe_ratio: f64,
    pub interpretation: SharpeInterpretation,
    pub risk_score: f64,
    pub risk_level: RiskLevel,
    pub network_rank: usize,
}

impl From<&RiskProfile> for RankedEntity {
    fn from(profile: &RiskProfile) -> Self {
        Self {
            entity_id: profile.entity_id.clone(),
            sharpe_ratio: profile.risk_adjusted.sharpe_ratio,
            interpretation: profile.risk_adjusted.interpretation,
            risk_score: profile.risk_score,
            risk_level: profile.risk_level,
            network_rank: profile.risk_adjusted.network_rank,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkQuantSummary {
    pub generated_at: DateTime<Utc>,
    pub entity_count: usize,
    pub correlations: CorrelationMatrixData,
    /// Significant pairs with the largest |r|.
    pub strongest_correlations: Vec<CorrelationInsight>,
    pub risk_distribution: NetworkRiskDistribution,
    pub average_sharpe_ratio: f64,
    /// Best Sharpe-like ratios, best first.
    pub top_performers: Vec<RankedEntity>,
    /// Worst Sharpe-like ratios, worst first.
    pub bottom_performers: Vec<RankedEntity>,
}

fn metric_column(network: &[EntitySnapshot], metric: &str) -> Vec<f64> {
    network
        .iter()
        .map(|e| match metric {
            MetricHistory::PERFORMANCE => e.performance_score,
            MetricHistory::UPTIME => e.uptime_pct,
            MetricHistory::LATENCY => e.avg_latency_ms,
            MetricHistory::STORAGE_UTILIZATION => e.storage_utilization_pct,
            _ => e.capacity_bytes,
        })
        .collect()
}

impl Analyzer {
    /// Correlates the snapshot metrics across all entities.
    pub fn network_correlation_matrix(&self, network: &[EntitySnapshot]) -> CorrelationMatrixData {
        let series: Vec<(String, Vec<f64>)> = NETWORK_METRICS
            .iter()
            .map(|m| (m.to_string(), metric_column(network, m)))
            .collect();
        let matrix = self.analytics.correlation_matrix(&series);

        let insights = |pairs: Vec<CorrelationPair>| -> Vec<CorrelationInsight> {
            pairs.into_iter().map(CorrelationInsight::from).collect()
        };

        CorrelationMatrixData {
            significant_pairs: insights(matrix.significant_pairs()),
            top_positive: insights(matrix.top_positive(TOP_PAIRS)),
            top_negative: insights(matrix.top_negative(TOP_PAIRS)),
            metrics: matrix.metrics,
            matrix: matrix.matrix,
            sample_size: network.len(),
        }
    }

    /// Buckets every entity's risk score.
    pub fn network_risk_distribution(&self, network: &[EntitySnapshot]) -> NetworkRiskDistribution {
        let scores: Vec<f64> = self
            .network_metrics(network)
            .iter()
            .map(|m| m.risk_score)
            .collect();
        NetworkRiskDistribution::from_scores(&scores)
    }

    /// Folds correlations, risk distribution and Sharpe rankings into one snapshot.
    pub fn network_quant_summary(&self, network: &[EntitySnapshot]) -> NetworkQuantSummary {
        tracing::info!(entities = network.len(), "Computing network quant summary.");

        let profiles = self.risk_profiles(network);
        let scores: Vec<f64> = profiles.iter().map(|p| p.risk_score).collect();
        let ratios: Vec<f64> = profiles.iter().map(|p| p.risk_adjusted.sharpe_ratio).collect();

        let mut ranked: Vec<RankedEntity> = profiles.iter().map(RankedEntity::from).collect();
        ranked.sort_by(|a, b| {
            b.sharpe_ratio
                .partial_cmp(&a.sharpe_ratio)
                .unwrap_or(Ordering::Equal)
        });
        let top_performers: Vec<RankedEntity> =
            ranked.iter().take(RANKED_ENTITIES).cloned().collect();
        let bottom_performers: Vec<RankedEntity> =
            ranked.iter().rev().take(RANKED_ENTITIES).cloned().collect();

        let correlations = self.network_correlation_matrix(network);
        let mut strongest = correlations.significant_pairs.clone();
        strongest.sort_by(|a, b| {
            b.coefficient
                .abs()
                .partial_cmp(&a.coefficient.abs())
                .unwrap_or(Ordering::Equal)
        });
        strongest.truncate(TOP_PAIRS);

        NetworkQuantSummary {
            generated_at: Utc::now(),
            entity_count: network.len(),
            correlations,
            strongest_correlations: strongest,
            risk_distribution: NetworkRiskDistribution::from_scores(&scores),
            average_sharpe_ratio: stats::mean(&ratios),
            top_performers,
            bottom_performers,
        }
    }
}
