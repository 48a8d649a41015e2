//! # Aggregation Layer
//!
//! Turns entity snapshots and their histories into the published result
//! shapes: per-entity risk profiles and benchmarks, the network correlation
//! matrix, the network risk distribution and the network quant summary.
//!
//! `Analyzer` only holds its configuration. Every call builds its result from
//! the snapshots it is given and keeps nothing afterwards.

use analytics::AnalyticsEngine;
use configuration::{BenchmarkSettings, Config};
use risk::RiskCalculator;

pub mod benchmark;
pub mod error;
pub mod insights;
pub mod network;
pub mod profile;

pub use benchmark::{BenchmarkComparison, MetricBenchmark, PeerEntry, benchmark_metric};
pub use error::AnalyzerError;
pub use insights::CorrelationInsight;
pub use network::{
    CorrelationMatrixData, NetworkQuantSummary, NetworkRiskDistribution, Quartiles, RankedEntity,
    RiskLevelBreakdown,
};
pub use profile::{
    ConsistencyProfile, DrawdownProfile, RiskAdjustedPerformance, RiskProfile, VolatilityProfile,
};

/// The main aggregation engine.
#[derive(Debug, Clone)]
pub struct Analyzer {
    analytics: AnalyticsEngine,
    risk: RiskCalculator,
    benchmark: BenchmarkSettings,
}

impl Analyzer {
    pub fn new(config: &Config) -> Result<Self, AnalyzerError> {
        config.validate()?;
        Ok(Self {
            analytics: AnalyticsEngine::new(config.statistics.clone(), config.trend.clone()),
            risk: RiskCalculator::new(config.risk.clone())?,
            benchmark: config.benchmark.clone(),
        })
    }

    pub fn analytics(&self) -> &AnalyticsEngine {
        &self.analytics
    }
}
