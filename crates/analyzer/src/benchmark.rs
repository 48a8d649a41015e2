use crate::Analyzer;
use core_types::{EntitySnapshot, PerformanceRating};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// One metric of an entity set against the whole network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricBenchmark {
    pub value: f64,
    pub network_average: f64,
    pub network_median: f64,
    /// Raw rank of `value` in the network (0-100), not inverted for
    /// lower-is-better metrics.
    pub percentile: f64,
    pub z_score: f64,
    pub deviation_pct: f64,
    pub rating: PerformanceRating,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeerEntry {
    pub entity_id: String,
    pub performance_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkComparison {
    pub entity_id: String,
    pub performance: MetricBenchmark,
    pub uptime: MetricBenchmark,
    pub latency: MetricBenchmark,
    pub storage_utilization: MetricBenchmark,
    pub consistency: MetricBenchmark,
    pub overall_rating: PerformanceRating,
    pub overall_percentile: f64,
    /// Entities with a performance score close to this one, closest first.
    pub peer_group: Vec<PeerEntry>,
    /// 1-based position by performance score, best first.
    pub rank: usize,
    pub network_size: usize,
}

/// Compares `value` with `population`.
///
/// `higher_is_better = false` inverts the percentile before it is bucketed
/// into a rating, so the lowest latency rates as excellent.
pub fn benchmark_metric(value: f64, population: &[f64], higher_is_better: bool) -> MetricBenchmark {
    let network_average = stats::mean(population);
    let percentile = stats::percentile_rank(value, population);
    let effective = if higher_is_better {
        percentile
    } else {
        100.0 - percentile
    };
    let deviation_pct = if network_average != 0.0 {
        (value - network_average) / network_average.abs() * 100.0
    } else {
        0.0
    };

    MetricBenchmark {
        value,
        network_average,
        network_median: stats::median(population),
        percentile,
        z_score: stats::z_score(value, network_average, stats::std_dev(population)),
        deviation_pct,
        rating: PerformanceRating::from_percentile(effective),
    }
}

impl Analyzer {
    /// Benchmarks `entity` against every entity in `network`.
    ///
    /// When `network` does not contain `entity` it is added to the population
    /// before comparing.
    pub fn benchmark_comparison(
        &self,
        entity: &EntitySnapshot,
        network: &[EntitySnapshot],
    ) -> BenchmarkComparison {
        let mut population: Vec<&EntitySnapshot> = network.iter().collect();
        if !network.iter().any(|e| e.id == entity.id) {
            population.push(entity);
        }

        let column = |f: fn(&EntitySnapshot) -> f64| -> Vec<f64> {
            population.iter().map(|e| f(e)).collect()
        };
        let performance = column(|e| e.performance_score);
        let uptime = column(|e| e.uptime_pct);
        let latency = column(|e| e.avg_latency_ms);
        let storage = column(|e| e.storage_utilization_pct);
        let consistency: Vec<f64> = population
            .par_iter()
            .map(|e| self.risk.consistency(&e.performance_values()))
            .collect();
        let own_consistency = self.risk.consistency(&entity.performance_values());

        let performance = benchmark_metric(entity.performance_score, &performance, true);
        let uptime = benchmark_metric(entity.uptime_pct, &uptime, true);
        let latency = benchmark_metric(entity.avg_latency_ms, &latency, false);
        let storage_utilization = benchmark_metric(entity.storage_utilization_pct, &storage, true);
        let consistency = benchmark_metric(own_consistency, &consistency, true);

        let overall_percentile = stats::mean(&[
            performance.percentile,
            uptime.percentile,
            100.0 - latency.percentile,
            consistency.percentile,
        ]);

        let rank = 1 + population
            .iter()
            .filter(|e| e.performance_score > entity.performance_score)
            .count();

        BenchmarkComparison {
            entity_id: entity.id.clone(),
            overall_rating: PerformanceRating::from_percentile(overall_percentile),
            overall_percentile,
            peer_group: self.peer_group(entity, &population),
            rank,
            network_size: population.len(),
            performance,
            uptime,
            latency,
            storage_utilization,
            consistency,
        }
    }

    fn peer_group(&self, entity: &EntitySnapshot, population: &[&EntitySnapshot]) -> Vec<PeerEntry> {
        let band = self.benchmark.peer_band;
        let mut peers: Vec<&EntitySnapshot> = population
            .iter()
            .copied()
            .filter(|e| e.id != entity.id)
            .filter(|e| (e.performance_score - entity.performance_score).abs() <= band)
            .collect();
        peers.sort_by(|a, b| {
            let da = (a.performance_score - entity.performance_score).abs();
            let db = (b.performance_score - entity.performance_score).abs();
            da.partial_cmp(&db).unwrap_or(Ordering::Equal)
        });
        peers
            .into_iter()
            .take(self.benchmark.peer_group_limit)
            .map(|e| PeerEntry {
                entity_id: e.id.clone(),
                performance_score: e.performance_score,
            })
            .collect()
    }
}
