use analyzer::Analyzer;
use analyzer::network::NETWORK_METRICS;
use approx::assert_abs_diff_eq;
use configuration::Config;
use core_types::{EntitySnapshot, MetricHistory, TimeSeriesPoint};

const DAY_MS: i64 = 86_400_000;

/// Eight providers whose snapshot metrics move in lockstep with their index,
/// with performance histories that get noisier as the index grows.
fn network() -> Vec<EntitySnapshot> {
    (0..8)
        .map(|i| {
            let performance = 60.0 + 4.0 * i as f64;
            let history: Vec<TimeSeriesPoint> = (0..15)
                .map(|j| {
                    let wobble = ((j * 7 + i) % 5) as f64 * i as f64 * 0.8;
                    TimeSeriesPoint::new(j as i64 * DAY_MS, (performance - 5.0 + wobble).clamp(0.0, 100.0))
                })
                .collect();
            EntitySnapshot {
                id: format!("sp-{i}"),
                performance_score: performance,
                uptime_pct: 90.0 + i as f64,
                avg_latency_ms: 300.0 - 20.0 * i as f64,
                storage_utilization_pct: 50.0 + (i % 3) as f64 * 5.0,
                capacity_bytes: 1.0e12 * (1 + i % 2) as f64,
                history: Some(
                    MetricHistory::new().with_series(MetricHistory::PERFORMANCE, history),
                ),
            }
        })
        .collect()
}

fn analyzer() -> Analyzer {
    Analyzer::new(&Config::default()).unwrap()
}

#[test]
fn correlation_matrix_over_snapshot_metrics() {
    let data = analyzer().network_correlation_matrix(&network());

    assert_eq!(data.metrics, NETWORK_METRICS.map(String::from).to_vec());
    assert_eq!(data.sample_size, 8);
    for i in 0..NETWORK_METRICS.len() {
        assert_eq!(data.matrix[i][i].coefficient, 1.0);
        for j in 0..NETWORK_METRICS.len() {
            assert_eq!(data.matrix[i][j].coefficient, data.matrix[j][i].coefficient);
        }
    }

    // performance vs uptime, performance vs latency
    assert_abs_diff_eq!(data.matrix[0][1].coefficient, 1.0, epsilon = 1e-9);
    assert_abs_diff_eq!(data.matrix[0][2].coefficient, -1.0, epsilon = 1e-9);
    assert!(data.matrix[0][1].significant);

    assert!(data.top_positive.len() <= 3);
    assert!(data.top_negative[0].coefficient < -0.99);
    let perf_uptime = data
        .significant_pairs
        .iter()
        .find(|p| p.metric_a == "performance" && p.metric_b == "uptime")
        .expect("performance/uptime should be significant");
    assert!(perf_uptime.recommendation.is_some());
}

#[test]
fn risk_distribution_percentages_sum_to_hundred() {
    let d = analyzer().network_risk_distribution(&network());
    assert_eq!(d.total_entities, 8);
    let counts = d.counts.low + d.counts.medium + d.counts.high + d.counts.very_high;
    assert_eq!(counts, 8);
    let total =
        d.percentages.low + d.percentages.medium + d.percentages.high + d.percentages.very_high;
    assert_abs_diff_eq!(total, 100.0, epsilon = 1e-9);
    assert!(d.quartiles.q1 <= d.quartiles.q2 && d.quartiles.q2 <= d.quartiles.q3);
}

#[test]
fn quant_summary_ranks_by_sharpe_ratio() {
    let summary = analyzer().network_quant_summary(&network());
    assert_eq!(summary.entity_count, 8);
    assert_eq!(summary.top_performers.len(), 5);
    assert_eq!(summary.bottom_performers.len(), 5);

    assert!(summary
        .top_performers
        .windows(2)
        .all(|w| w[0].sharpe_ratio >= w[1].sharpe_ratio));
    assert!(summary
        .bottom_performers
        .windows(2)
        .all(|w| w[0].sharpe_ratio <= w[1].sharpe_ratio));
    assert_eq!(summary.top_performers[0].network_rank, 1);

    let ranked_ids: Vec<_> = summary
        .top_performers
        .iter()
        .chain(&summary.bottom_performers)
        .map(|e| e.entity_id.as_str())
        .collect();
    // With eight entities the two lists cover everyone.
    for i in 0..8 {
        assert!(ranked_ids.contains(&format!("sp-{i}").as_str()));
    }

    assert!(summary.strongest_correlations.len() <= 3);
    assert!(summary.strongest_correlations.iter().all(|c| c.significant));
}

#[test]
fn summary_serializes_with_snake_case_buckets() {
    let summary = analyzer().network_quant_summary(&network());
    let json = serde_json::to_value(&summary).unwrap();

    assert!(json["risk_distribution"]["counts"]["very_high"].is_u64());
    let level = json["top_performers"][0]["risk_level"].as_str().unwrap();
    assert!(["low", "medium", "high", "very_high"].contains(&level));
    assert!(json["correlations"]["matrix"][0][0]["strength"].as_str() == Some("strong"));
}

#[test]
fn empty_network_degrades_gracefully() {
    let summary = analyzer().network_quant_summary(&[]);
    assert_eq!(summary.entity_count, 0);
    assert!(summary.top_performers.is_empty());
    assert_eq!(summary.risk_distribution.total_entities, 0);
    assert_eq!(summary.correlations.matrix[0][1].p_value, 1.0);
    let diagonal = &summary.correlations.matrix[0][0];
    assert_eq!(diagonal.coefficient, 1.0);
    assert_eq!(diagonal.p_value, 1.0);
    assert!(!diagonal.significant);
    assert_eq!(diagonal.sample_size, 0);
    assert!(summary.correlations.significant_pairs.is_empty());
}

#[test]
fn per_entity_views_agree_with_network_views() {
    let analyzer = analyzer();
    let network = network();
    let profiles = analyzer.risk_profiles(&network);
    let single = analyzer.risk_profile(&network[3], &network);
    assert_eq!(single.risk_score, profiles[3].risk_score);
    assert_eq!(single.risk_adjusted.network_rank, profiles[3].risk_adjusted.network_rank);

    let cmp = analyzer.benchmark_comparison(&network[7], &network);
    assert_eq!(cmp.rank, 1);
    assert_eq!(cmp.network_size, 8);
    assert_eq!(cmp.performance.percentile, 100.0);
    assert_eq!(cmp.latency.percentile, 0.0);
}
