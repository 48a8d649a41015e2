use analytics::{ForecastDomain, TrendForecast};
use analyzer::{
    Analyzer, BenchmarkComparison, CorrelationMatrixData, MetricBenchmark, NetworkQuantSummary,
    NetworkRiskDistribution, RiskProfile,
};
use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use comfy_table::Table;
use core_types::{EntitySnapshot, MetricHistory};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// The main entry point for the node analytics CLI.
fn main() -> Result<()> {
    // Logs go to stderr so stdout stays machine-readable.
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();
    let config = configuration::load_config(cli.config.as_deref())
        .context("Failed to load engine configuration")?;
    let analyzer = Analyzer::new(&config)?;
    let network = load_snapshots(&cli.input)?;

    match cli.command {
        Commands::Summary => {
            let summary = analyzer.network_quant_summary(&network);
            emit(cli.format, &summary, render_summary)
        }
        Commands::Risk(args) => {
            let entity = find_entity(&network, &args.entity)?;
            let profile = analyzer.risk_profile(entity, &network);
            emit(cli.format, &profile, render_risk_profile)
        }
        Commands::Benchmark(args) => {
            let entity = find_entity(&network, &args.entity)?;
            let comparison = analyzer.benchmark_comparison(entity, &network);
            emit(cli.format, &comparison, render_benchmark)
        }
        Commands::Correlations => {
            let data = analyzer.network_correlation_matrix(&network);
            emit(cli.format, &data, render_correlations)
        }
        Commands::Distribution => {
            let distribution = analyzer.network_risk_distribution(&network);
            emit(cli.format, &distribution, render_distribution)
        }
        Commands::Forecast(args) => {
            let entity = find_entity(&network, &args.entity)?;
            let history = entity.series(&args.metric);
            if history.is_empty() {
                tracing::warn!(entity = %entity.id, metric = %args.metric, "No history for metric; forecast will be flat.");
            }
            let domain = if args.unbounded || args.metric == MetricHistory::LATENCY {
                ForecastDomain::Unbounded
            } else {
                ForecastDomain::Percentage
            };
            let forecast = analyzer
                .analytics()
                .forecast(history, args.days, &args.metric, domain);
            emit(cli.format, &forecast, render_forecast)
        }
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Quantitative analytics over storage-provider snapshots.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Optional TOML file overriding the engine's policy parameters.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// JSON file containing an array of entity snapshots.
    #[arg(long, global = true, default_value = "snapshots.json")]
    input: PathBuf,

    /// Output format.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Table,
}

#[derive(Subcommand)]
enum Commands {
    /// Network-wide correlations, risk distribution and Sharpe rankings.
    Summary,
    /// Risk profile of a single entity.
    Risk(EntityArgs),
    /// Benchmark a single entity against the network.
    Benchmark(EntityArgs),
    /// Correlation matrix of the snapshot metrics.
    Correlations,
    /// Distribution of risk levels across the network.
    Distribution,
    /// Forecast one history series of an entity.
    Forecast(ForecastArgs),
}

#[derive(Parser)]
struct EntityArgs {
    /// The entity id as it appears in the snapshot file.
    #[arg(long)]
    entity: String,
}

#[derive(Parser)]
struct ForecastArgs {
    #[arg(long)]
    entity: String,

    /// History series to forecast (e.g., "performance", "uptime").
    #[arg(long, default_value = MetricHistory::PERFORMANCE)]
    metric: String,

    /// Days to forecast; defaults to the configured horizon.
    #[arg(long)]
    days: Option<usize>,

    /// Skip clamping predictions to the 0-100 range.
    #[arg(long)]
    unbounded: bool,
}

// ==============================================================================
// Input
// ==============================================================================

/// Reads and validates the snapshot file. Invalid snapshots are skipped.
fn load_snapshots(path: &Path) -> Result<Vec<EntitySnapshot>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot file {}", path.display()))?;
    let snapshots: Vec<EntitySnapshot> = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse snapshot file {}", path.display()))?;

    let total = snapshots.len();
    let valid: Vec<EntitySnapshot> = snapshots
        .into_iter()
        .filter(|s| match s.validate() {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(entity = %s.id, error = %e, "Skipping invalid snapshot.");
                false
            }
        })
        .collect();

    tracing::info!(loaded = valid.len(), skipped = total - valid.len(), "Loaded snapshots.");
    Ok(valid)
}

fn find_entity<'a>(network: &'a [EntitySnapshot], id: &str) -> Result<&'a EntitySnapshot> {
    match network.iter().find(|e| e.id == id) {
        Some(entity) => Ok(entity),
        None => bail!("Entity '{}' not found in snapshot file", id),
    }
}

// ==============================================================================
// Output
// ==============================================================================

fn emit<T: Serialize>(format: OutputFormat, value: &T, render: fn(&T) -> Table) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Table => println!("{}", render(value)),
    }
    Ok(())
}

fn fmt2(v: f64) -> String {
    format!("{:.2}", v)
}

fn render_summary(summary: &NetworkQuantSummary) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Group", "Entity", "Sharpe", "Risk score", "Risk level", "Rank"]);
    let groups = [
        ("top", &summary.top_performers),
        ("bottom", &summary.bottom_performers),
    ];
    for (group, entities) in groups {
        for e in entities {
            table.add_row(vec![
                group.to_string(),
                e.entity_id.clone(),
                fmt2(e.sharpe_ratio),
                fmt2(e.risk_score),
                e.risk_level.to_string(),
                e.network_rank.to_string(),
            ]);
        }
    }
    for c in &summary.strongest_correlations {
        table.add_row(vec![
            "correlation".to_string(),
            format!("{} / {}", c.metric_a, c.metric_b),
            fmt2(c.coefficient),
            String::new(),
            String::new(),
            String::new(),
        ]);
    }
    table.add_row(vec![
        "network".to_string(),
        format!("{} entities", summary.entity_count),
        fmt2(summary.average_sharpe_ratio),
        fmt2(summary.risk_distribution.mean_risk_score),
        String::new(),
        String::new(),
    ]);
    table
}

fn render_risk_profile(profile: &RiskProfile) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Metric", "Value"]);
    let recovery = profile
        .drawdown
        .time_to_recovery
        .map(|d| d.to_string())
        .unwrap_or_else(|| "not recovered".to_string());
    let rows = [
        ("entity", profile.entity_id.clone()),
        ("risk score", fmt2(profile.risk_score)),
        ("risk level", profile.risk_level.to_string()),
        ("volatility score", fmt2(profile.volatility.score)),
        ("volatility percentile", fmt2(profile.volatility.percentile)),
        ("consistency score", fmt2(profile.consistency.score)),
        ("consistency streak", profile.consistency.streak.to_string()),
        ("sharpe ratio", fmt2(profile.risk_adjusted.sharpe_ratio)),
        ("sharpe rank", profile.risk_adjusted.network_rank.to_string()),
        ("max drawdown %", fmt2(profile.drawdown.max_drawdown_pct)),
        ("current drawdown %", fmt2(profile.drawdown.current_drawdown_pct)),
        ("days in drawdown", profile.drawdown.days_in_drawdown.to_string()),
        ("time to recovery", recovery),
    ];
    for (k, v) in rows {
        table.add_row(vec![k.to_string(), v]);
    }
    table
}

fn render_benchmark(cmp: &BenchmarkComparison) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Metric", "Value", "Average", "Median", "Percentile", "Z", "Rating"]);
    let rows: [(&str, &MetricBenchmark); 5] = [
        ("performance", &cmp.performance),
        ("uptime", &cmp.uptime),
        ("latency", &cmp.latency),
        ("storage utilization", &cmp.storage_utilization),
        ("consistency", &cmp.consistency),
    ];
    for (name, m) in rows {
        table.add_row(vec![
            name.to_string(),
            fmt2(m.value),
            fmt2(m.network_average),
            fmt2(m.network_median),
            fmt2(m.percentile),
            fmt2(m.z_score),
            m.rating.to_string(),
        ]);
    }
    table.add_row(vec![
        "overall".to_string(),
        format!("rank {}/{}", cmp.rank, cmp.network_size),
        String::new(),
        String::new(),
        fmt2(cmp.overall_percentile),
        String::new(),
        cmp.overall_rating.to_string(),
    ]);
    table
}

fn render_correlations(data: &CorrelationMatrixData) -> Table {
    let mut table = Table::new();
    let mut header = vec![String::new()];
    header.extend(data.metrics.iter().cloned());
    table.set_header(header);
    for (name, row) in data.metrics.iter().zip(&data.matrix) {
        let mut cells = vec![name.clone()];
        cells.extend(row.iter().map(|c| {
            let marker = if c.significant { "*" } else { "" };
            format!("{:.2}{}", c.coefficient, marker)
        }));
        table.add_row(cells);
    }
    table
}

fn render_distribution(d: &NetworkRiskDistribution) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Risk level", "Count", "Percent"]);
    let rows = [
        ("low", d.counts.low, d.percentages.low),
        ("medium", d.counts.medium, d.percentages.medium),
        ("high", d.counts.high, d.percentages.high),
        ("very_high", d.counts.very_high, d.percentages.very_high),
    ];
    for (level, count, pct) in rows {
        table.add_row(vec![level.to_string(), count.to_string(), fmt2(pct)]);
    }
    table.add_row(vec![
        "mean / median".to_string(),
        fmt2(d.mean_risk_score),
        fmt2(d.median_risk_score),
    ]);
    table
}

fn render_forecast(f: &TrendForecast) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Day", "Predicted", "Lower", "Upper", "Confidence"]);
    for p in &f.predictions {
        table.add_row(vec![
            p.day.to_string(),
            fmt2(p.predicted),
            fmt2(p.lower),
            fmt2(p.upper),
            fmt2(p.confidence),
        ]);
    }
    table.add_row(vec![
        format!("{} ({:?})", f.metric, f.trend.direction),
        fmt2(f.current_value),
        String::new(),
        format!("{:+.2}%", f.expected_change_pct),
        fmt2(f.confidence),
    ]);
    table
}
