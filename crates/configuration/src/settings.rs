use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// The root configuration structure for the analytics engine.
///
/// Every section falls back to its defaults, so an empty file (or no file at
/// all) is a valid configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub statistics: StatisticsSettings,
    pub risk: RiskSettings,
    pub trend: TrendSettings,
    pub benchmark: BenchmarkSettings,
}

impl Config {
    /// Rejects parameter combinations the engine cannot use.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.statistics.validate()?;
        self.risk.validate()?;
        self.trend.validate()?;
        self.benchmark.validate()?;
        Ok(())
    }
}

/// Parameters shared by the significance tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatisticsSettings {
    /// Confidence level for regression and forecast intervals.
    pub confidence_level: f64,
    /// p-value below which a correlation or slope counts as significant.
    pub significance_level: f64,
}

impl Default for StatisticsSettings {
    fn default() -> Self {
        Self {
            confidence_level: 0.95,
            significance_level: 0.05,
        }
    }
}

impl StatisticsSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.confidence_level > 0.0 && self.confidence_level < 1.0) {
            return Err(ConfigError::ValidationError(
                "statistics.confidence_level must be between 0 and 1".to_string(),
            ));
        }
        if !(self.significance_level > 0.0 && self.significance_level < 1.0) {
            return Err(ConfigError::ValidationError(
                "statistics.significance_level must be between 0 and 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Parameters for volatility, drawdown and risk-adjusted scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskSettings {
    /// Window size for the rolling standard deviation.
    pub rolling_window: usize,
    /// Periods per year used to annualize volatility. This is a
    /// trading-calendar convention applied regardless of sampling cadence.
    pub annualization_factor: f64,
    pub risk_free_rate: f64,
    /// Ratio reported when a series has zero variance and a positive excess return.
    pub zero_variance_sharpe: f64,
    /// Number of trailing points inspected for the consistency streak.
    pub streak_window: usize,
    /// Largest absolute point-to-point change that keeps a streak alive.
    pub streak_max_delta: f64,
    /// Recovery component used when the deepest drawdown never recovered.
    pub unrecovered_penalty: f64,
    pub weights: RiskWeights,
}

impl Default for RiskSettings {
    fn default() -> Self {
        Self {
            rolling_window: 7,
            annualization_factor: 252.0,
            risk_free_rate: 0.0,
            zero_variance_sharpe: 10.0,
            streak_window: 30,
            streak_max_delta: 10.0,
            unrecovered_penalty: 50.0,
            weights: RiskWeights::default(),
        }
    }
}

impl RiskSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.rolling_window == 0 {
            return Err(ConfigError::ValidationError(
                "risk.rolling_window must be greater than 0".to_string(),
            ));
        }
        if self.annualization_factor <= 0.0 {
            return Err(ConfigError::ValidationError(
                "risk.annualization_factor must be greater than 0".to_string(),
            ));
        }
        if self.streak_max_delta < 0.0 || self.unrecovered_penalty < 0.0 {
            return Err(ConfigError::ValidationError(
                "risk.streak_max_delta and risk.unrecovered_penalty must not be negative"
                    .to_string(),
            ));
        }
        self.weights.validate()
    }
}

/// Weights of the overall risk score. Must sum to 1.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskWeights {
    pub volatility: f64,
    pub drawdown: f64,
    pub recovery: f64,
}

impl Default for RiskWeights {
    fn default() -> Self {
        Self {
            volatility: 0.4,
            drawdown: 0.35,
            recovery: 0.25,
        }
    }
}

impl RiskWeights {
    fn validate(&self) -> Result<(), ConfigError> {
        let weights = [self.volatility, self.drawdown, self.recovery];
        if weights.iter().any(|w| *w < 0.0) {
            return Err(ConfigError::ValidationError(
                "risk.weights must not be negative".to_string(),
            ));
        }
        let total: f64 = weights.iter().sum();
        if (total - 1.0).abs() > 1e-6 {
            return Err(ConfigError::ValidationError(format!(
                "risk.weights must sum to 1.0, got {}",
                total
            )));
        }
        Ok(())
    }
}

/// Parameters for trend detection and forecasting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendSettings {
    /// Minimum absolute slope (value units per step) for an up/down call.
    /// Not scaled to the data; tune it per metric.
    pub slope_threshold: f64,
    /// Slope p-value below which a direction is reported.
    pub direction_p_value: f64,
    pub forecast_days: usize,
    /// Linear decay of per-point forecast confidence per day of horizon.
    pub horizon_decay: f64,
}

impl Default for TrendSettings {
    fn default() -> Self {
        Self {
            slope_threshold: 0.1,
            direction_p_value: 0.1,
            forecast_days: 7,
            horizon_decay: 0.05,
        }
    }
}

impl TrendSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.slope_threshold < 0.0 {
            return Err(ConfigError::ValidationError(
                "trend.slope_threshold must not be negative".to_string(),
            ));
        }
        if !(self.direction_p_value > 0.0 && self.direction_p_value <= 1.0) {
            return Err(ConfigError::ValidationError(
                "trend.direction_p_value must be in (0, 1]".to_string(),
            ));
        }
        if !(0.0..1.0).contains(&self.horizon_decay) {
            return Err(ConfigError::ValidationError(
                "trend.horizon_decay must be in [0, 1)".to_string(),
            ));
        }
        Ok(())
    }
}

/// Parameters for peer benchmarking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchmarkSettings {
    /// Maximum performance-score distance for an entity to count as a peer.
    pub peer_band: f64,
    pub peer_group_limit: usize,
}

impl Default for BenchmarkSettings {
    fn default() -> Self {
        Self {
            peer_band: 10.0,
            peer_group_limit: 5,
        }
    }
}

impl BenchmarkSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.peer_band < 0.0 {
            return Err(ConfigError::ValidationError(
                "benchmark.peer_band must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}
