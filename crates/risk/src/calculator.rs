use crate::consistency::{consistency_score, consistency_streak};
use crate::drawdown::{DrawdownAnalysis, calculate_drawdown};
use crate::error::RiskError;
use crate::sharpe::{SharpeRatio, calculate_sharpe_ratio};
use crate::volatility::{VolatilityMetrics, calculate_volatility};
use configuration::RiskSettings;

/// Applies the configured risk parameters to the metric functions.
#[derive(Debug, Clone)]
pub struct RiskCalculator {
    params: RiskSettings,
}

impl RiskCalculator {
    /// Creates a new `RiskCalculator` with the given configuration parameters.
    pub fn new(params: RiskSettings) -> Result<Self, RiskError> {
        // Validate that risk parameters are logical.
        if params.rolling_window == 0 {
            return Err(RiskError::InvalidParameters(
                "rolling_window must be greater than 0".to_string(),
            ));
        }
        if !(params.annualization_factor > 0.0) {
            return Err(RiskError::InvalidParameters(
                "annualization_factor must be greater than 0".to_string(),
            ));
        }
        if params.streak_window < 2 {
            return Err(RiskError::InvalidParameters(
                "streak_window must cover at least two points".to_string(),
            ));
        }
        Ok(Self { params })
    }

    pub fn volatility(&self, values: &[f64]) -> VolatilityMetrics {
        calculate_volatility(
            values,
            self.params.rolling_window,
            self.params.annualization_factor,
        )
    }

    pub fn drawdown(&self, values: &[f64]) -> DrawdownAnalysis {
        calculate_drawdown(values)
    }

    pub fn sharpe(&self, values: &[f64]) -> SharpeRatio {
        calculate_sharpe_ratio(
            values,
            self.params.risk_free_rate,
            self.params.zero_variance_sharpe,
        )
    }

    pub fn consistency(&self, values: &[f64]) -> f64 {
        consistency_score(values)
    }

    pub fn streak(&self, values: &[f64]) -> usize {
        consistency_streak(
            values,
            self.params.streak_window,
            self.params.streak_max_delta,
        )
    }

    /// Weighted 0-100 risk score; higher is riskier.
    ///
    /// Combines inverted volatility score, doubled max drawdown and a recovery
    /// component of ten points per step to recover. A drawdown that never
    /// recovered costs `unrecovered_penalty`; no drawdown at all costs nothing.
    pub fn risk_score(&self, volatility: &VolatilityMetrics, drawdown: &DrawdownAnalysis) -> f64 {
        let w = &self.params.weights;

        let vol_component = 100.0 - volatility.score;
        let drawdown_component = (drawdown.max_drawdown_pct * 2.0).min(100.0);
        let recovery_component = match drawdown.time_to_recovery {
            Some(steps) => (steps as f64 * 10.0).min(100.0),
            None if drawdown.max_drawdown_pct > 0.0 => self.params.unrecovered_penalty,
            None => 0.0,
        };

        let score = vol_component * w.volatility
            + drawdown_component * w.drawdown
            + recovery_component * w.recovery;
        tracing::trace!(vol_component, drawdown_component, recovery_component, score, "Risk score.");
        score.clamp(0.0, 100.0)
    }
}
