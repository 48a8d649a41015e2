//! Risk metrics over a single metric series: volatility, drawdown,
//! Sharpe-like ratio and consistency.
//!
//! All functions are total; short series fall back to "no risk observed"
//! values instead of failing.

pub mod calculator;
pub mod consistency;
pub mod drawdown;
pub mod error;
pub mod sharpe;
pub mod volatility;

pub use calculator::RiskCalculator;
pub use consistency::{consistency_score, consistency_streak};
pub use drawdown::{DrawdownAnalysis, DrawdownEpisode, calculate_drawdown};
pub use error::RiskError;
pub use sharpe::{SharpeRatio, calculate_sharpe_ratio, sharpe_percentile};
pub use volatility::{VolatilityMetrics, calculate_volatility, volatility_score};
