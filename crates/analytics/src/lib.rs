//! # Analytics Engine
//!
//! Correlation, regression and trend analysis over plain metric series.
//!
//! ## Architectural Principles
//!
//! - **Pure logic:** no I/O and no state between calls. Inputs are slices,
//!   outputs are freshly built, serializable result structs.
//! - **Total functions:** short or constant series produce documented
//!   fallback results (zero correlation with p = 1, flat regression, neutral
//!   trend) rather than errors.
//!
//! ## Public API
//!
//! - `AnalyticsEngine`: convenience wrapper that applies configured
//!   confidence and significance levels.
//! - `correlation`, `regression`, `trend`: the underlying free functions.
//! - `report`: the result types.

pub mod correlation;
pub mod engine;
pub mod regression;
pub mod report;
pub mod trend;

pub use correlation::{correlation_matrix, pearson_correlation};
pub use engine::AnalyticsEngine;
pub use regression::{linear_regression, predict_with_confidence};
pub use report::{
    ConfidenceInterval, CorrelationMatrix, CorrelationPair, CorrelationResult, ForecastDomain,
    ForecastPoint, PredictionInterval, RegressionResult, TrendAnalysis, TrendForecast,
};
pub use trend::{analyze_trend, forecast_confidence, generate_trend_forecast};
