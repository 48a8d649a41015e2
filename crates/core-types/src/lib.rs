//! Shared data model for the node analytics workspace.
//!
//! Every other crate depends on these types. Nothing in here performs
//! calculations beyond basic validation of the snapshots handed to us by the
//! data provider.

pub mod enums;
pub mod error;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::{
    CorrelationDirection, CorrelationStrength, PerformanceRating, Reliability, RiskLevel,
    SharpeInterpretation, TrendDirection, VolatilityTrend,
};
pub use error::CoreError;
pub use structs::{EntitySnapshot, MetricHistory, TimeSeriesPoint, series_values};
