use crate::correlation::{correlation_matrix, pearson_correlation};
use crate::regression::{linear_regression, predict_with_confidence};
use crate::report::{
    CorrelationMatrix, CorrelationResult, ForecastDomain, PredictionInterval, RegressionResult,
    TrendAnalysis, TrendForecast,
};
use crate::trend::{analyze_trend, generate_trend_forecast};
use configuration::{StatisticsSettings, TrendSettings};
use core_types::TimeSeriesPoint;

/// A stateless calculator for correlation, regression and trend analysis.
///
/// It only carries the policy parameters it was built with, so one instance
/// can be shared freely across threads.
#[derive(Debug, Clone, Default)]
pub struct AnalyticsEngine {
    statistics: StatisticsSettings,
    trend: TrendSettings,
}

impl AnalyticsEngine {
    pub fn new(statistics: StatisticsSettings, trend: TrendSettings) -> Self {
        Self { statistics, trend }
    }

    pub fn statistics(&self) -> &StatisticsSettings {
        &self.statistics
    }

    pub fn trend_settings(&self) -> &TrendSettings {
        &self.trend
    }

    pub fn correlation(&self, x: &[f64], y: &[f64]) -> CorrelationResult {
        pearson_correlation(x, y, self.statistics.significance_level)
    }

    pub fn correlation_matrix(&self, series: &[(String, Vec<f64>)]) -> CorrelationMatrix {
        correlation_matrix(series, self.statistics.significance_level)
    }

    pub fn regression(&self, x: &[f64], y: &[f64]) -> RegressionResult {
        linear_regression(x, y, self.statistics.confidence_level)
    }

    pub fn predict(
        &self,
        regression: &RegressionResult,
        x_new: f64,
        x_data: &[f64],
    ) -> PredictionInterval {
        predict_with_confidence(regression, x_new, x_data, self.statistics.confidence_level)
    }

    pub fn trend(&self, values: &[f64]) -> TrendAnalysis {
        analyze_trend(values, &self.trend, &self.statistics)
    }

    /// Forecasts `days_ahead` days, defaulting to the configured horizon.
    pub fn forecast(
        &self,
        history: &[TimeSeriesPoint],
        days_ahead: Option<usize>,
        metric_name: &str,
        domain: ForecastDomain,
    ) -> TrendForecast {
        generate_trend_forecast(
            history,
            days_ahead.unwrap_or(self.trend.forecast_days),
            metric_name,
            domain,
            &self.trend,
            &self.statistics,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::TrendDirection;

    #[test]
    fn significance_level_comes_from_settings() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let y = [1.2, 1.9, 3.4, 3.8, 5.3, 5.9];

        let lenient = AnalyticsEngine::default();
        assert!(lenient.correlation(&x, &y).significant);

        let strict = AnalyticsEngine::new(
            StatisticsSettings {
                significance_level: 1e-12,
                ..StatisticsSettings::default()
            },
            TrendSettings::default(),
        );
        assert!(!strict.correlation(&x, &y).significant);
    }

    #[test]
    fn regression_and_trend_use_configured_levels() {
        let x = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [10.0, 11.8, 14.1, 16.0, 17.9, 20.2];
        let engine = AnalyticsEngine::new(
            StatisticsSettings {
                confidence_level: 0.99,
                ..StatisticsSettings::default()
            },
            TrendSettings::default(),
        );

        let r = engine.regression(&x, &y);
        assert_eq!(r.confidence_level, engine.statistics().confidence_level);
        assert!(r.slope > 1.9 && r.slope < 2.1);

        let near = engine.predict(&r, 6.0, &x);
        assert!(near.lower <= near.predicted && near.predicted <= near.upper);
        let loose = AnalyticsEngine::default().predict(&r, 6.0, &x);
        assert!(near.upper - near.lower > loose.upper - loose.lower);

        let t = engine.trend(&y);
        assert_eq!(t.direction, TrendDirection::Up);
        assert!(t.significant);
    }

    #[test]
    fn forecast_uses_configured_horizon() {
        let history: Vec<TimeSeriesPoint> = (0..5)
            .map(|i| TimeSeriesPoint::new(i, 80.0 + i as f64))
            .collect();
        let engine = AnalyticsEngine::default();
        let f = engine.forecast(&history, None, "performance", ForecastDomain::Percentage);
        assert_eq!(f.predictions.len(), engine.trend_settings().forecast_days);
        let f = engine.forecast(&history, Some(2), "performance", ForecastDomain::Percentage);
        assert_eq!(f.predictions.len(), 2);
    }
}
