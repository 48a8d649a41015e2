use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("Risk settings rejected: {0}")]
    Risk(#[from] risk::RiskError),

    #[error("Configuration rejected: {0}")]
    Config(#[from] configuration::error::ConfigError),
}
