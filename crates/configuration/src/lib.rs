use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{
    BenchmarkSettings, Config, RiskSettings, RiskWeights, StatisticsSettings, TrendSettings,
};

/// Prefix for environment overrides, e.g. `NODEQUANT__RISK__ROLLING_WINDOW=14`.
pub const ENV_PREFIX: &str = "NODEQUANT";

/// Loads the engine policy parameters.
///
/// Defaults are always present; an optional TOML file and `NODEQUANT__*`
/// environment variables are layered on top. The result is validated before
/// it is returned.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let mut builder = config::Config::builder();

    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path).required(true));
    }

    let builder = builder
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?;

    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    tracing::debug!(?config, "Loaded engine configuration.");
    Ok(config)
}

/// Parses a configuration from an in-memory TOML document.
pub fn parse_config(toml: &str) -> Result<Config, ConfigError> {
    let config = config::Config::builder()
        .add_source(config::File::from_str(toml, config::FileFormat::Toml))
        .build()?
        .try_deserialize::<Config>()?;
    config.validate()?;
    Ok(config)
}
