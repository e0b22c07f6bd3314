//! Application configuration from the environment

use std::path::PathBuf;

use layercake_config::{ConfigError, DecoratorConfig};

/// Where the flattened cake is written when `LAYERCAKE_OUT` is unset
const DEFAULT_OUTPUT: &str = "cake.png";

/// Runtime settings of the headless decorator
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Decorator config file (`LAYERCAKE_CONFIG`); defaults apply if unset
    pub config_path: Option<PathBuf>,
    /// Export target (`LAYERCAKE_OUT`)
    pub output: PathBuf,
}

impl AppConfig {
    /// Read LAYERCAKE_CONFIG and LAYERCAKE_OUT
    pub fn from_env() -> Self {
        Self::from_vars(
            std::env::var("LAYERCAKE_CONFIG").ok(),
            std::env::var("LAYERCAKE_OUT").ok(),
        )
    }

    fn from_vars(config: Option<String>, output: Option<String>) -> Self {
        Self {
            config_path: config.filter(|s| !s.is_empty()).map(PathBuf::from),
            output: output
                .filter(|s| !s.is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
        }
    }

    /// Load the decorator config, falling back to defaults
    pub fn decorator(&self) -> Result<DecoratorConfig, ConfigError> {
        match &self.config_path {
            Some(path) => DecoratorConfig::load(path),
            None => Ok(DecoratorConfig::default()),
        }
    }
}
