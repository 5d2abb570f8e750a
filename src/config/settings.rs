use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::error::{ConfigError, Result};

use super::{LoggingConfig, PortfolioConfig, QrConfig, ReconnectionConfig, TelegramConfig};

/// Main application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub qr: QrConfig,
    #[serde(default)]
    pub portfolio: PortfolioConfig,
    #[serde(default)]
    pub reconnection: ReconnectionConfig,
}

impl Config {
    /// Load and validate a configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse(&content)
    }

    /// Like [`Config::load`], but a missing file yields the defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            info!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Parse and validate configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.qr.box_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "box_size",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }

        let portfolio = &self.portfolio;
        if portfolio.period.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "period" }.into());
        }
        if portfolio.interval.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "interval" }.into());
        }
        if portfolio.cache_ttl_hours == 0 {
            return Err(ConfigError::InvalidValue {
                field: "cache_ttl_hours",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if !(0.0..=100.0).contains(&portfolio.default_ter) {
            return Err(ConfigError::InvalidValue {
                field: "default_ter",
                reason: "must be a percentage between 0 and 100".to_string(),
            }
            .into());
        }

        let reconnection = &self.reconnection;
        if reconnection.initial_delay_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "initial_delay_ms",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if reconnection.max_delay_ms < reconnection.initial_delay_ms {
            return Err(ConfigError::InvalidValue {
                field: "max_delay_ms",
                reason: "must be >= initial_delay_ms".to_string(),
            }
            .into());
        }
        let multiplier = reconnection.backoff_multiplier;
        if multiplier.is_nan() || multiplier < 1.0 {
            return Err(ConfigError::InvalidValue {
                field: "backoff_multiplier",
                reason: "must be >= 1.0".to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Initialize logging with the configured settings.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}
