//! Process configuration shared by chartdesk binaries

use crate::logging::{LogConfig, LogFormat};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while reading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application name
    pub app_name: String,
    /// Environment (development, production, etc.)
    pub environment: String,
    /// Tracing subscriber settings
    pub log: LogConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: "chartdesk".to_string(),
            environment: "development".to_string(),
            log: LogConfig::default(),
        }
    }
}

impl Config {
    /// Build a configuration from `CHARTDESK_*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup.
    ///
    /// Recognised keys: `CHARTDESK_ENV`, `CHARTDESK_LOG_LEVEL`, `CHARTDESK_LOG_FORMAT`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(env) = lookup("CHARTDESK_ENV") {
            config.environment = env;
        }

        if let Some(level) = lookup("CHARTDESK_LOG_LEVEL") {
            config.log.level = level;
        }

        if let Some(format) = lookup("CHARTDESK_LOG_FORMAT") {
            config.log.format = format.parse::<LogFormat>().map_err(|_| ConfigError::InvalidValue {
                key: "CHARTDESK_LOG_FORMAT".to_string(),
                value: format.clone(),
            })?;
        }

        Ok(config)
    }

    /// Whether the process runs in a production environment
    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }
}
