//! Configuration for stock analysis operations

use crate::error::{Result, StockError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for catalog loading and chart analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockConfig {
    /// Cache TTL for fetched price history
    pub cache_ttl_history: Duration,

    /// Maximum number of attempts for market data calls
    pub max_retries: u32,

    /// Initial backoff duration for retries
    pub retry_backoff_base: Duration,

    /// Upper bound for a whole analysis request
    pub request_timeout: Duration,

    /// Days of history fetched ahead of the lookback window.
    /// Zero means "as many as the slow moving average needs".
    pub warmup_days: u32,

    /// Ticker catalog JSON file; the built-in list is used when unset
    pub catalog_path: Option<PathBuf>,
}

impl Default for StockConfig {
    fn default() -> Self {
        Self {
            cache_ttl_history: Duration::from_secs(900), // 15 minutes
            max_retries: 3,
            retry_backoff_base: Duration::from_secs(1),
            request_timeout: Duration::from_secs(30),
            warmup_days: 0,
            catalog_path: None,
        }
    }
}

impl StockConfig {
    /// Create a new configuration builder
    pub fn builder() -> StockConfigBuilder {
        StockConfigBuilder::default()
    }

    /// Apply `CHARTDESK_CATALOG` and `CHARTDESK_REQUEST_TIMEOUT_SECS` from the environment
    pub fn with_env(self) -> Result<Self> {
        self.with_lookup(|key| std::env::var(key).ok())
    }

    fn with_lookup<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("CHARTDESK_CATALOG") {
            self.catalog_path = Some(PathBuf::from(path));
        }

        if let Some(secs) = lookup("CHARTDESK_REQUEST_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                StockError::ConfigError(format!(
                    "CHARTDESK_REQUEST_TIMEOUT_SECS must be a whole number of seconds, got '{secs}'"
                ))
            })?;
            self.request_timeout = Duration::from_secs(secs);
        }

        self.validate()?;
        Ok(self)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.max_retries == 0 {
            return Err(StockError::ConfigError(
                "max_retries must be greater than 0".to_string(),
            ));
        }

        if self.request_timeout.is_zero() {
            return Err(StockError::ConfigError(
                "request_timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Get retry backoff duration for attempt number, saturating on overflow
    pub fn retry_backoff(&self, attempt: u32) -> Duration {
        self.retry_backoff_base
            .saturating_mul(2_u32.saturating_pow(attempt))
    }

    /// Days of history to fetch before the lookback window for a given slow period
    pub fn warmup_for(&self, crossover_days: u32) -> u32 {
        if self.warmup_days == 0 {
            crossover_days
        } else {
            self.warmup_days
        }
    }
}

/// Builder for StockConfig
#[derive(Debug, Default)]
pub struct StockConfigBuilder {
    cache_ttl_history: Option<Duration>,
    max_retries: Option<u32>,
    retry_backoff_base: Option<Duration>,
    request_timeout: Option<Duration>,
    warmup_days: Option<u32>,
    catalog_path: Option<PathBuf>,
}

impl StockConfigBuilder {
    /// Set cache TTL for price history
    pub fn cache_ttl_history(mut self, duration: Duration) -> Self {
        self.cache_ttl_history = Some(duration);
        self
    }

    /// Set maximum retries
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = Some(retries);
        self
    }

    /// Set retry backoff base duration
    pub fn retry_backoff_base(mut self, duration: Duration) -> Self {
        self.retry_backoff_base = Some(duration);
        self
    }

    /// Set request timeout
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    /// Set a fixed warm-up window
    pub fn warmup_days(mut self, days: u32) -> Self {
        self.warmup_days = Some(days);
        self
    }

    /// Load the catalog from a JSON file instead of the built-in list
    pub fn catalog_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.catalog_path = Some(path.into());
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<StockConfig> {
        let defaults = StockConfig::default();

        let config = StockConfig {
            cache_ttl_history: self.cache_ttl_history.unwrap_or(defaults.cache_ttl_history),
            max_retries: self.max_retries.unwrap_or(defaults.max_retries),
            retry_backoff_base: self.retry_backoff_base.unwrap_or(defaults.retry_backoff_base),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            warmup_days: self.warmup_days.unwrap_or(defaults.warmup_days),
            catalog_path: self.catalog_path,
        };

        config.validate()?;
        Ok(config)
    }
}
