//! # Retrieval Configuration
//!
//! Configuration for retrieval sessions and the session registry.

use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use thiserror::Error;

/// Default number of concurrently outstanding segment Interests.
pub const DEFAULT_WINDOW_SIZE: usize = 8;

/// Default idle time after which a session is swept.
pub const DEFAULT_STALE_AFTER: Duration = Duration::from_secs(30);

/// Default period of the staleness sweep.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(5);

/// Default number of content handlers allowed to run at once.
pub const DEFAULT_HANDLER_WORKERS: usize = 4;

/// Configuration validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Window size must be at least 1")]
    ZeroWindow,

    #[error("Handler worker count must be at least 1")]
    ZeroWorkers,

    #[error("{field} must be non-zero")]
    ZeroDuration { field: &'static str },

    #[error("Invalid value for {var}: {value:?}")]
    InvalidEnv { var: &'static str, value: String },
}

/// Retrieval configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Segment Interests kept in flight per session.
    pub window_size: usize,
    /// Idle time after which the registry cancels a session.
    pub stale_after: Duration,
    /// How often the registry looks for stale sessions.
    pub sweep_interval: Duration,
    /// Content handlers allowed to run concurrently.
    pub handler_workers: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            stale_after: DEFAULT_STALE_AFTER,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
            handler_workers: DEFAULT_HANDLER_WORKERS,
        }
    }
}

impl RetrievalConfig {
    /// Create a config for testing (small window, short timeouts).
    pub fn for_testing() -> Self {
        Self {
            window_size: 4,
            stale_after: Duration::from_millis(200),
            sweep_interval: Duration::from_millis(20),
            handler_workers: 2,
        }
    }

    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `CCN_WINDOW_SIZE`: Outstanding segment Interests (default: 8)
    /// - `CCN_STALE_AFTER_MS`: Idle time before sweeping (default: 30000)
    /// - `CCN_SWEEP_INTERVAL_MS`: Sweep period (default: 5000)
    /// - `CCN_HANDLER_WORKERS`: Concurrent content handlers (default: 4)
    ///
    /// Unset variables keep their defaults; unparsable ones are an error.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Self {
            window_size: env_parse("CCN_WINDOW_SIZE")?.unwrap_or(defaults.window_size),
            stale_after: env_parse("CCN_STALE_AFTER_MS")?
                .map(Duration::from_millis)
                .unwrap_or(defaults.stale_after),
            sweep_interval: env_parse("CCN_SWEEP_INTERVAL_MS")?
                .map(Duration::from_millis)
                .unwrap_or(defaults.sweep_interval),
            handler_workers: env_parse("CCN_HANDLER_WORKERS")?.unwrap_or(defaults.handler_workers),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_size == 0 {
            return Err(ConfigError::ZeroWindow);
        }
        if self.handler_workers == 0 {
            return Err(ConfigError::ZeroWorkers);
        }
        if self.stale_after.is_zero() {
            return Err(ConfigError::ZeroDuration { field: "stale_after" });
        }
        if self.sweep_interval.is_zero() {
            return Err(ConfigError::ZeroDuration { field: "sweep_interval" });
        }
        Ok(())
    }

    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    pub fn with_stale_after(mut self, stale_after: Duration) -> Self {
        self.stale_after = stale_after;
        self
    }

    pub fn with_sweep_interval(mut self, sweep_interval: Duration) -> Self {
        self.sweep_interval = sweep_interval;
        self
    }

    pub fn with_handler_workers(mut self, handler_workers: usize) -> Self {
        self.handler_workers = handler_workers;
        self
    }
}

fn env_parse<T: std::str::FromStr>(var: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(var) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidEnv { var, value }),
        Err(_) => Ok(None),
    }
}
