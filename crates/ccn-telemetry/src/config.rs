//! Telemetry configuration.

use serde::{Deserialize, Serialize};
use std::env;

/// Logging and metrics configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Service name attached to startup logs.
    pub service_name: String,
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub log_level: String,
    /// Write logs to stdout.
    pub console_output: bool,
    /// Emit JSON lines instead of human-readable output.
    pub json_logs: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "ccn-core".to_string(),
            log_level: "info".to_string(),
            console_output: true,
            json_logs: false,
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `CCN_SERVICE_NAME`: Service name (default: ccn-core)
    /// - `CCN_LOG_LEVEL` or `RUST_LOG`: Log level (default: info)
    /// - `CCN_CONSOLE_OUTPUT`: Enable console output (default: true)
    /// - `CCN_JSON_LOGS`: Enable JSON logs (default: false)
    pub fn from_env() -> Self {
        Self {
            service_name: env::var("CCN_SERVICE_NAME").unwrap_or_else(|_| "ccn-core".to_string()),

            log_level: env::var("CCN_LOG_LEVEL")
                .or_else(|_| env::var("RUST_LOG"))
                .unwrap_or_else(|_| "info".to_string()),

            console_output: env::var("CCN_CONSOLE_OUTPUT")
                .map(|v| v.to_lowercase() != "false" && v != "0")
                .unwrap_or(true),

            json_logs: env::var("CCN_JSON_LOGS")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(false),
        }
    }

    /// Quiet configuration for tests.
    pub fn for_testing() -> Self {
        Self {
            service_name: "ccn-test".to_string(),
            log_level: "warn".to_string(),
            console_output: false,
            json_logs: false,
        }
    }
}
