//! Telemetry error types.

use thiserror::Error;

/// Errors that can occur while setting up telemetry.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// Failed to initialize logging.
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    /// The logging settings could not be loaded.
    #[error("Invalid logging configuration: {0}")]
    InvalidConfig(#[from] keel_config::ConfigError),
}
