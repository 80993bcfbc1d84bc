//! Structured logging for applications built on keel.
//!
//! Installs a `tracing-subscriber` registry with an `EnvFilter` and JSON,
//! pretty or compact output. The logging settings are loaded through keel
//! itself, so they layer like any other configuration.
//!
//! The keel pipeline emits these events:
//!
//! | Event | Level | Fields |
//! |-------|-------|--------|
//! | loader invoked | `debug` | `loader` |
//! | key resolved | `trace` | `loader`, `key`, `kind` |
//! | no loaders registered | `warn` | `keys` |
//! | validation failed | `warn` | `error_count` |
//! | configuration loaded | `debug` | `keys`, `loaders` |
//!
//! # Example
//!
//! ```rust,ignore
//! use keel_telemetry::{init_logging, LogConfig};
//!
//! let config = LogConfig::from_env("MYAPP_LOG").unwrap_or_else(|_| LogConfig::development());
//! init_logging(&config)?;
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod logging;

pub use error::TelemetryError;
pub use logging::{create_env_filter, init_logging, LogConfig, LogFormat};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
