//! Structured logging setup.
//!
//! The logging settings are themselves declared as a keel [`Structure`], so
//! they can be layered from files and the environment like any other
//! configuration:
//!
//! ```rust,ignore
//! use keel_telemetry::{init_logging, LogConfig};
//!
//! let config = LogConfig::from_env("MYAPP_LOG")?;
//! init_logging(&config)?;
//!
//! tracing::info!(loader = "file(app.toml)", "configuration loaded");
//! ```

use std::str::FromStr;

use keel_config::loaders::EnvLoader;
use keel_config::types::{Boolean, Choice, MergePolicy, Str, TypeExt};
use keel_config::{Config, Settings, Structure};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::error::TelemetryError;
use crate::TelemetryResult;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// One JSON object per event.
    #[default]
    Json,
    /// Multi-line human-readable output.
    Pretty,
    /// Single-line human-readable output.
    Compact,
}

impl LogFormat {
    /// Name used in configuration sources.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Pretty => "pretty",
            Self::Compact => "compact",
        }
    }
}

impl FromStr for LogFormat {
    type Err = TelemetryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            other => Err(TelemetryError::LoggingInit(format!(
                "unknown log format: {other}"
            ))),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Whether logging is enabled.
    pub enabled: bool,

    /// Filter directives (e.g., "info", "keel_config=debug,warn").
    pub level: String,

    /// Output format.
    pub format: LogFormat,

    /// Whether to include span events (new, close).
    pub span_events: bool,

    /// Whether to include file/line info.
    pub file_line_info: bool,

    /// Whether to include thread IDs.
    pub thread_ids: bool,

    /// Whether to include target (module path).
    pub include_target: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: "info".to_string(),
            format: LogFormat::Json,
            span_events: false,
            file_line_info: false,
            thread_ids: false,
            include_target: true,
        }
    }
}

impl LogConfig {
    /// Creates a development configuration with human-readable output.
    #[must_use]
    pub fn development() -> Self {
        Self {
            level: "debug".to_string(),
            format: LogFormat::Pretty,
            span_events: true,
            file_line_info: true,
            ..Self::default()
        }
    }

    /// Creates a production configuration with JSON output.
    #[must_use]
    pub fn production() -> Self {
        Self::default()
    }

    /// The declared logging settings.
    ///
    /// Keys carry no defaults of their own: a key stays unset until a source
    /// supplies it, a later source that omits it keeps the earlier value, and
    /// [`LogConfig::from_settings`] falls back to [`LogConfig::default`].
    pub fn structure() -> Structure {
        let flag = || Boolean.merge_with(MergePolicy::PreferSet);

        Structure::new()
            .with("enabled", flag())
            .with("level", Str.merge_with(MergePolicy::PreferSet))
            .with(
                "format",
                Choice::new(["json", "pretty", "compact"])
                    .case_insensitive()
                    .merge_with(MergePolicy::PreferSet),
            )
            .with("span_events", flag())
            .with("file_line_info", flag())
            .with("thread_ids", flag())
            .with("include_target", flag())
    }

    /// Reads a configuration from settings loaded with [`LogConfig::structure`].
    ///
    /// Keys that are missing or unset keep their defaults.
    pub fn from_settings(settings: &Settings) -> Self {
        let defaults = Self::default();
        Self {
            enabled: settings.get_bool("enabled").unwrap_or(defaults.enabled),
            level: settings
                .get_str("level")
                .map_or(defaults.level, str::to_string),
            format: settings
                .get_str("format")
                .and_then(|format| format.parse().ok())
                .unwrap_or(defaults.format),
            span_events: settings
                .get_bool("span_events")
                .unwrap_or(defaults.span_events),
            file_line_info: settings
                .get_bool("file_line_info")
                .unwrap_or(defaults.file_line_info),
            thread_ids: settings
                .get_bool("thread_ids")
                .unwrap_or(defaults.thread_ids),
            include_target: settings
                .get_bool("include_target")
                .unwrap_or(defaults.include_target),
        }
    }

    /// Loads the logging settings through `config`'s loaders.
    ///
    /// # Errors
    ///
    /// Returns `TelemetryError::InvalidConfig` if loading or validation fails.
    pub fn from_config(mut config: Config) -> TelemetryResult<Self> {
        config.set_structure(Self::structure());
        let settings = config.load()?;
        Ok(Self::from_settings(&settings))
    }

    /// Loads the logging settings from `PREFIX__KEY` environment variables.
    ///
    /// # Errors
    ///
    /// Returns `TelemetryError::InvalidConfig` if a variable holds an invalid value.
    pub fn from_env(prefix: &str) -> TelemetryResult<Self> {
        Self::from_config(Config::new().with_loader(EnvLoader::new(prefix)))
    }
}

/// Initializes the logging subsystem.
///
/// # Errors
///
/// Returns `TelemetryError::LoggingInit` if the filter is invalid or a global
/// subscriber is already installed.
pub fn init_logging(config: &LogConfig) -> TelemetryResult<()> {
    if !config.enabled {
        return Ok(());
    }

    let filter = create_env_filter(&config.level)?;

    let span_events = if config.span_events {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let layer = match config.format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_span_events(span_events)
            .with_file(config.file_line_info)
            .with_line_number(config.file_line_info)
            .with_thread_ids(config.thread_ids)
            .with_target(config.include_target)
            .with_filter(filter)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .pretty()
            .with_span_events(span_events)
            .with_file(config.file_line_info)
            .with_line_number(config.file_line_info)
            .with_thread_ids(config.thread_ids)
            .with_target(config.include_target)
            .with_filter(filter)
            .boxed(),
        LogFormat::Compact => tracing_subscriber::fmt::layer()
            .compact()
            .with_span_events(span_events)
            .with_file(config.file_line_info)
            .with_line_number(config.file_line_info)
            .with_thread_ids(config.thread_ids)
            .with_target(config.include_target)
            .with_filter(filter)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(layer)
        .try_init()
        .map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;

    tracing::debug!(
        level = %config.level,
        format = config.format.as_str(),
        "logging initialized"
    );
    Ok(())
}

/// Creates an env filter from a string.
///
/// # Errors
///
/// Returns error if the filter string is invalid.
pub fn create_env_filter(filter: &str) -> TelemetryResult<EnvFilter> {
    EnvFilter::try_new(filter)
        .map_err(|e| TelemetryError::LoggingInit(format!("Invalid log level: {e}")))
}
