//! # Keel
//!
//! **Schema-driven configuration aggregation**
//!
//! Keel merges configuration from an ordered list of sources into one
//! validated mapping, driven by a declared schema:
//!
//! - **Declared keys** - a [`Structure`] names every key and its [`Type`](types::Type)
//! - **Layered sources** - files, environment variables, dotenv files and closures
//! - **Typed merging** - each type decides how a later value combines with an earlier one
//! - **One-pass validation** - every failure is reported together, keyed by setting
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use keel::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let structure = Structure::new()
//!         .with("listen", Str.required())
//!         .with("workers", Integer::new().min(1).with_default(4));
//!
//!     let settings = Config::new()
//!         .with_structure(structure)
//!         .with_loader(FileLoader::new("service.toml"))
//!         .with_loader(EnvLoader::new("SERVICE"))
//!         .load()?;
//!
//!     let log = LogConfig::from_env("SERVICE_LOG")?;
//!     keel::telemetry::init_logging(&log)?;
//!
//!     tracing::info!(listen = ?settings.get_str("listen"), "starting");
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline
//!
//! ```text
//! Loader 1 ─┐
//! Loader 2 ─┼→ filter to declared keys → convert → merge → validate → Settings
//! Loader N ─┘
//! ```

#![doc(html_root_url = "https://docs.rs/keel/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export the pipeline
pub use keel_config::{
    Config, ConfigError, ErrorRecorder, InvalidConfiguration, Loader, LoaderError, Map, Settings,
    Structure, Value,
};

// Re-export types and loaders
pub use keel_config::{loaders, types};

// Re-export logging setup
pub use keel_telemetry as telemetry;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust,ignore
/// use keel::prelude::*;
/// ```
pub mod prelude {
    pub use keel_config::{
        Config, ConfigError, ErrorRecorder, Loader, LoaderError, Settings, Structure, Value,
    };

    // Re-export built-in types
    pub use keel_config::types::{
        Any, Boolean, Choice, Float, Integer, List, MergePolicy, Nested, Str, Type, TypeExt,
    };

    // Re-export loaders
    pub use keel_config::loaders::{DotenvLoader, EnvLoader, FileLoader, Format, MapLoader};

    // Re-export logging setup
    pub use keel_telemetry::{init_logging, LogConfig, LogFormat, TelemetryError};
}
