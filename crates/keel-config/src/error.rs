//! Configuration error types.

use std::fmt;
use std::path::PathBuf;

use indexmap::IndexMap;
use thiserror::Error;

use crate::Settings;

/// Errors raised by structures and the load pipeline.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A mapping was required but something else was supplied.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        /// The expected kind.
        expected: &'static str,
        /// The kind that was supplied.
        found: &'static str,
    },

    /// A loader failed or returned something other than a mapping.
    #[error("loader `{loader}` failed: {reason}")]
    LoaderLoad {
        /// Name of the offending loader.
        loader: String,
        /// What went wrong.
        reason: String,
        /// Error reported by the loader itself, if any.
        #[source]
        source: Option<LoaderError>,
    },

    /// Validation recorded at least one error.
    #[error("{0}")]
    InvalidConfiguration(Box<InvalidConfiguration>),

    /// `load` was called before a structure was set.
    #[error("no structure defined for this configuration")]
    MissingStructure,
}

impl ConfigError {
    /// Create a new type mismatch error.
    pub fn type_mismatch(expected: &'static str, found: &'static str) -> Self {
        Self::TypeMismatch { expected, found }
    }

    /// Create a loader error for a loader that returned a non-mapping.
    pub fn loader_returned(loader: impl Into<String>, found: &'static str) -> Self {
        Self::LoaderLoad {
            loader: loader.into(),
            reason: format!("expected a mapping, found {found}"),
            source: None,
        }
    }

    /// Create a loader error wrapping the loader's own failure.
    pub fn loader_failed(loader: impl Into<String>, source: LoaderError) -> Self {
        Self::LoaderLoad {
            loader: loader.into(),
            reason: source.to_string(),
            source: Some(source),
        }
    }

    /// Create an invalid configuration error.
    pub fn invalid(settings: Settings, errors: IndexMap<String, Vec<String>>) -> Self {
        Self::InvalidConfiguration(Box::new(InvalidConfiguration { settings, errors }))
    }
}

/// A settings mapping that failed validation, with every recorded error.
#[derive(Debug, Clone, PartialEq)]
pub struct InvalidConfiguration {
    settings: Settings,
    errors: IndexMap<String, Vec<String>>,
}

impl InvalidConfiguration {
    /// The full settings mapping that was validated.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Messages grouped by key, in the order they were recorded.
    pub fn errors(&self) -> &IndexMap<String, Vec<String>> {
        &self.errors
    }

    /// Splits the error into the settings and the recorded errors.
    pub fn into_parts(self) -> (Settings, IndexMap<String, Vec<String>>) {
        (self.settings, self.errors)
    }
}

impl fmt::Display for InvalidConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid configuration:")?;
        for (key, messages) in &self.errors {
            for message in messages {
                write!(f, "\n  {key}: {message}")?;
            }
        }
        Ok(())
    }
}

/// Errors reported by loader implementations.
#[derive(Error, Debug)]
pub enum LoaderError {
    /// Configuration file not found.
    #[error("configuration file not found: {path}")]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// Failed to read configuration file.
    #[error("failed to read configuration file: {path}")]
    ReadError {
        /// Path to the file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// TOML parsing error.
    #[error("failed to parse TOML configuration: {0}")]
    TomlError(#[from] toml::de::Error),

    /// JSON parsing error.
    #[error("failed to parse JSON configuration: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Dotenv parsing error.
    #[error("failed to parse dotenv file: {0}")]
    DotenvError(#[from] dotenvy::Error),

    /// The file format could not be determined or is not supported.
    #[error("unsupported configuration format: {0}")]
    UnsupportedFormat(String),

    /// Any other loader failure.
    #[error("{0}")]
    Other(String),
}

impl LoaderError {
    /// Create a new file not found error.
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Create a new read error.
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Create a free-form loader error.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Value;
    use std::error::Error as _;

    #[test]
    fn test_type_mismatch_error() {
        let err = ConfigError::type_mismatch("map", "integer");
        assert_eq!(err.to_string(), "type mismatch: expected map, found integer");
    }

    #[test]
    fn test_loader_returned_error() {
        let err = ConfigError::loader_returned("file(config.json)", "list");
        assert!(err.to_string().contains("file(config.json)"));
        assert!(err.to_string().contains("expected a mapping, found list"));
        assert!(err.source().is_none());
    }

    #[test]
    fn test_loader_failed_keeps_source() {
        let err = ConfigError::loader_failed("env", LoaderError::other("boom"));
        assert!(err.to_string().contains("env"));
        assert!(err.to_string().contains("boom"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_invalid_configuration_lists_every_error() {
        let settings: Settings = [("port", Value::from("x"))].into_iter().collect();
        let mut errors = IndexMap::new();
        errors.insert("port".to_string(), vec!["expected integer".to_string()]);
        errors.insert("host".to_string(), vec!["is required".to_string()]);

        let err = ConfigError::invalid(settings, errors);
        let message = err.to_string();
        assert!(message.contains("port: expected integer"));
        assert!(message.contains("host: is required"));

        let ConfigError::InvalidConfiguration(invalid) = err else {
            panic!("expected InvalidConfiguration");
        };
        assert_eq!(invalid.errors().len(), 2);
        assert_eq!(invalid.settings().get_str("port"), Some("x"));
    }

    #[test]
    fn test_file_not_found_error() {
        let err = LoaderError::file_not_found("/path/to/config.toml");
        assert!(err.to_string().contains("/path/to/config.toml"));
    }
}
