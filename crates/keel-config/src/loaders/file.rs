use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::debug;

use crate::{Loader, LoaderError, Map, Structure, Value};

/// Supported configuration file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// JSON.
    Json,
    /// TOML.
    Toml,
}

impl Format {
    /// Determines the format from a file extension.
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError::UnsupportedFormat`] for unknown extensions.
    pub fn from_path(path: &Path) -> Result<Self, LoaderError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);

        match extension.as_deref() {
            Some("toml") => Ok(Self::Toml),
            Some("json") => Ok(Self::Json),
            _ => Err(LoaderError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Parses `content` in this format.
    ///
    /// # Errors
    ///
    /// Returns the format's parse error.
    pub fn parse(self, content: &str) -> Result<Value, LoaderError> {
        match self {
            Self::Toml => {
                let table: toml::Table = toml::from_str(content)?;
                Ok(Value::from(toml::Value::Table(table)))
            }
            Self::Json => {
                let parsed: serde_json::Value = serde_json::from_str(content)?;
                Ok(Value::from(parsed))
            }
        }
    }
}

impl FromStr for Format {
    type Err = LoaderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "toml" => Ok(Self::Toml),
            "json" => Ok(Self::Json),
            _ => Err(LoaderError::UnsupportedFormat(s.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
enum Source {
    Path {
        path: PathBuf,
        format: Option<Format>,
    },
    Inline {
        label: String,
        content: String,
        format: Format,
    },
}

/// Loads a TOML or JSON document.
///
/// The file is read on every load. The format comes from the extension
/// unless set with [`with_format`](Self::with_format).
///
/// # Example
///
/// ```no_run
/// use keel_config::loaders::FileLoader;
/// use keel_config::{types::Any, Config, Structure};
///
/// # fn main() -> Result<(), keel_config::ConfigError> {
/// let settings = Config::new()
///     .with_structure(Structure::new().with("name", Any))
///     .with_loader(FileLoader::new("defaults.toml"))
///     .with_loader(FileLoader::new("local.json").optional())
///     .load()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct FileLoader {
    source: Source,
    optional: bool,
}

impl FileLoader {
    /// Loads the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            source: Source::Path {
                path: path.into(),
                format: None,
            },
            optional: false,
        }
    }

    /// Parses in-memory `content` as `format`.
    pub fn from_string(content: impl Into<String>, format: Format) -> Self {
        Self {
            source: Source::Inline {
                label: "inline".to_string(),
                content: content.into(),
                format,
            },
            optional: false,
        }
    }

    /// Overrides format detection.
    #[must_use]
    pub fn with_format(mut self, format: Format) -> Self {
        match &mut self.source {
            Source::Path { format: slot, .. } => *slot = Some(format),
            Source::Inline { format: slot, .. } => *slot = format,
        }
        self
    }

    /// Treats a missing file as an empty mapping.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    fn read(&self, path: &Path, format: Option<Format>) -> Result<Value, LoaderError> {
        if !path.exists() {
            if self.optional {
                debug!(path = %path.display(), "optional configuration file missing");
                return Ok(Value::Map(Map::new()));
            }
            return Err(LoaderError::file_not_found(path));
        }

        let content =
            fs::read_to_string(path).map_err(|e| LoaderError::read_error(path, e))?;
        let format = match format {
            Some(format) => format,
            None => Format::from_path(path)?,
        };
        debug!(path = %path.display(), ?format, "read configuration file");
        format.parse(&content)
    }
}

impl Loader for FileLoader {
    fn name(&self) -> String {
        match &self.source {
            Source::Path { path, .. } => format!("file({})", path.display()),
            Source::Inline { label, .. } => format!("string({label})"),
        }
    }

    fn load(&self, _structure: &Structure) -> Result<Value, LoaderError> {
        match &self.source {
            Source::Path { path, format } => self.read(path, *format),
            Source::Inline { content, format, .. } => format.parse(content),
        }
    }
}
