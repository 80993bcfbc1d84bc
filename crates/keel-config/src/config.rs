//! The load pipeline.
//!
//! [`Config`] owns an ordered list of loaders and a shared [`Structure`].
//! Each [`Config::load`] is a fresh, deterministic fold over the loaders and
//! the declared keys:
//!
//! 1. every loader runs in registration order and must return a map;
//! 2. for every declared key, the loader's raw value is converted (or the
//!    type's default taken) and merged into the value accumulated so far;
//! 3. the result is validated and returned.
//!
//! Precedence is a per-key policy: the key's type decides through `merge`
//! whether a later loader replaces, combines with or ignores earlier values.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, trace, warn};

use crate::{ConfigError, ErrorRecorder, Loader, Settings, Structure, Value};

/// A structure plus the ordered loaders that populate it.
///
/// # Example
///
/// ```
/// use keel_config::loaders::{EnvLoader, MapLoader};
/// use keel_config::types::{Integer, Str, TypeExt};
/// use keel_config::{Config, Structure, Value};
///
/// let structure = Structure::new()
///     .with("host", Str.required())
///     .with("port", Integer::new().min(1).max(65535));
///
/// let settings = Config::new()
///     .with_structure(structure)
///     .with_loader(MapLoader::from_iter([("host", "localhost"), ("port", "80")]))
///     .with_loader(EnvLoader::from_vars("APP", [("APP__HOST", "example.com"), ("APP__PORT", "8080")]))
///     .load()
///     .unwrap();
///
/// assert_eq!(settings.get_str("host"), Some("example.com"));
/// assert_eq!(settings["port"], Value::from(8080));
/// ```
#[derive(Default)]
pub struct Config {
    structure: Option<Arc<Structure>>,
    loaders: Vec<Box<dyn Loader>>,
}

impl Config {
    /// Creates a configuration with no structure and no loaders.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the structure, builder style.
    #[must_use]
    pub fn with_structure(mut self, structure: impl Into<Arc<Structure>>) -> Self {
        self.set_structure(structure);
        self
    }

    /// Sets or replaces the structure.
    pub fn set_structure(&mut self, structure: impl Into<Arc<Structure>>) {
        self.structure = Some(structure.into());
    }

    /// The structure, if one was set.
    pub fn structure(&self) -> Option<&Arc<Structure>> {
        self.structure.as_ref()
    }

    /// Appends a loader, builder style.
    #[must_use]
    pub fn with_loader(mut self, loader: impl Loader + 'static) -> Self {
        self.add_loader(loader);
        self
    }

    /// Appends a loader. Later loaders take precedence under the default merge.
    pub fn add_loader(&mut self, loader: impl Loader + 'static) -> &mut Self {
        self.loaders.push(Box::new(loader));
        self
    }

    /// Names of the registered loaders, in registration order.
    pub fn loader_names(&self) -> Vec<String> {
        self.loaders.iter().map(|loader| loader.name()).collect()
    }

    /// Runs every loader, merges their values and validates the result.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::MissingStructure`] if no structure was set
    /// - [`ConfigError::LoaderLoad`] if a loader fails or returns a non-map
    /// - [`ConfigError::InvalidConfiguration`] if validation records errors
    pub fn load(&self) -> Result<Settings, ConfigError> {
        let settings = self.load_unvalidated()?;
        self.validate(&settings)?;
        Ok(settings)
    }

    /// Runs every loader and merges their values without validating.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::MissingStructure`] if no structure was set
    /// - [`ConfigError::LoaderLoad`] if a loader fails or returns a non-map
    pub fn load_unvalidated(&self) -> Result<Settings, ConfigError> {
        let structure = self.require_structure()?;
        let mut settings = Settings::new();

        if self.loaders.is_empty() {
            warn!(
                keys = structure.len(),
                "no loaders registered; configuration resolves to no keys"
            );
        }

        for loader in &self.loaders {
            let name = loader.name();
            debug!(loader = %name, "invoking loader");

            let mut raw = match loader.load(structure) {
                Ok(Value::Map(raw)) => raw,
                Ok(other) => return Err(ConfigError::loader_returned(name, other.kind())),
                Err(source) => return Err(ConfigError::loader_failed(name, source)),
            };

            for (key, ty) in structure.members() {
                let value = match raw.shift_remove(key) {
                    Some(raw_value) => ty.convert(raw_value),
                    None => ty.default_value(),
                };
                trace!(loader = %name, key = %key, kind = value.kind(), "resolved key");

                match settings.get_mut(key) {
                    Some(slot) => {
                        let old = std::mem::take(slot);
                        *slot = ty.merge(old, value);
                    }
                    None => {
                        settings.insert(key.clone(), value);
                    }
                }
            }
        }

        debug!(
            keys = settings.len(),
            loaders = self.loaders.len(),
            "configuration loaded"
        );
        Ok(settings)
    }

    /// Checks `settings` against every declared type.
    ///
    /// All keys are validated into one [`ErrorRecorder`] so every failure is
    /// reported together.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::MissingStructure`] if no structure was set
    /// - [`ConfigError::InvalidConfiguration`] carrying `settings` and every
    ///   recorded error if any type rejected its value
    pub fn validate(&self, settings: &Settings) -> Result<(), ConfigError> {
        let structure = self.require_structure()?;
        let mut errors = ErrorRecorder::new();

        for (key, ty) in structure.members() {
            let value = settings.get(key).unwrap_or(&Value::Unset);
            ty.validate(key, value, &mut errors);
        }

        if errors.is_empty() {
            return Ok(());
        }
        warn!(error_count = errors.len(), "configuration failed validation");
        Err(ConfigError::invalid(settings.clone(), errors.into_errors()))
    }

    fn require_structure(&self) -> Result<&Structure, ConfigError> {
        self.structure
            .as_deref()
            .ok_or(ConfigError::MissingStructure)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("structure", &self.structure)
            .field("loaders", &self.loader_names())
            .finish()
    }
}
