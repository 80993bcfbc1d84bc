//! The loader contract.
//!
//! A loader is a source of raw key/value pairs: a file, the environment, an
//! in-memory map. [`Config`](crate::Config) invokes its loaders in
//! registration order and treats any error, or any result that is not a map,
//! as fatal for the whole load.

use crate::{LoaderError, Structure, Value};

/// A source of raw configuration values.
///
/// Implementations may consult [`Structure::members`] to know which keys are
/// relevant but do not need to filter; the pipeline ignores undeclared keys.
/// Loaders run synchronously and are expected to apply their own timeout or
/// retry policy before returning.
///
/// Any `Fn(&Structure) -> Result<Value, LoaderError>` closure is a loader.
///
/// # Example
///
/// ```
/// use keel_config::{Config, LoaderError, Structure, Value};
/// use keel_config::types::Any;
///
/// let region = |_: &Structure| -> Result<Value, LoaderError> {
///     Ok([("region", "eu-west-1")].into_iter().collect())
/// };
///
/// let config = Config::new()
///     .with_structure(Structure::new().with("region", Any))
///     .with_loader(region);
///
/// let settings = config.load().unwrap();
/// assert_eq!(settings.get_str("region"), Some("eu-west-1"));
/// ```
pub trait Loader: Send + Sync {
    /// Human-readable name used in errors and logs.
    fn name(&self) -> String {
        std::any::type_name::<Self>().to_string()
    }

    /// Produces the raw mapping for `structure`.
    ///
    /// # Errors
    ///
    /// Returns a [`LoaderError`] if the source cannot be read or parsed.
    fn load(&self, structure: &Structure) -> Result<Value, LoaderError>;
}

impl<F> Loader for F
where
    F: Fn(&Structure) -> Result<Value, LoaderError> + Send + Sync,
{
    fn name(&self) -> String {
        "closure".to_string()
    }

    fn load(&self, structure: &Structure) -> Result<Value, LoaderError> {
        self(structure)
    }
}
