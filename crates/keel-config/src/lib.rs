//! Schema-driven configuration aggregation.
//!
//! A caller declares the expected keys and their types in a [`Structure`],
//! registers an ordered list of [`Loader`]s on a [`Config`], and asks for the
//! merged, validated [`Settings`]:
//!
//! - [`types`] - the [`Type`](types::Type) contract (`convert`, `default_value`,
//!   `merge`, `validate`) and the built-in types
//! - [`loaders`] - in-memory, TOML/JSON file, environment and dotenv loaders
//! - [`ErrorRecorder`] - per-key validation failures collected in one pass
//!
//! # Example
//!
//! ```
//! use keel_config::loaders::{EnvLoader, FileLoader, Format};
//! use keel_config::types::{Boolean, Integer, List, MergePolicy, Str, TypeExt};
//! use keel_config::{Config, Structure, Value};
//!
//! # fn main() -> Result<(), keel_config::ConfigError> {
//! let structure = Structure::new()
//!     .with("service_name", Str.required())
//!     .with("workers", Integer::new().min(1).with_default(4))
//!     .with("debug", Boolean.with_default(false))
//!     .with("tags", List::of(Str).merge_with(MergePolicy::Concat));
//!
//! let defaults = r#"
//!     service_name = "orders"
//!     workers = 2
//!     debug = false
//!     tags = ["core"]
//! "#;
//!
//! let settings = Config::new()
//!     .with_structure(structure)
//!     .with_loader(FileLoader::from_string(defaults, Format::Toml))
//!     .with_loader(EnvLoader::from_vars("ORDERS", [
//!         ("ORDERS__SERVICE_NAME", "orders-eu"),
//!         ("ORDERS__WORKERS", "8"),
//!         ("ORDERS__DEBUG", "on"),
//!         ("ORDERS__TAGS", "eu,primary"),
//!     ]))
//!     .load()?;
//!
//! assert_eq!(settings.get_str("service_name"), Some("orders-eu"));
//! assert_eq!(settings.get_i64("workers"), Some(8));
//! assert_eq!(settings.get_bool("debug"), Some(true));
//! assert_eq!(
//!     settings["tags"],
//!     Value::List(vec!["core".into(), "eu".into(), "primary".into()])
//! );
//! # Ok(())
//! # }
//! ```
//!
//! # Precedence
//!
//! Loaders run in registration order. For every declared key the loader's
//! raw value is converted by the key's type (or the type's default is taken
//! when the loader has no entry) and merged into the value accumulated from
//! earlier loaders. The default merge is "last wins", including an unset
//! contribution; use [`MergePolicy::PreferSet`](types::MergePolicy::PreferSet)
//! for keys that later sources may leave out.
//!
//! Keys that no loader declares still appear in the result, holding the
//! type's default, usually [`Value::Unset`]. With no loaders at all the
//! result is empty.

#![warn(missing_docs)]

mod config;
mod error;
mod loader;
pub mod loaders;
mod recorder;
mod structure;
pub mod types;
mod value;

pub use config::Config;
pub use error::{ConfigError, InvalidConfiguration, LoaderError};
pub use loader::Loader;
pub use recorder::ErrorRecorder;
pub use structure::Structure;
pub use value::{Map, Settings, Value};
