//! Built-in loaders.
//!
//! - [`MapLoader`] for in-memory values
//! - [`FileLoader`] for TOML and JSON files
//! - [`EnvLoader`] for `PREFIX__KEY` environment variables
//! - [`DotenvLoader`] for `.env` files using the same naming scheme

mod env;
mod file;
mod map;

pub use env::{DotenvLoader, EnvLoader};
pub use file::{FileLoader, Format};
pub use map::MapLoader;
