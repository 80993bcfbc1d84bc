//! Declared configuration schemas.

use std::fmt::{self, Display, Write as _};
use std::sync::Arc;

use indexmap::IndexMap;

use crate::types::Type;
use crate::{ConfigError, Map, Value};

/// The declared set of configuration keys and their types.
///
/// Keys are stored as strings in declaration order. Anything implementing
/// [`Display`] can be used as a key and is normalized to its string form, so
/// `define(7, ..)` is looked up as `"7"`. Re-defining a key replaces its type
/// and keeps its original position.
///
/// A structure is cheap to clone and can be shared between several
/// [`Config`](crate::Config)s once it is fully defined.
///
/// # Example
///
/// ```
/// use keel_config::types::{Integer, Str};
/// use keel_config::Structure;
///
/// let structure = Structure::new()
///     .with("host", Str)
///     .with("port", Integer::new().min(1).max(65535));
///
/// assert_eq!(structure.keys().collect::<Vec<_>>(), ["host", "port"]);
/// ```
#[derive(Clone, Default)]
pub struct Structure {
    members: IndexMap<String, Arc<dyn Type>>,
}

impl Structure {
    /// Creates an empty structure.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `ty` under the string form of `key`.
    pub fn define<K: Display, T: Type + 'static>(&mut self, key: K, ty: T) {
        self.define_shared(key, Arc::new(ty));
    }

    /// Registers an already shared type under the string form of `key`.
    pub fn define_shared<K: Display>(&mut self, key: K, ty: Arc<dyn Type>) {
        self.members.insert(key.to_string(), ty);
    }

    /// Builder form of [`define`](Self::define).
    #[must_use]
    pub fn with<K: Display, T: Type + 'static>(mut self, key: K, ty: T) -> Self {
        self.define(key, ty);
        self
    }

    /// Declared keys and types, in declaration order.
    pub fn members(&self) -> &IndexMap<String, Arc<dyn Type>> {
        &self.members
    }

    /// Declared keys, in declaration order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, String, Arc<dyn Type>> {
        self.members.keys()
    }

    /// The type declared for `key`.
    pub fn get<K: Display>(&self, key: K) -> Option<&Arc<dyn Type>> {
        self.members.get(key.to_string().as_str())
    }

    /// Returns `true` if `key` is declared.
    pub fn contains<K: Display>(&self, key: K) -> bool {
        self.members.contains_key(key.to_string().as_str())
    }

    /// Number of declared keys.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns `true` if no key is declared.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Restricts `raw` to the declared keys.
    ///
    /// Values are passed through unconverted, in declaration order; keys that
    /// are not declared are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::TypeMismatch`] if `raw` is not a map.
    pub fn value(&self, raw: &Value) -> Result<Map, ConfigError> {
        let Value::Map(raw) = raw else {
            return Err(ConfigError::type_mismatch("map", raw.kind()));
        };
        Ok(self
            .members
            .keys()
            .filter_map(|key| raw.get(key).map(|value| (key.clone(), value.clone())))
            .collect())
    }

    /// Renders one `key: type` line per member, in declaration order.
    pub fn describe(&self) -> String {
        let mut out = String::new();
        for (key, ty) in &self.members {
            let _ = writeln!(out, "{key}: {}", ty.name());
        }
        out
    }
}

impl fmt::Debug for Structure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.members.iter()).finish()
    }
}

impl<K: Display> FromIterator<(K, Arc<dyn Type>)> for Structure {
    fn from_iter<I: IntoIterator<Item = (K, Arc<dyn Type>)>>(iter: I) -> Self {
        let mut structure = Self::new();
        for (key, ty) in iter {
            structure.define_shared(key, ty);
        }
        structure
    }
}
