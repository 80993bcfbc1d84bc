use crate::{Loader, LoaderError, Structure, Value};

/// Serves a fixed in-memory value.
///
/// The value is returned as-is, so a loader built from something other than
/// a map is rejected by the pipeline.
#[derive(Debug, Clone)]
pub struct MapLoader {
    name: String,
    value: Value,
}

impl MapLoader {
    /// Creates a loader serving `value`.
    pub fn new(value: impl Into<Value>) -> Self {
        Self::named("map", value)
    }

    /// Creates a loader serving `value` under a custom name.
    pub fn named(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for MapLoader {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect::<Value>())
    }
}

impl Loader for MapLoader {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn load(&self, _structure: &Structure) -> Result<Value, LoaderError> {
        Ok(self.value.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serves_value() {
        let loader: MapLoader = [("k", "v")].into_iter().collect();
        let value = loader.load(&Structure::new()).unwrap();
        assert_eq!(value.as_map().unwrap()["k"], Value::from("v"));
        assert_eq!(loader.name(), "map");
    }

    #[test]
    fn test_named() {
        let loader = MapLoader::named("defaults", Value::Null);
        assert_eq!(loader.name(), "defaults");
        assert_eq!(loader.load(&Structure::new()).unwrap(), Value::Null);
    }
}
