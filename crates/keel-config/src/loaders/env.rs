use std::env;
use std::path::PathBuf;

use tracing::debug;

use crate::{Loader, LoaderError, Map, Structure, Value};

const SEPARATOR: &str = "__";

/// Loads `PREFIX__KEY` environment variables.
///
/// The prefix is matched case-insensitively and stripped, the rest is split
/// on `__` into nested keys, so `APP__DB__HOST=x` loads as
/// `{"db": {"host": "x"}}`. Each segment is matched case-insensitively
/// against the declared keys (descending into nested structures) and takes
/// the declared spelling, so `APP__HTTPADDR` reaches a key declared as
/// `httpAddr`. Undeclared segments are lowercased. Values stay strings; the
/// declared types convert them.
///
/// # Example
///
/// ```
/// use keel_config::loaders::EnvLoader;
/// use keel_config::types::Integer;
/// use keel_config::{Config, Structure, Value};
///
/// let loader = EnvLoader::from_vars("APP", [("APP__WORKERS", "4"), ("OTHER", "x")]);
/// let settings = Config::new()
///     .with_structure(Structure::new().with("workers", Integer::new()))
///     .with_loader(loader)
///     .load()
///     .unwrap();
///
/// assert_eq!(settings["workers"], Value::from(4));
/// ```
#[derive(Debug, Clone)]
pub struct EnvLoader {
    prefix: String,
    vars: Option<Vec<(String, String)>>,
}

impl EnvLoader {
    /// Reads the process environment at load time.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into().to_uppercase(),
            vars: None,
        }
    }

    /// Reads an explicit list of variables instead of the process environment.
    pub fn from_vars<I, K, V>(prefix: impl Into<String>, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            prefix: prefix.into().to_uppercase(),
            vars: Some(
                vars.into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }
}

impl Loader for EnvLoader {
    fn name(&self) -> String {
        format!("env({})", self.prefix)
    }

    fn load(&self, structure: &Structure) -> Result<Value, LoaderError> {
        let vars = match &self.vars {
            Some(vars) => vars.clone(),
            None => env::vars().collect(),
        };
        Ok(nest_vars(structure, Some(&self.prefix), vars))
    }
}

/// Loads variables from a `.env` file without touching the process
/// environment.
///
/// Without a prefix every variable is loaded; `__` still separates nested
/// keys.
#[derive(Debug, Clone)]
pub struct DotenvLoader {
    path: PathBuf,
    prefix: Option<String>,
    optional: bool,
}

impl DotenvLoader {
    /// Loads the dotenv file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            prefix: None,
            optional: false,
        }
    }

    /// Only loads `PREFIX__KEY` variables, stripping the prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into().to_uppercase());
        self
    }

    /// Treats a missing file as an empty mapping.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }
}

impl Loader for DotenvLoader {
    fn name(&self) -> String {
        format!("dotenv({})", self.path.display())
    }

    fn load(&self, structure: &Structure) -> Result<Value, LoaderError> {
        if !self.path.exists() {
            if self.optional {
                debug!(path = %self.path.display(), "optional dotenv file missing");
                return Ok(Value::Map(Map::new()));
            }
            return Err(LoaderError::file_not_found(&self.path));
        }

        let vars = dotenvy::from_path_iter(&self.path)?.collect::<Result<Vec<_>, _>>()?;
        debug!(path = %self.path.display(), count = vars.len(), "read dotenv file");
        Ok(nest_vars(structure, self.prefix.as_deref(), vars))
    }
}

/// Builds a nested map from `KEY__SUB=value` pairs.
///
/// Variables are applied in name order, so a deeper key replaces a shallower
/// scalar with the same stem, and of two spellings of one declared key the
/// later name wins.
fn nest_vars(structure: &Structure, prefix: Option<&str>, mut vars: Vec<(String, String)>) -> Value {
    vars.sort();
    let mut root = Map::new();

    for (name, value) in vars {
        let rest = match prefix {
            Some(prefix) => match strip_prefix(&name, prefix) {
                Some(rest) => rest,
                None => continue,
            },
            None => name.as_str(),
        };

        let Some(path) = resolve_path(structure, rest) else {
            debug!(var = %name, "skipping malformed variable name");
            continue;
        };
        insert_path(&mut root, &path, Value::String(value));
    }

    Value::Map(root)
}

/// Strips `PREFIX__` from `name`, matching the prefix case-insensitively.
fn strip_prefix<'a>(name: &'a str, prefix: &str) -> Option<&'a str> {
    let head = name.get(..prefix.len())?;
    if !head.eq_ignore_ascii_case(prefix) {
        return None;
    }
    name.get(prefix.len()..)?.strip_prefix(SEPARATOR)
}

/// Splits `rest` on `__` and spells each segment the way it is declared.
///
/// Returns `None` if a segment is empty.
fn resolve_path(structure: &Structure, rest: &str) -> Option<Vec<String>> {
    let mut scope = Some(structure);
    let mut path = Vec::new();

    for segment in rest.split(SEPARATOR) {
        if segment.is_empty() {
            return None;
        }
        let declared = scope.and_then(|structure| {
            structure
                .members()
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(segment))
        });
        match declared {
            Some((key, ty)) => {
                path.push(key.clone());
                scope = ty.nested();
            }
            None => {
                path.push(segment.to_lowercase());
                scope = None;
            }
        }
    }

    Some(path)
}

fn insert_path(map: &mut Map, path: &[String], value: Value) {
    let Some((head, tail)) = path.split_first() else {
        return;
    };
    if tail.is_empty() {
        map.insert(head.clone(), value);
        return;
    }
    let entry = map
        .entry(head.clone())
        .or_insert_with(|| Value::Map(Map::new()));
    if !matches!(entry, Value::Map(_)) {
        *entry = Value::Map(Map::new());
    }
    if let Value::Map(child) = entry {
        insert_path(child, tail, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn load(loader: &dyn Loader) -> Map {
        match loader.load(&Structure::new()).unwrap() {
            Value::Map(map) => map,
            other => panic!("expected map, got {other:?}"),
        }
    }

    #[test]
    fn test_prefix_is_stripped_and_keys_lowercased() {
        let loader = EnvLoader::from_vars(
            "app",
            [("APP__HTTP_ADDR", "0.0.0.0:9000"), ("APPX__OTHER", "x"), ("PATH", "/bin")],
        );

        let map = load(&loader);
        assert_eq!(map.len(), 1);
        assert_eq!(map["http_addr"], Value::from("0.0.0.0:9000"));
        assert_eq!(loader.name(), "env(APP)");
    }

    #[test]
    fn test_nested_keys() {
        let loader = EnvLoader::from_vars(
            "APP",
            [("APP__DB__HOST", "db"), ("APP__DB__PORT", "5432"), ("APP__DB", "ignored")],
        );

        let map = load(&loader);
        let db = map["db"].as_map().unwrap();
        assert_eq!(db["host"], Value::from("db"));
        assert_eq!(db["port"], Value::from("5432"));
    }

    #[test]
    fn test_segments_take_declared_spelling() {
        let structure = Structure::new()
            .with("httpAddr", crate::types::Any)
            .with(
                "tlsConfig",
                crate::types::Nested::new(Structure::new().with("certPath", crate::types::Str)),
            );
        let loader = EnvLoader::from_vars(
            "APP",
            [
                ("APP__HTTPADDR", "x"),
                ("app__httpAddr", "y"),
                ("APP__TLSCONFIG__CERTPATH", "/etc/cert.pem"),
                ("APP__OTHER_KEY", "z"),
            ],
        );

        let Value::Map(map) = loader.load(&structure).unwrap() else {
            panic!("expected map");
        };

        assert_eq!(map["httpAddr"], Value::from("y"));
        assert_eq!(
            map["tlsConfig"].as_map().unwrap()["certPath"],
            Value::from("/etc/cert.pem")
        );
        assert_eq!(map["other_key"], Value::from("z"));
        assert!(!map.contains_key("httpaddr"));
    }

    #[test]
    fn test_mixed_case_key_loads_through_pipeline() {
        let settings = crate::Config::new()
            .with_structure(Structure::new().with("httpAddr", crate::types::Any))
            .with_loader(EnvLoader::from_vars("APP", [("APP__HTTPADDR", "0.0.0.0:80")]))
            .load()
            .unwrap();

        assert_eq!(settings["httpAddr"], Value::from("0.0.0.0:80"));
    }

    #[test]
    fn test_malformed_names_are_skipped() {
        let loader = EnvLoader::from_vars("APP", [("APP__", "x"), ("APP__A____B", "y")]);
        assert!(load(&loader).is_empty());
    }

    #[test]
    fn test_dotenv_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "APP__NAME=svc").unwrap();
        writeln!(file, "APP__LOG__LEVEL=debug").unwrap();
        writeln!(file, "UNRELATED=1").unwrap();

        let map = load(&DotenvLoader::new(file.path()).with_prefix("APP"));
        assert_eq!(map["name"], Value::from("svc"));
        assert_eq!(map["log"].as_map().unwrap()["level"], Value::from("debug"));
        assert!(!map.contains_key("unrelated"));

        let all = load(&DotenvLoader::new(file.path()));
        assert_eq!(all["unrelated"], Value::from("1"));
    }

    #[test]
    fn test_dotenv_missing_file() {
        let loader = DotenvLoader::new("/nonexistent/.env");
        assert!(matches!(
            loader.load(&Structure::new()),
            Err(LoaderError::FileNotFound { .. })
        ));
        assert!(load(&loader.optional()).is_empty());
    }
}
