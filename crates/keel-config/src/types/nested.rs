use super::{expect_kind, Type};
use crate::{ErrorRecorder, Map, Structure, Value};

/// A map of its own declared keys.
///
/// Conversion, defaulting, merging and validation are applied member-wise
/// with the member types, mirroring what the pipeline does for top-level
/// keys. Member errors are recorded under dotted keys such as `db.port`.
#[derive(Debug, Clone, Default)]
pub struct Nested {
    structure: Structure,
}

impl Nested {
    /// Creates a nested type from `structure`.
    pub fn new(structure: Structure) -> Self {
        Self { structure }
    }

    /// The nested structure.
    pub fn structure(&self) -> &Structure {
        &self.structure
    }
}

impl Type for Nested {
    fn name(&self) -> String {
        let members: Vec<String> = self
            .structure
            .members()
            .iter()
            .map(|(key, ty)| format!("{key}: {}", ty.name()))
            .collect();
        format!("structure {{ {} }}", members.join(", "))
    }

    fn convert(&self, raw: Value) -> Value {
        let Value::Map(mut raw) = raw else {
            return raw;
        };
        let converted: Map = self
            .structure
            .members()
            .iter()
            .map(|(key, ty)| {
                let value = match raw.shift_remove(key) {
                    Some(value) => ty.convert(value),
                    None => ty.default_value(),
                };
                (key.clone(), value)
            })
            .collect();
        Value::Map(converted)
    }

    fn default_value(&self) -> Value {
        Value::Map(
            self.structure
                .members()
                .iter()
                .map(|(key, ty)| (key.clone(), ty.default_value()))
                .collect(),
        )
    }

    fn merge(&self, old: Value, new: Value) -> Value {
        match (old, new) {
            (Value::Map(mut old), Value::Map(mut new)) => Value::Map(
                self.structure
                    .members()
                    .iter()
                    .map(|(key, ty)| {
                        let old = old.shift_remove(key).unwrap_or_default();
                        let new = new.shift_remove(key).unwrap_or_default();
                        (key.clone(), ty.merge(old, new))
                    })
                    .collect(),
            ),
            (_, new) => new,
        }
    }

    fn validate(&self, key: &str, value: &Value, errors: &mut ErrorRecorder) {
        if !expect_kind(key, value, "map", matches!(value, Value::Map(_)), errors) {
            return;
        }
        // An unset or null section still has its members checked, as unset.
        let empty = Map::new();
        let map = value.as_map().unwrap_or(&empty);
        for (member, ty) in self.structure.members() {
            let member_value = map.get(member).unwrap_or(&Value::Unset);
            ty.validate(&format!("{key}.{member}"), member_value, errors);
        }
    }

    fn nested(&self) -> Option<&Structure> {
        Some(&self.structure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Integer, MergePolicy, Str, TypeExt};

    fn database() -> Nested {
        Nested::new(
            Structure::new()
                .with("host", Str.with_default("localhost"))
                .with("port", Integer::new().merge_with(MergePolicy::PreferSet)),
        )
    }

    #[test]
    fn test_convert_filters_and_fills_defaults() {
        let raw: Value = [("port", Value::from("5432")), ("extra", Value::from(1))]
            .into_iter()
            .collect();

        let converted = database().convert(raw);

        let expected: Value = [("host", Value::from("localhost")), ("port", Value::from(5432))]
            .into_iter()
            .collect();
        assert_eq!(converted, expected);
    }

    #[test]
    fn test_default_value_is_member_defaults() {
        let expected: Value = [("host", Value::from("localhost")), ("port", Value::Unset)]
            .into_iter()
            .collect();
        assert_eq!(database().default_value(), expected);
    }

    #[test]
    fn test_merge_is_member_wise() {
        let ty = database();
        let old: Value = [("host", Value::from("a")), ("port", Value::from(1))]
            .into_iter()
            .collect();
        let new: Value = [("host", Value::from("b")), ("port", Value::Unset)]
            .into_iter()
            .collect();

        let merged = ty.merge(old, new);

        let expected: Value = [("host", Value::from("b")), ("port", Value::from(1))]
            .into_iter()
            .collect();
        assert_eq!(merged, expected);
    }

    #[test]
    fn test_merge_non_maps_takes_new() {
        assert_eq!(database().merge(Value::from(1), Value::from(2)), Value::from(2));
    }

    #[test]
    fn test_validate_uses_dotted_keys() {
        let ty = database();
        let mut errors = ErrorRecorder::new();
        let value: Value = [("host", Value::from(true)), ("port", Value::from("x"))]
            .into_iter()
            .collect();

        ty.validate("db", &value, &mut errors);

        assert_eq!(errors.errors().keys().collect::<Vec<_>>(), ["db.host", "db.port"]);
    }

    #[test]
    fn test_validate_checks_members_of_missing_section() {
        let ty = Nested::new(
            Structure::new()
                .with("host", Str.required())
                .with("port", Integer::new()),
        );

        for value in [Value::Unset, Value::Null] {
            let mut errors = ErrorRecorder::new();
            ty.validate("db", &value, &mut errors);
            assert_eq!(errors.errors().keys().collect::<Vec<_>>(), ["db.host"]);
            assert_eq!(errors.errors()["db.host"], vec!["is required"]);
        }
    }

    #[test]
    fn test_required_member_fails_without_loaders() {
        let structure = Structure::new().with(
            "db",
            Nested::new(Structure::new().with("host", Str.required())),
        );

        let err = crate::Config::new()
            .with_structure(structure)
            .load()
            .unwrap_err();

        let crate::ConfigError::InvalidConfiguration(invalid) = err else {
            panic!("expected InvalidConfiguration, got {err:?}");
        };
        assert_eq!(invalid.errors()["db.host"], vec!["is required"]);
    }

    #[test]
    fn test_required_member_fails_for_null_section() {
        let structure = Structure::new().with(
            "db",
            Nested::new(Structure::new().with("host", Str.required())),
        );

        let err = crate::Config::new()
            .with_structure(structure)
            .with_loader(crate::loaders::MapLoader::from_iter([("db", Value::Null)]))
            .load()
            .unwrap_err();

        assert!(matches!(err, crate::ConfigError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_validate_rejects_non_map() {
        let mut errors = ErrorRecorder::new();
        database().validate("db", &Value::from("x"), &mut errors);
        assert_eq!(errors.errors()["db"], vec!["expected map, found string"]);
    }

    #[test]
    fn test_name_lists_members() {
        assert_eq!(
            database().name(),
            "structure { host: string = \"localhost\", port: integer }"
        );
    }
}
