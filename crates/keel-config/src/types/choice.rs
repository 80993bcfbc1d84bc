use super::{expect_kind, Type};
use crate::{ErrorRecorder, Value};

/// A string restricted to a fixed set of options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Choice {
    options: Vec<String>,
    case_insensitive: bool,
}

impl Choice {
    /// Creates a choice between `options`.
    pub fn new<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            options: options.into_iter().map(Into::into).collect(),
            case_insensitive: false,
        }
    }

    /// Matches input case-insensitively and converts it to the declared spelling.
    #[must_use]
    pub fn case_insensitive(mut self) -> Self {
        self.case_insensitive = true;
        self
    }

    /// The allowed options.
    pub fn options(&self) -> &[String] {
        &self.options
    }
}

impl Type for Choice {
    fn name(&self) -> String {
        format!("one of [{}]", self.options.join(", "))
    }

    fn convert(&self, raw: Value) -> Value {
        match raw {
            Value::String(s) if self.case_insensitive => self
                .options
                .iter()
                .find(|option| option.eq_ignore_ascii_case(s.trim()))
                .map_or(Value::String(s), |option| Value::String(option.clone())),
            other => other,
        }
    }

    fn validate(&self, key: &str, value: &Value, errors: &mut ErrorRecorder) {
        if !expect_kind(key, value, "string", matches!(value, Value::String(_)), errors) {
            return;
        }
        if let Value::String(s) = value {
            if !self.options.iter().any(|option| option == s) {
                errors.record(
                    key,
                    format!("must be one of {}, got {s:?}", self.options.join(", ")),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_membership() {
        let ty = Choice::new(["json", "pretty"]);
        let mut errors = ErrorRecorder::new();

        ty.validate("format", &Value::from("json"), &mut errors);
        assert!(errors.is_empty());

        ty.validate("format", &Value::from("xml"), &mut errors);
        assert_eq!(
            errors.errors()["format"],
            vec![r#"must be one of json, pretty, got "xml""#]
        );
    }

    #[test]
    fn test_case_insensitive_convert() {
        let ty = Choice::new(["info", "debug"]).case_insensitive();
        assert_eq!(ty.convert(Value::from("DEBUG")), Value::from("debug"));
        assert_eq!(ty.convert(Value::from("LOUD")), Value::from("LOUD"));

        let strict = Choice::new(["info"]);
        assert_eq!(strict.convert(Value::from("INFO")), Value::from("INFO"));
    }
}
