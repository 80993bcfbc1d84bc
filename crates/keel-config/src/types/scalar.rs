//! Scalar types.
//!
//! Scalars coerce string input, as produced by environment variables and
//! dotenv files, into their canonical kind. Input that cannot be coerced is
//! left untouched so that validation reports it.

use super::{expect_kind, Type};
use crate::{ErrorRecorder, Value};

/// A string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Str;

impl Type for Str {
    fn name(&self) -> String {
        "string".to_string()
    }

    fn convert(&self, raw: Value) -> Value {
        match raw {
            Value::Bool(b) => Value::String(b.to_string()),
            Value::Integer(i) => Value::String(i.to_string()),
            Value::Float(f) => Value::String(f.to_string()),
            other => other,
        }
    }

    fn validate(&self, key: &str, value: &Value, errors: &mut ErrorRecorder) {
        expect_kind(key, value, "string", matches!(value, Value::String(_)), errors);
    }
}

/// A signed integer with optional inclusive bounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Integer {
    min: Option<i64>,
    max: Option<i64>,
}

impl Integer {
    /// Creates an unbounded integer type.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the inclusive lower bound.
    #[must_use]
    pub fn min(mut self, min: i64) -> Self {
        self.min = Some(min);
        self
    }

    /// Sets the inclusive upper bound.
    #[must_use]
    pub fn max(mut self, max: i64) -> Self {
        self.max = Some(max);
        self
    }
}

impl Type for Integer {
    fn name(&self) -> String {
        match (self.min, self.max) {
            (None, None) => "integer".to_string(),
            (Some(min), None) => format!("integer({min}..)"),
            (None, Some(max)) => format!("integer(..={max})"),
            (Some(min), Some(max)) => format!("integer({min}..={max})"),
        }
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    fn convert(&self, raw: Value) -> Value {
        match raw {
            Value::String(s) => match s.trim().parse::<i64>() {
                Ok(i) => Value::Integer(i),
                Err(_) => Value::String(s),
            },
            Value::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
                Value::Integer(f as i64)
            }
            other => other,
        }
    }

    fn validate(&self, key: &str, value: &Value, errors: &mut ErrorRecorder) {
        if !expect_kind(key, value, "integer", matches!(value, Value::Integer(_)), errors) {
            return;
        }
        let Value::Integer(i) = value else {
            return;
        };
        if let Some(min) = self.min.filter(|min| i < min) {
            errors.record(key, format!("must be at least {min}, got {i}"));
        }
        if let Some(max) = self.max.filter(|max| i > max) {
            errors.record(key, format!("must be at most {max}, got {i}"));
        }
    }
}

/// A floating point number. Integers are widened.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Float;

impl Type for Float {
    fn name(&self) -> String {
        "float".to_string()
    }

    #[allow(clippy::cast_precision_loss)]
    fn convert(&self, raw: Value) -> Value {
        match raw {
            Value::Integer(i) => Value::Float(i as f64),
            Value::String(s) => match s.trim().parse::<f64>() {
                Ok(f) => Value::Float(f),
                Err(_) => Value::String(s),
            },
            other => other,
        }
    }

    fn validate(&self, key: &str, value: &Value, errors: &mut ErrorRecorder) {
        expect_kind(key, value, "float", matches!(value, Value::Float(_)), errors);
    }
}

/// A boolean.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Boolean;

impl Type for Boolean {
    fn name(&self) -> String {
        "boolean".to_string()
    }

    fn convert(&self, raw: Value) -> Value {
        match raw {
            Value::String(s) => parse_bool(&s).map_or(Value::String(s), Value::Bool),
            other => other,
        }
    }

    fn validate(&self, key: &str, value: &Value, errors: &mut ErrorRecorder) {
        expect_kind(key, value, "boolean", matches!(value, Value::Bool(_)), errors);
    }
}

/// Parse a boolean from a string.
fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn errors_for(ty: &dyn Type, value: &Value) -> Vec<String> {
        let mut errors = ErrorRecorder::new();
        ty.validate("k", value, &mut errors);
        errors.into_errors().shift_remove("k").unwrap_or_default()
    }

    #[test]
    fn test_str_convert_and_validate() {
        assert_eq!(Str.convert(Value::from(42)), Value::from("42"));
        assert_eq!(Str.convert(Value::from(true)), Value::from("true"));
        assert!(errors_for(&Str, &Value::from("ok")).is_empty());
        assert_eq!(
            errors_for(&Str, &Value::List(vec![])),
            ["expected string, found list"]
        );
    }

    #[test]
    fn test_unset_and_null_pass_scalar_validation() {
        for ty in [&Str as &dyn Type, &Integer::new(), &Float, &Boolean] {
            assert!(errors_for(ty, &Value::Unset).is_empty());
            assert!(errors_for(ty, &Value::Null).is_empty());
        }
    }

    #[test]
    fn test_integer_convert() {
        let ty = Integer::new();
        assert_eq!(ty.convert(Value::from(" 42 ")), Value::from(42));
        assert_eq!(ty.convert(Value::from(3.0)), Value::from(3));
        assert_eq!(ty.convert(Value::from(3.5)), Value::from(3.5));
        assert_eq!(ty.convert(Value::from("abc")), Value::from("abc"));
    }

    #[test]
    fn test_integer_bounds() {
        let ty = Integer::new().min(1).max(10);
        assert_eq!(ty.name(), "integer(1..=10)");
        assert!(errors_for(&ty, &Value::from(5)).is_empty());
        assert_eq!(errors_for(&ty, &Value::from(0)), ["must be at least 1, got 0"]);
        assert_eq!(errors_for(&ty, &Value::from(11)), ["must be at most 10, got 11"]);
        assert_eq!(
            errors_for(&ty, &Value::from("abc")),
            ["expected integer, found string"]
        );
    }

    #[test]
    fn test_float_convert() {
        assert_eq!(Float.convert(Value::from(2)), Value::from(2.0));
        assert_eq!(Float.convert(Value::from("0.5")), Value::from(0.5));
        assert_eq!(errors_for(&Float, &Value::from("x")), ["expected float, found string"]);
    }

    #[test]
    fn test_boolean_convert() {
        assert_eq!(Boolean.convert(Value::from("Yes")), Value::from(true));
        assert_eq!(Boolean.convert(Value::from("off")), Value::from(false));
        assert_eq!(Boolean.convert(Value::from("maybe")), Value::from("maybe"));
        assert_eq!(
            errors_for(&Boolean, &Value::from("maybe")),
            ["expected boolean, found string"]
        );
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("true"), Some(true));
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool("1"), Some(true));
        assert_eq!(parse_bool("on"), Some(true));

        assert_eq!(parse_bool("False"), Some(false));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("no"), Some(false));

        assert_eq!(parse_bool("maybe"), None);
        assert_eq!(parse_bool(""), None);
    }
}
