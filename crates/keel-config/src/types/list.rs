use super::{expect_kind, Type};
use crate::{ErrorRecorder, Value};

/// A list whose elements share one type.
///
/// A string is split on commas, so `PREFIX__TAGS=a,b` loads as `["a", "b"]`.
#[derive(Debug, Clone, Default)]
pub struct List<T> {
    element: T,
}

impl<T: Type> List<T> {
    /// Creates a list of `element`.
    pub fn of(element: T) -> Self {
        Self { element }
    }
}

impl<T: Type> Type for List<T> {
    fn name(&self) -> String {
        format!("list<{}>", self.element.name())
    }

    fn convert(&self, raw: Value) -> Value {
        match raw {
            Value::List(items) => Value::List(
                items
                    .into_iter()
                    .map(|item| self.element.convert(item))
                    .collect(),
            ),
            Value::String(s) => Value::List(
                s.split(',')
                    .map(str::trim)
                    .filter(|part| !part.is_empty())
                    .map(|part| self.element.convert(Value::from(part)))
                    .collect(),
            ),
            other => other,
        }
    }

    fn validate(&self, key: &str, value: &Value, errors: &mut ErrorRecorder) {
        if !expect_kind(key, value, "list", matches!(value, Value::List(_)), errors) {
            return;
        }
        if let Value::List(items) = value {
            for (i, item) in items.iter().enumerate() {
                self.element.validate(&format!("{key}[{i}]"), item, errors);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Integer;

    #[test]
    fn test_convert_comma_separated_string() {
        let ty = List::of(Integer::new());
        assert_eq!(
            ty.convert(Value::from("1, 2,,3")),
            Value::List(vec![1.into(), 2.into(), 3.into()])
        );
    }

    #[test]
    fn test_convert_list_elementwise() {
        let ty = List::of(Integer::new());
        assert_eq!(
            ty.convert(Value::List(vec!["7".into()])),
            Value::List(vec![7.into()])
        );
    }

    #[test]
    fn test_validate_reports_element_index() {
        let ty = List::of(Integer::new());
        let mut errors = ErrorRecorder::new();
        ty.validate("ports", &ty.convert(Value::from("80,http")), &mut errors);

        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.errors()["ports[1]"],
            vec!["expected integer, found string"]
        );
    }

    #[test]
    fn test_validate_rejects_non_list() {
        let ty = List::of(Integer::new());
        let mut errors = ErrorRecorder::new();
        ty.validate("ports", &Value::from(true), &mut errors);
        assert_eq!(errors.errors()["ports"], vec!["expected list, found boolean"]);
    }
}
