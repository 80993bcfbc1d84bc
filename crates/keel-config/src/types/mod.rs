//! The type contract and the built-in types.
//!
//! Every key in a [`Structure`](crate::Structure) is described by a [`Type`].
//! The pipeline only ever calls the four contract operations (`convert`,
//! `default_value`, `merge`, `validate`) and never inspects a type's concrete
//! kind, so new behavior is added by implementing a new type.
//!
//! The trait's provided methods are the [`Any`] behavior: identity
//! conversion, an [`Unset`](crate::Value::Unset) default, "last wins" merging
//! and no validation. Implementations override only what they customize.
//!
//! # Composition
//!
//! [`TypeExt`] wraps any type in a modifier:
//!
//! ```
//! use keel_config::types::{Integer, MergePolicy, TypeExt};
//! use keel_config::Value;
//!
//! let port = Integer::new().min(1).max(65535).with_default(8080).required();
//! let tags = keel_config::types::List::of(keel_config::types::Str)
//!     .merge_with(MergePolicy::Concat);
//! # let _ = (port, tags);
//! ```

mod choice;
mod list;
mod modifiers;
mod nested;
mod scalar;

use std::fmt;
use std::sync::Arc;

use crate::{ErrorRecorder, Structure, Value};

pub use choice::Choice;
pub use list::List;
pub use modifiers::{Defaulted, MergePolicy, Merged, Required};
pub use nested::Nested;
pub use scalar::{Boolean, Float, Integer, Str};

/// The capability every value type provides.
pub trait Type: fmt::Debug + Send + Sync {
    /// Human readable name, used by documentation helpers.
    fn name(&self) -> String {
        "any".to_string()
    }

    /// Transforms a raw loader value into this type's canonical form.
    fn convert(&self, raw: Value) -> Value {
        raw
    }

    /// Value used when a loader has no entry for the key.
    fn default_value(&self) -> Value {
        Value::Unset
    }

    /// Combines the accumulated value with a newly loaded one.
    fn merge(&self, old: Value, new: Value) -> Value {
        let _ = old;
        new
    }

    /// Records a message in `errors` under `key` if `value` is invalid.
    fn validate(&self, key: &str, value: &Value, errors: &mut ErrorRecorder) {
        let _ = (key, value, errors);
    }

    /// The declared members of a map-valued type.
    ///
    /// Loaders use it to resolve the spelling of nested keys; the pipeline
    /// never calls it.
    fn nested(&self) -> Option<&Structure> {
        None
    }
}

/// Accepts anything, converts nothing, never fails validation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Any;

impl Type for Any {}

impl<T: Type + ?Sized> Type for Arc<T> {
    fn name(&self) -> String {
        (**self).name()
    }

    fn convert(&self, raw: Value) -> Value {
        (**self).convert(raw)
    }

    fn default_value(&self) -> Value {
        (**self).default_value()
    }

    fn merge(&self, old: Value, new: Value) -> Value {
        (**self).merge(old, new)
    }

    fn validate(&self, key: &str, value: &Value, errors: &mut ErrorRecorder) {
        (**self).validate(key, value, errors);
    }

    fn nested(&self) -> Option<&Structure> {
        (**self).nested()
    }
}

impl<T: Type + ?Sized> Type for Box<T> {
    fn name(&self) -> String {
        (**self).name()
    }

    fn convert(&self, raw: Value) -> Value {
        (**self).convert(raw)
    }

    fn default_value(&self) -> Value {
        (**self).default_value()
    }

    fn merge(&self, old: Value, new: Value) -> Value {
        (**self).merge(old, new)
    }

    fn validate(&self, key: &str, value: &Value, errors: &mut ErrorRecorder) {
        (**self).validate(key, value, errors);
    }

    fn nested(&self) -> Option<&Structure> {
        (**self).nested()
    }
}

/// Builder-style modifiers available on every type.
pub trait TypeExt: Type + Sized {
    /// Records "is required" when the final value is unset.
    fn required(self) -> Required<Self> {
        Required::new(self)
    }

    /// Uses `value` instead of unset when a loader has no entry.
    fn with_default(self, value: impl Into<Value>) -> Defaulted<Self> {
        Defaulted::new(self, value.into())
    }

    /// Replaces the merge behavior with `policy`.
    fn merge_with(self, policy: MergePolicy) -> Merged<Self> {
        Merged::new(self, policy)
    }

    /// Replaces the merge behavior with `f(old, new)`.
    fn merge_by<F>(self, f: F) -> Merged<Self>
    where
        F: Fn(Value, Value) -> Value + Send + Sync + 'static,
    {
        Merged::new(self, MergePolicy::custom(f))
    }
}

impl<T: Type> TypeExt for T {}

/// Records a kind mismatch for `value` unless it is unset or null.
pub(crate) fn expect_kind(
    key: &str,
    value: &Value,
    expected: &str,
    matches: bool,
    errors: &mut ErrorRecorder,
) -> bool {
    if matches || value.is_unset() || value.is_null() {
        return true;
    }
    errors.record(key, format!("expected {expected}, found {}", value.kind()));
    false
}
