//! Wrappers that change one operation of an inner type and delegate the rest.

use std::fmt;
use std::sync::Arc;

use super::Type;
use crate::{ErrorRecorder, Structure, Value};

/// Rejects an unset final value.
#[derive(Debug, Clone)]
pub struct Required<T> {
    inner: T,
}

impl<T: Type> Required<T> {
    /// Wraps `inner`.
    pub fn new(inner: T) -> Self {
        Self { inner }
    }
}

impl<T: Type> Type for Required<T> {
    fn name(&self) -> String {
        format!("{} (required)", self.inner.name())
    }

    fn convert(&self, raw: Value) -> Value {
        self.inner.convert(raw)
    }

    fn default_value(&self) -> Value {
        self.inner.default_value()
    }

    fn merge(&self, old: Value, new: Value) -> Value {
        self.inner.merge(old, new)
    }

    fn validate(&self, key: &str, value: &Value, errors: &mut ErrorRecorder) {
        if value.is_unset() {
            errors.record(key, "is required");
            return;
        }
        self.inner.validate(key, value, errors);
    }

    fn nested(&self) -> Option<&Structure> {
        self.inner.nested()
    }
}

/// Supplies a fixed value when a loader has no entry for the key.
#[derive(Debug, Clone)]
pub struct Defaulted<T> {
    inner: T,
    default: Value,
}

impl<T: Type> Defaulted<T> {
    /// Wraps `inner` with `default`.
    pub fn new(inner: T, default: Value) -> Self {
        Self { inner, default }
    }
}

impl<T: Type> Type for Defaulted<T> {
    fn name(&self) -> String {
        format!("{} = {}", self.inner.name(), self.default)
    }

    fn convert(&self, raw: Value) -> Value {
        self.inner.convert(raw)
    }

    fn default_value(&self) -> Value {
        self.default.clone()
    }

    fn merge(&self, old: Value, new: Value) -> Value {
        self.inner.merge(old, new)
    }

    fn validate(&self, key: &str, value: &Value, errors: &mut ErrorRecorder) {
        self.inner.validate(key, value, errors);
    }

    fn nested(&self) -> Option<&Structure> {
        self.inner.nested()
    }
}

/// How two loaders' values for the same key combine.
#[derive(Clone, Default)]
pub enum MergePolicy {
    /// The later value replaces the earlier one, even when unset.
    #[default]
    LastWins,
    /// The later value replaces the earlier one unless it is unset.
    PreferSet,
    /// The first value that is not unset is kept.
    KeepFirst,
    /// Lists are appended; other values behave like [`MergePolicy::PreferSet`].
    Concat,
    /// `f(old, new)`.
    Custom(Arc<dyn Fn(Value, Value) -> Value + Send + Sync>),
}

impl MergePolicy {
    /// Creates a [`MergePolicy::Custom`] policy.
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(Value, Value) -> Value + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(f))
    }

    /// Applies the policy.
    pub fn apply(&self, old: Value, new: Value) -> Value {
        match self {
            Self::LastWins => new,
            Self::PreferSet => {
                if new.is_unset() {
                    old
                } else {
                    new
                }
            }
            Self::KeepFirst => {
                if old.is_unset() {
                    new
                } else {
                    old
                }
            }
            Self::Concat => match (old, new) {
                (Value::List(mut old), Value::List(new)) => {
                    old.extend(new);
                    Value::List(old)
                }
                (old, Value::Unset) => old,
                (_, new) => new,
            },
            Self::Custom(f) => f(old, new),
        }
    }
}

impl fmt::Debug for MergePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LastWins => f.write_str("LastWins"),
            Self::PreferSet => f.write_str("PreferSet"),
            Self::KeepFirst => f.write_str("KeepFirst"),
            Self::Concat => f.write_str("Concat"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Replaces the merge operation of an inner type.
#[derive(Debug, Clone)]
pub struct Merged<T> {
    inner: T,
    policy: MergePolicy,
}

impl<T: Type> Merged<T> {
    /// Wraps `inner` with `policy`.
    pub fn new(inner: T, policy: MergePolicy) -> Self {
        Self { inner, policy }
    }
}

impl<T: Type> Type for Merged<T> {
    fn name(&self) -> String {
        self.inner.name()
    }

    fn convert(&self, raw: Value) -> Value {
        self.inner.convert(raw)
    }

    fn default_value(&self) -> Value {
        self.inner.default_value()
    }

    fn merge(&self, old: Value, new: Value) -> Value {
        self.policy.apply(old, new)
    }

    fn validate(&self, key: &str, value: &Value, errors: &mut ErrorRecorder) {
        self.inner.validate(key, value, errors);
    }

    fn nested(&self) -> Option<&Structure> {
        self.inner.nested()
    }
}
