//! Per-key validation error collection.

use indexmap::IndexMap;

/// Collects validation failures during one validation pass.
///
/// Types record messages here instead of returning errors, so a single pass
/// reports every invalid key at once. A key is present only once a message
/// was recorded for it, and keys keep the order they were first recorded in.
///
/// # Example
///
/// ```
/// use keel_config::ErrorRecorder;
///
/// let mut errors = ErrorRecorder::new();
/// assert!(errors.is_empty());
///
/// errors.record("port", "expected integer, found string");
/// errors.record("port", "must be at least 1");
///
/// assert_eq!(errors.errors()["port"].len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorRecorder {
    errors: IndexMap<String, Vec<String>>,
}

impl ErrorRecorder {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `message` to the messages recorded for `key`.
    pub fn record(&mut self, key: impl Into<String>, message: impl Into<String>) {
        self.errors.entry(key.into()).or_default().push(message.into());
    }

    /// Returns `true` if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of keys with at least one message.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Messages grouped by key.
    pub fn errors(&self) -> &IndexMap<String, Vec<String>> {
        &self.errors
    }

    /// Consumes the recorder and returns the messages grouped by key.
    pub fn into_errors(self) -> IndexMap<String, Vec<String>> {
        self.errors
    }
}
