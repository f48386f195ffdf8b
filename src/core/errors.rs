use crate::storage::StorageError;
use indexmap::IndexMap;
use thiserror::Error;

/// Reserved key for wizard-level errors that belong to no single field.
pub const GENERAL_ERROR_KEY: &str = "general";

pub const COMPLETION_FAILED_MESSAGE: &str =
    "Er is een fout opgetreden bij het voltooien van de wizard.";

/// Field name (or [`GENERAL_ERROR_KEY`]) to message.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WizardErrors {
    entries: IndexMap<String, String>,
}

impl WizardErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn general(message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.set(GENERAL_ERROR_KEY, message);
        errors
    }

    pub fn set(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.entries.insert(field.into(), message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.entries.get(field).map(String::as_str)
    }

    pub fn general_message(&self) -> Option<&str> {
        self.get(GENERAL_ERROR_KEY)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for WizardErrors {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut errors = Self::new();
        for (field, message) in iter {
            errors.set(field, message);
        }
        errors
    }
}

#[derive(Debug, Error)]
pub enum WizardError {
    #[error("a wizard needs at least one step")]
    NoSteps,
    #[error("duplicate step id: {0}")]
    DuplicateStep(String),
}

/// Failure reported by a completion handler.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct CompletionError {
    message: String,
}

impl CompletionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<StorageError> for CompletionError {
    fn from(err: StorageError) -> Self {
        Self::new(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::{GENERAL_ERROR_KEY, WizardErrors};

    #[test]
    fn general_error_uses_reserved_key() {
        let errors = WizardErrors::general("kapot");
        assert_eq!(errors.get(GENERAL_ERROR_KEY), Some("kapot"));
        assert_eq!(errors.general_message(), Some("kapot"));
    }

    #[test]
    fn collects_field_errors() {
        let mut errors: WizardErrors = [("amount", "Voer een geldig bedrag in")]
            .into_iter()
            .collect();
        assert_eq!(errors.len(), 1);
        assert!(errors.general_message().is_none());

        errors.clear();
        assert!(errors.is_empty());
    }
}
