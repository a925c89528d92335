use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

/// Per-field messages, keyed by the form field name the backend uses.
///
/// This is the shape of the backend's `{"errors": {...}}` payload, and also what client-side
/// validation produces, so both can be shown next to the same form fields.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.insert(field.into(), message.into());
    }

    /// Record `message` for `field` when `value` is blank.
    pub fn require(&mut self, field: &str, value: &str, message: &str) {
        if value.trim().is_empty() {
            self.insert(field, message);
        }
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// `Ok(())` if no field failed, otherwise the collected errors.
    ///
    /// # Errors
    ///
    /// Returns `self` when at least one field has a message.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FieldErrors {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_require_blank() {
        let mut errors = FieldErrors::new();
        errors.require("title", "   ", "Title is required");
        errors.require("genre", "Jazz", "Genre is required");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("title"), Some("Title is required"));
        assert!(errors.into_result().is_err());
    }

    #[test]
    fn test_server_payload_shape() {
        let errors: FieldErrors =
            serde_json::from_str(r#"{"email":"Email taken","username":"Too short"}"#).unwrap();
        assert_eq!(errors.to_string(), "email: Email taken; username: Too short");
    }
}
