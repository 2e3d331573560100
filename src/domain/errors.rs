//! Field-level validation errors.
//!
//! Validation never stops at the first broken rule. Every rule contributes
//! zero or more [`FieldError`]s and the caller receives the whole list in a
//! [`ValidationErrors`], keyed by field name the way a form would re-display
//! them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Message for a required field that is missing or blank.
pub const BLANK: &str = "can't be blank";

/// Message for a value that collides with an existing record.
pub const TAKEN: &str = "has already been taken";

/// A single broken rule on a single field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Field name, e.g. `"email"` or `"phones.phone"`
    pub field: String,

    /// Human readable message, e.g. `"can't be blank"`
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn blank(field: impl Into<String>) -> Self {
        Self::new(field, BLANK)
    }

    pub fn taken(field: impl Into<String>) -> Self {
        Self::new(field, TAKEN)
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.message)
    }
}

/// The aggregate result of running every rule against a record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: FieldError) {
        self.0.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// Messages recorded against `field`, in rule order.
    pub fn on(&self, field: &str) -> Vec<&str> {
        self.0
            .iter()
            .filter(|e| e.field == field)
            .map(|e| e.message.as_str())
            .collect()
    }

    /// Whether `field` has at least one error.
    pub fn contains(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    /// `Ok(())` when nothing was collected.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl From<FieldError> for ValidationErrors {
    fn from(error: FieldError) -> Self {
        Self(vec![error])
    }
}

impl Extend<FieldError> for ValidationErrors {
    fn extend<T: IntoIterator<Item = FieldError>>(&mut self, iter: T) {
        self.0.extend(iter);
    }
}

impl FromIterator<FieldError> for ValidationErrors {
    fn from_iter<T: IntoIterator<Item = FieldError>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for ValidationErrors {
    type Item = FieldError;
    type IntoIter = std::vec::IntoIter<FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        write!(f, "{}", parts.join(", "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Errors raised while constructing identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdError {
    /// Keys start at 1.
    Zero,

    /// The text is not a number.
    Malformed(String),
}

impl fmt::Display for IdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Zero => write!(f, "ID cannot be zero"),
            Self::Malformed(raw) => write!(f, "Malformed ID: {}", raw),
        }
    }
}

impl std::error::Error for IdError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_errors_on_field() {
        let errors: ValidationErrors = vec![
            FieldError::blank("firstname"),
            FieldError::blank("email"),
            FieldError::taken("email"),
        ]
        .into_iter()
        .collect();

        assert_eq!(errors.len(), 3);
        assert_eq!(errors.on("email"), vec![BLANK, TAKEN]);
        assert!(errors.contains("firstname"));
        assert!(!errors.contains("lastname"));
        assert!(errors.on("lastname").is_empty());
    }

    #[test]
    fn test_into_result() {
        assert!(ValidationErrors::new().into_result().is_ok());
        let err = ValidationErrors::from(FieldError::blank("lastname"));
        assert!(err.into_result().is_err());
    }

    #[test]
    fn test_display() {
        let errors: ValidationErrors = vec![
            FieldError::blank("firstname"),
            FieldError::taken("email"),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            errors.to_string(),
            "firstname can't be blank, email has already been taken"
        );
    }

    #[test]
    fn test_serializes_as_list() {
        let errors = ValidationErrors::from(FieldError::blank("email"));
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{"field": "email", "message": "can't be blank"}])
        );
    }
}
