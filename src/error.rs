//! Error types for the contact book.
//!
//! This module defines custom error types using `thiserror` for precise error handling.
//! Callers get one of four outcomes from a contact operation: field-level
//! validation errors, a missing record, a missing login, or a failure of the
//! storage collaborator itself.

use crate::auth::{Operation, LOGIN_PATH};
use crate::domain::{FieldError, ValidationErrors};
use crate::models::Contact;
use thiserror::Error;

/// Errors returned by the service layer.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// One or more rules failed. For updates, `original` holds the record
    /// as it is still stored.
    #[error("Validation failed: {errors}")]
    Validation {
        errors: ValidationErrors,
        original: Option<Box<Contact>>,
    },

    /// Referenced record does not exist
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: u64 },

    /// Operation needs a logged-in session
    #[error("Login required to {operation}; sign in at {}", LOGIN_PATH)]
    Unauthorized { operation: Operation },

    /// The storage collaborator failed
    #[error("Storage error: {0}")]
    Storage(String),
}

impl ServiceError {
    /// Validation failure of a record that was never stored.
    pub fn invalid(errors: impl Into<ValidationErrors>) -> Self {
        Self::Validation {
            errors: errors.into(),
            original: None,
        }
    }

    /// Validation failure of an update; `original` is the untouched record.
    pub fn invalid_update(errors: impl Into<ValidationErrors>, original: Contact) -> Self {
        Self::Validation {
            errors: errors.into(),
            original: Some(Box::new(original)),
        }
    }

    /// Field errors, if this is a validation failure.
    pub fn field_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Validation { errors, .. } => Some(errors),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Errors raised by repositories.
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// No row with this key
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: u64 },

    /// A uniqueness constraint rejected the write
    #[error("Unique constraint violated on {field}: {value}")]
    Conflict { field: &'static str, value: String },

    /// A check constraint rejected the write
    #[error("Check constraint violated on {field}: {message}")]
    Constraint {
        field: &'static str,
        message: &'static str,
    },

    /// Snapshot file could not be read or written
    #[error("Snapshot I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot file could not be encoded or decoded
    #[error("Snapshot format error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A password could not be hashed
    #[error("Password hashing failed: {0}")]
    PasswordHash(String),
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => ServiceError::NotFound { entity, id },
            // A race slipped past validation; report it the way validation would
            RepositoryError::Conflict { field, .. } => {
                ServiceError::invalid(FieldError::taken(field))
            }
            RepositoryError::Constraint { field, message } => {
                ServiceError::invalid(FieldError::new(field, message))
            }
            other => ServiceError::Storage(other.to_string()),
        }
    }
}

/// Errors that can occur while logging in.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Unknown username or wrong password
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// The user store failed
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Required environment variable is missing
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),

    /// Environment variable has invalid value
    #[error("Invalid value for {var}: {reason}")]
    InvalidValue { var: String, reason: String },
}

/// Convenience type alias for Results with ServiceError
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Convenience type alias for Results with RepositoryError
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Convenience type alias for Results with AuthError
pub type AuthResult<T> = Result<T, AuthError>;

/// Convenience type alias for Results with ConfigError
pub type ConfigResult<T> = Result<T, ConfigError>;
