//! Domain value objects and types.
//!
//! This module contains type-safe identifiers for contacts, phones and users
//! and the field-level error vocabulary that every validation rule reports
//! in.

pub mod errors;
pub mod ids;

pub use errors::{FieldError, IdError, ValidationErrors, BLANK, TAKEN};
pub use ids::{ContactId, PhoneId, UserId};
