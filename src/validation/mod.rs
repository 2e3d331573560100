//! Record validation.
//!
//! Each record type has an ordered slice of plain rule functions. A rule
//! looks at the record (and whatever uniqueness facts the caller looked up
//! beforehand) and returns zero or more [`FieldError`]s. Running a record's
//! rules concatenates their output, so one call reports every broken rule.
//!
//! Rules never touch storage. Services gather the facts a rule needs (for
//! example which contact currently owns an email) and pass them in.
//!
//! [`FieldError`]: crate::domain::FieldError

pub mod contact;
pub mod phone;
pub mod user;

pub use contact::{validate_contact, ContactFacts, WRONG_PHONE_COUNT};
pub use phone::{validate_phone, validate_phones};
pub use user::{validate_user, UserFacts};

/// Blank means empty or whitespace only.
pub(crate) fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
