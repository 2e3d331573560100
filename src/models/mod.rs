//! Data models for the address book.
//!
//! Persisted records (`Contact`, `Phone`, `User`) sit next to the unsaved
//! drafts and parameter structs that create and update flows build before
//! validation.

pub mod contact;
pub mod phone;
pub mod user;

pub use contact::{
    Contact, ContactChanges, ContactDraft, ContactParams, ContactSummary, PHONES_PER_CONTACT,
};
pub use phone::{Phone, PhoneDraft};
pub use user::{Credentials, NewUser, User};
