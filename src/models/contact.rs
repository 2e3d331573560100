//! Contact model representing a person in the address book.

use super::phone::{Phone, PhoneDraft};
use crate::domain::ContactId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of phones every persisted contact carries.
pub const PHONES_PER_CONTACT: usize = 3;

/// A persisted contact together with its phones.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Contact {
    /// Store-assigned primary key
    pub id: ContactId,

    /// First name
    pub firstname: String,

    /// Last name, used for the letter filter and ordering
    pub lastname: String,

    /// Email address, unique across all contacts
    pub email: String,

    /// Hidden from default views without being removed
    #[serde(default)]
    pub hidden: bool,

    /// Owned phones, in the order they were submitted
    #[serde(default)]
    pub phones: Vec<Phone>,

    /// When the contact was created
    pub created_at: DateTime<Utc>,

    /// When the contact was last written
    pub updated_at: DateTime<Utc>,
}

/// Read-only `(name, email)` projection used by exports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactSummary {
    pub name: String,
    pub email: String,
}

impl Contact {
    /// Full name: first and last name separated by a space.
    pub fn name(&self) -> String {
        format!("{} {}", self.firstname, self.lastname)
    }

    /// Project onto the fields an export needs.
    pub fn summary(&self) -> ContactSummary {
        ContactSummary {
            name: self.name(),
            email: self.email.clone(),
        }
    }

    /// An editable copy of this contact, phones included.
    pub fn to_draft(&self) -> ContactDraft {
        ContactDraft {
            id: Some(self.id),
            firstname: self.firstname.clone(),
            lastname: self.lastname.clone(),
            email: self.email.clone(),
            hidden: self.hidden,
            phones: self.phones.iter().map(Phone::to_draft).collect(),
        }
    }
}

/// Incoming attributes for a new contact.
///
/// Missing fields deserialize as `None`; they are not rejected here but by
/// validation, so the caller gets every problem reported at once.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactParams {
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub email: Option<String>,
    pub phones: Vec<PhoneDraft>,
}

/// Field replacements for an existing contact. `None` leaves a field alone.
///
/// `phones`, when present, replaces the whole collection. Drafts carrying the
/// id of one of the contact's current phones update that phone in place.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactChanges {
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub email: Option<String>,
    pub phones: Option<Vec<PhoneDraft>>,
}

/// An unsaved contact aggregate.
///
/// A draft may hold any number of phones; only validation and the store
/// insist on exactly [`PHONES_PER_CONTACT`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactDraft {
    /// `Some` when the draft edits an existing contact
    pub id: Option<ContactId>,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub hidden: bool,
    pub phones: Vec<PhoneDraft>,
}

impl ContactDraft {
    /// A blank form with one empty slot per required phone.
    pub fn blank() -> Self {
        Self {
            phones: vec![PhoneDraft::default(); PHONES_PER_CONTACT],
            ..Default::default()
        }
    }

    /// Replace every field present in `changes`.
    pub fn apply(&mut self, changes: ContactChanges) {
        if let Some(firstname) = changes.firstname {
            self.firstname = firstname;
        }
        if let Some(lastname) = changes.lastname {
            self.lastname = lastname;
        }
        if let Some(email) = changes.email {
            self.email = email;
        }
        if let Some(phones) = changes.phones {
            self.phones = phones;
        }
    }

    pub fn name(&self) -> String {
        format!("{} {}", self.firstname, self.lastname)
    }
}

impl From<ContactParams> for ContactDraft {
    fn from(params: ContactParams) -> Self {
        Self {
            id: None,
            firstname: params.firstname.unwrap_or_default(),
            lastname: params.lastname.unwrap_or_default(),
            email: params.email.unwrap_or_default(),
            hidden: false,
            phones: params.phones,
        }
    }
}
