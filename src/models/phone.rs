//! Phone model. Phones only exist inside their owning contact.

use crate::domain::{ContactId, PhoneId};
use serde::{Deserialize, Serialize};

/// A persisted phone row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Phone {
    pub id: PhoneId,

    /// Owning contact
    pub contact_id: ContactId,

    /// Free-form kind, e.g. "home" or "mobile"
    pub phone_type: String,

    /// The number as entered
    pub phone: String,
}

impl Phone {
    pub fn to_draft(&self) -> PhoneDraft {
        PhoneDraft {
            id: Some(self.id),
            phone_type: self.phone_type.clone(),
            phone: self.phone.clone(),
        }
    }
}

/// An unsaved phone, either new (`id: None`) or an edit of an existing row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhoneDraft {
    pub id: Option<PhoneId>,
    pub phone_type: String,
    pub phone: String,
}

impl PhoneDraft {
    pub fn new(phone_type: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            id: None,
            phone_type: phone_type.into(),
            phone: phone.into(),
        }
    }
}
