//! Contact rules.

use super::is_blank;
use super::phone::validate_phones;
use crate::domain::{ContactId, FieldError, ValidationErrors};
use crate::models::{ContactDraft, PHONES_PER_CONTACT};

/// Message for a phone collection that is not exactly three long.
pub const WRONG_PHONE_COUNT: &str = "is the wrong length (should be 3)";

/// Storage facts the contact rules need.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContactFacts {
    /// The contact currently holding the draft's email, if any.
    pub email_owner: Option<ContactId>,
}

type ContactRule = fn(&ContactDraft, &ContactFacts) -> Vec<FieldError>;

const CONTACT_RULES: &[ContactRule] = &[
    firstname_present,
    lastname_present,
    email_present,
    email_unique,
    phone_count,
    phones_valid,
];

fn present(field: &str, value: &str) -> Vec<FieldError> {
    if is_blank(value) {
        vec![FieldError::blank(field)]
    } else {
        Vec::new()
    }
}

fn firstname_present(draft: &ContactDraft, _facts: &ContactFacts) -> Vec<FieldError> {
    present("firstname", &draft.firstname)
}

fn lastname_present(draft: &ContactDraft, _facts: &ContactFacts) -> Vec<FieldError> {
    present("lastname", &draft.lastname)
}

fn email_present(draft: &ContactDraft, _facts: &ContactFacts) -> Vec<FieldError> {
    present("email", &draft.email)
}

fn email_unique(draft: &ContactDraft, facts: &ContactFacts) -> Vec<FieldError> {
    match facts.email_owner {
        Some(owner) if !is_blank(&draft.email) && draft.id != Some(owner) => {
            vec![FieldError::taken("email")]
        }
        _ => Vec::new(),
    }
}

fn phone_count(draft: &ContactDraft, _facts: &ContactFacts) -> Vec<FieldError> {
    if draft.phones.len() == PHONES_PER_CONTACT {
        Vec::new()
    } else {
        vec![FieldError::new("phones", WRONG_PHONE_COUNT)]
    }
}

fn phones_valid(draft: &ContactDraft, _facts: &ContactFacts) -> Vec<FieldError> {
    validate_phones(&draft.phones)
}

/// Run every contact rule and collect all failures.
pub fn validate_contact(draft: &ContactDraft, facts: &ContactFacts) -> Result<(), ValidationErrors> {
    CONTACT_RULES
        .iter()
        .flat_map(|rule| rule(draft, facts))
        .collect::<ValidationErrors>()
        .into_result()
}
