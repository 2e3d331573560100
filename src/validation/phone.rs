//! Phone rules.
//!
//! Phone numbers are unique per contact, not globally: the `others` a phone
//! is checked against are always the sibling phones of the same contact.

use super::is_blank;
use crate::domain::{FieldError, ValidationErrors};
use crate::models::PhoneDraft;

/// Field name used when a phone is validated on its own.
pub const PHONE_FIELD: &str = "phone";

/// Field name used when a phone is validated inside its contact.
pub const NESTED_PHONE_FIELD: &str = "phones.phone";

type PhoneRule = fn(&PhoneDraft, &[&PhoneDraft]) -> Vec<FieldError>;

const PHONE_RULES: &[PhoneRule] = &[phone_present, phone_unique_within_contact];

fn phone_present(phone: &PhoneDraft, _others: &[&PhoneDraft]) -> Vec<FieldError> {
    if is_blank(&phone.phone) {
        vec![FieldError::blank(PHONE_FIELD)]
    } else {
        Vec::new()
    }
}

fn phone_unique_within_contact(phone: &PhoneDraft, others: &[&PhoneDraft]) -> Vec<FieldError> {
    if is_blank(&phone.phone) {
        return Vec::new();
    }

    let duplicate = others.iter().any(|other| {
        // The same stored row is not a sibling of itself
        let same_row = phone.id.is_some() && other.id == phone.id;
        !same_row && other.phone == phone.phone
    });

    if duplicate {
        vec![FieldError::taken(PHONE_FIELD)]
    } else {
        Vec::new()
    }
}

/// Validate one phone against the other phones of its contact.
///
/// `others` should not include `phone` itself; if it does, an entry with the
/// same stored id is skipped.
pub fn validate_phone<'a, I>(phone: &PhoneDraft, others: I) -> Result<(), ValidationErrors>
where
    I: IntoIterator<Item = &'a PhoneDraft>,
{
    let others: Vec<&PhoneDraft> = others.into_iter().collect();
    PHONE_RULES
        .iter()
        .flat_map(|rule| rule(phone, &others))
        .collect::<ValidationErrors>()
        .into_result()
}

/// Field name for a stored phone named twice in one collection.
pub const NESTED_PHONE_ID_FIELD: &str = "phones.id";

/// Validate a contact's whole phone collection.
///
/// Each phone is checked against the phones before it, so a repeated number
/// is reported on its second and later occurrences only. Errors are keyed
/// `phones.phone`. A stored phone id that appears more than once is
/// reported on `phones.id`.
pub fn validate_phones(phones: &[PhoneDraft]) -> Vec<FieldError> {
    let mut errors: Vec<FieldError> = phones
        .iter()
        .enumerate()
        .filter_map(|(i, phone)| validate_phone(phone, &phones[..i]).err())
        .flatten()
        .map(|e| FieldError::new(NESTED_PHONE_FIELD, e.message))
        .collect();

    let repeated_ids = phones.iter().enumerate().filter(|(i, phone)| {
        phone.id.is_some() && phones[..*i].iter().any(|earlier| earlier.id == phone.id)
    });
    errors.extend(repeated_ids.map(|_| FieldError::taken(NESTED_PHONE_ID_FIELD)));
    errors
}
