//! Test fixtures and sample data.
//!
//! This module provides reusable contact parameters and wired-up services so
//! each test file starts from the same known state.

#![allow(dead_code)]

use contact_book::auth::{AccessContext, AccessPolicy};
use contact_book::domain::UserId;
use contact_book::metrics::Metrics;
use contact_book::models::{ContactParams, PhoneDraft};
use contact_book::repositories::ContactRepository;
use contact_book::services::ContactServiceImpl;
use std::sync::Arc;

/// Three phones with distinct numbers.
pub fn three_phones() -> Vec<PhoneDraft> {
    vec![
        PhoneDraft::new("home", "785-555-1234"),
        PhoneDraft::new("office", "785-555-4321"),
        PhoneDraft::new("mobile", "785-555-1111"),
    ]
}

/// A valid contact with the given names and email.
pub fn sample_contact(firstname: &str, lastname: &str, email: &str) -> ContactParams {
    ContactParams {
        firstname: Some(firstname.to_string()),
        lastname: Some(lastname.to_string()),
        email: Some(email.to_string()),
        phones: three_phones(),
    }
}

/// John Doe, the default valid contact.
pub fn john_doe() -> ContactParams {
    sample_contact("John", "Doe", "johndoe@example.com")
}

/// A contact that fails validation: no first name.
pub fn invalid_contact() -> ContactParams {
    ContactParams {
        firstname: None,
        ..sample_contact("", "Nobody", "nobody@example.com")
    }
}

/// A logged-in caller.
pub fn admin() -> AccessContext {
    AccessContext::authenticated(UserId::new(1).unwrap())
}

/// A caller without a session.
pub fn guest() -> AccessContext {
    AccessContext::anonymous()
}

/// A contact service over `repo` with the default policy.
pub fn contact_service(repo: Arc<dyn ContactRepository>) -> (ContactServiceImpl, Metrics) {
    let metrics = Metrics::new();
    let service = ContactServiceImpl::new(repo, AccessPolicy::default(), metrics.clone());
    (service, metrics)
}
