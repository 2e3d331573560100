//! Behavior of the contact aggregate: naming, lookup by letter, and the
//! validation rules that guard every save.

use contact_book::domain::{BLANK, TAKEN};
use contact_book::models::{ContactDraft, PhoneDraft};
use contact_book::repositories::{ContactRepository, InMemoryContactRepository};
use contact_book::services::{by_letter, ContactService};
use contact_book::validation::WRONG_PHONE_COUNT;
use std::sync::Arc;

mod fixtures;
use fixtures::*;

#[tokio::test]
async fn test_valid_with_names_email_and_three_phones() {
    let repo = Arc::new(InMemoryContactRepository::new());
    let (service, _) = contact_service(repo);

    let draft = ContactDraft::from(john_doe());
    assert!(service.validate(&draft).await.is_ok());
}

#[tokio::test]
async fn test_invalid_without_firstname_lastname_or_email() {
    let repo = Arc::new(InMemoryContactRepository::new());
    let (service, _) = contact_service(repo);

    let draft = ContactDraft {
        phones: three_phones(),
        ..Default::default()
    };
    let err = service.validate(&draft).await.unwrap_err();
    let errors = err.field_errors().unwrap();
    assert_eq!(errors.on("firstname"), vec![BLANK]);
    assert_eq!(errors.on("lastname"), vec![BLANK]);
    assert_eq!(errors.on("email"), vec![BLANK]);
}

#[tokio::test]
async fn test_invalid_with_duplicate_email() {
    let repo = Arc::new(InMemoryContactRepository::new());
    let (service, _) = contact_service(repo);

    service
        .create(&admin(), sample_contact("Joe", "Tester", "tester@example.com"))
        .await
        .unwrap();

    let draft = ContactDraft::from(sample_contact("Jane", "Tester", "tester@example.com"));
    let err = service.validate(&draft).await.unwrap_err();
    assert_eq!(err.field_errors().unwrap().on("email"), vec![TAKEN]);
}

#[tokio::test]
async fn test_email_uniqueness_is_case_sensitive() {
    let repo = Arc::new(InMemoryContactRepository::new());
    let (service, _) = contact_service(repo);

    service
        .create(&admin(), sample_contact("Joe", "Tester", "tester@example.com"))
        .await
        .unwrap();

    let draft = ContactDraft::from(sample_contact("Jane", "Tester", "Tester@example.com"));
    assert!(service.validate(&draft).await.is_ok());
}

#[tokio::test]
async fn test_phone_count_must_be_three() {
    let repo = Arc::new(InMemoryContactRepository::new());
    let (service, _) = contact_service(repo.clone());

    let mut params = john_doe();
    params.phones.pop();
    let err = service.create(&admin(), params).await.unwrap_err();
    assert_eq!(err.field_errors().unwrap().on("phones"), vec![WRONG_PHONE_COUNT]);

    let mut params = john_doe();
    params.phones.push(PhoneDraft::new("fax", "785-555-9999"));
    assert!(service.create(&admin(), params).await.is_err());

    assert_eq!(repo.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_blank_form_has_three_phone_slots_but_is_not_valid() {
    let repo = Arc::new(InMemoryContactRepository::new());
    let (service, _) = contact_service(repo);

    let draft = service.build(&admin()).await.unwrap();
    assert_eq!(draft.phones.len(), 3);

    let err = service.validate(&draft).await.unwrap_err();
    let errors = err.field_errors().unwrap();
    assert_eq!(errors.on("phones"), Vec::<&str>::new());
    assert_eq!(errors.on("phones.phone"), vec![BLANK, BLANK, BLANK]);
}

#[tokio::test]
async fn test_name_joins_first_and_last() {
    let repo = Arc::new(InMemoryContactRepository::new());
    let (service, _) = contact_service(repo);

    let contact = service.create(&admin(), john_doe()).await.unwrap();
    assert_eq!(contact.name(), "John Doe");
}

#[tokio::test]
async fn test_by_letter_returns_sorted_matches() {
    let repo = Arc::new(InMemoryContactRepository::new());
    let (service, _) = contact_service(repo.clone());

    for params in [
        sample_contact("John", "Smith", "jsmith@example.com"),
        sample_contact("Tim", "Jones", "tjones@example.com"),
        sample_contact("John", "Johnson", "jjohnson@example.com"),
    ] {
        service.create(&admin(), params).await.unwrap();
    }

    let found = by_letter(repo.as_ref(), Some("J")).await.unwrap();
    let names: Vec<&str> = found.iter().map(|c| c.lastname.as_str()).collect();
    assert_eq!(names, vec!["Johnson", "Jones"]);

    let lowercase = by_letter(repo.as_ref(), Some("j")).await.unwrap();
    assert!(lowercase.is_empty());
}

#[tokio::test]
async fn test_same_number_allowed_on_different_contacts() {
    let repo = Arc::new(InMemoryContactRepository::new());
    let (service, _) = contact_service(repo);

    let first = service.create(&admin(), john_doe()).await.unwrap();
    let second = service
        .create(&admin(), sample_contact("Jane", "Doe", "janedoe@example.com"))
        .await
        .unwrap();

    assert_eq!(first.phones[0].phone, second.phones[0].phone);
}

#[tokio::test]
async fn test_duplicate_number_within_contact_is_rejected() {
    let repo = Arc::new(InMemoryContactRepository::new());
    let (service, _) = contact_service(repo);

    let mut params = john_doe();
    params.phones[2].phone = params.phones[0].phone.clone();

    let err = service.create(&admin(), params).await.unwrap_err();
    assert_eq!(err.field_errors().unwrap().on("phones.phone"), vec![TAKEN]);
}
