use crate::domain::{ContactId, PhoneId};
use crate::error::{RepositoryError, RepositoryResult};
use crate::models::{Contact, ContactDraft, Phone, PhoneDraft, PHONES_PER_CONTACT};
use crate::repositories::snapshot::SnapshotFile;
use crate::repositories::traits::ContactRepository;
use crate::validation::WRONG_PHONE_COUNT;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::PathBuf;
use tokio::sync::RwLock;

/// A stored contact without its phones.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ContactRow {
    id: ContactId,
    firstname: String,
    lastname: String,
    email: String,
    hidden: bool,
    /// Phone keys in submission order
    phone_ids: Vec<PhoneId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// On-disk form of the tables.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Snapshot {
    last_contact_id: u64,
    last_phone_id: u64,
    contacts: Vec<ContactRow>,
    phones: Vec<Phone>,
}

#[derive(Debug, Clone, Default)]
struct Tables {
    last_contact_id: u64,
    last_phone_id: u64,
    contacts: BTreeMap<ContactId, ContactRow>,
    phones: BTreeMap<PhoneId, Phone>,
    /// Unique index on email
    emails: HashMap<String, ContactId>,
}

impl Tables {
    fn from_snapshot(snapshot: Snapshot) -> Self {
        let emails = snapshot
            .contacts
            .iter()
            .map(|row| (row.email.clone(), row.id))
            .collect();
        Self {
            last_contact_id: snapshot.last_contact_id,
            last_phone_id: snapshot.last_phone_id,
            contacts: snapshot.contacts.into_iter().map(|r| (r.id, r)).collect(),
            phones: snapshot.phones.into_iter().map(|p| (p.id, p)).collect(),
            emails,
        }
    }

    fn to_snapshot(&self) -> Snapshot {
        Snapshot {
            last_contact_id: self.last_contact_id,
            last_phone_id: self.last_phone_id,
            contacts: self.contacts.values().cloned().collect(),
            phones: self.phones.values().cloned().collect(),
        }
    }

    fn row(&self, id: ContactId) -> RepositoryResult<&ContactRow> {
        self.contacts.get(&id).ok_or(RepositoryError::NotFound {
            entity: "Contact",
            id: id.get(),
        })
    }

    fn materialize(&self, row: &ContactRow) -> Contact {
        Contact {
            id: row.id,
            firstname: row.firstname.clone(),
            lastname: row.lastname.clone(),
            email: row.email.clone(),
            hidden: row.hidden,
            phones: row
                .phone_ids
                .iter()
                .filter_map(|pid| self.phones.get(pid).cloned())
                .collect(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }

    /// Unique constraints on `(email)`, `(contact_id, phone)` and phone
    /// keys, plus the fixed phone count.
    /// Runs before any mutation so a rejected write changes nothing.
    fn check_constraints(&self, id: Option<ContactId>, draft: &ContactDraft) -> RepositoryResult<()> {
        if draft.phones.len() != PHONES_PER_CONTACT {
            return Err(RepositoryError::Constraint {
                field: "phones",
                message: WRONG_PHONE_COUNT,
            });
        }

        if let Some(owner) = self.emails.get(&draft.email) {
            if Some(*owner) != id {
                return Err(RepositoryError::Conflict {
                    field: "email",
                    value: draft.email.clone(),
                });
            }
        }

        let mut seen = BTreeSet::new();
        for phone in &draft.phones {
            if !seen.insert(phone.phone.as_str()) {
                return Err(RepositoryError::Conflict {
                    field: "phones.phone",
                    value: phone.phone.clone(),
                });
            }
        }

        // Two drafts naming one stored phone would collapse into one row
        let mut seen_ids = BTreeSet::new();
        for phone_id in draft.phones.iter().filter_map(|p| p.id) {
            if !seen_ids.insert(phone_id) {
                return Err(RepositoryError::Conflict {
                    field: "phones.id",
                    value: phone_id.to_string(),
                });
            }
        }

        Ok(())
    }

    fn next_contact_id(&mut self) -> ContactId {
        self.last_contact_id += 1;
        ContactId::new(self.last_contact_id).expect("counter starts above zero")
    }

    fn next_phone_id(&mut self) -> PhoneId {
        self.last_phone_id += 1;
        PhoneId::new(self.last_phone_id).expect("counter starts above zero")
    }

    /// Write `drafts` as the phones of `contact_id`, keeping the keys of
    /// drafts that name one of `reusable`. Returns the keys in order.
    fn write_phones(
        &mut self,
        contact_id: ContactId,
        drafts: &[PhoneDraft],
        reusable: &BTreeSet<PhoneId>,
    ) -> Vec<PhoneId> {
        drafts
            .iter()
            .map(|draft| {
                let id = match draft.id {
                    Some(id) if reusable.contains(&id) => id,
                    _ => self.next_phone_id(),
                };
                self.phones.insert(
                    id,
                    Phone {
                        id,
                        contact_id,
                        phone_type: draft.phone_type.clone(),
                        phone: draft.phone.clone(),
                    },
                );
                id
            })
            .collect()
    }
}

/// In-memory contact store with optional JSON snapshot persistence.
///
/// All tables sit behind one lock. Every write checks its constraints and
/// applies its changes under a single write guard, so readers see either
/// the whole aggregate or none of it.
pub struct InMemoryContactRepository {
    tables: RwLock<Tables>,
    snapshot: Option<SnapshotFile>,
}

impl InMemoryContactRepository {
    /// Create an empty, purely in-memory store.
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
            snapshot: None,
        }
    }

    /// Create a store backed by a snapshot file, loading it if it exists.
    pub fn with_snapshot(path: impl Into<PathBuf>) -> RepositoryResult<Self> {
        let snapshot = SnapshotFile::new(path);
        let tables = snapshot
            .load::<Snapshot>()?
            .map(Tables::from_snapshot)
            .unwrap_or_default();

        tracing::info!(
            path = %snapshot.path().display(),
            contacts = tables.contacts.len(),
            "Loaded contact snapshot"
        );

        Ok(Self {
            tables: RwLock::new(tables),
            snapshot: Some(snapshot),
        })
    }

    /// Run `op` under the write guard.
    ///
    /// With a snapshot configured the change is staged on a copy and only
    /// becomes visible once the snapshot is on disk.
    async fn write<T>(
        &self,
        op: impl FnOnce(&mut Tables) -> RepositoryResult<T>,
    ) -> RepositoryResult<T> {
        let mut tables = self.tables.write().await;
        match &self.snapshot {
            None => op(&mut tables),
            Some(snapshot) => {
                let mut staged = tables.clone();
                let out = op(&mut staged)?;
                snapshot.save(&staged.to_snapshot())?;
                *tables = staged;
                Ok(out)
            }
        }
    }
}

impl Default for InMemoryContactRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContactRepository for InMemoryContactRepository {
    async fn get(&self, id: ContactId) -> RepositoryResult<Contact> {
        let tables = self.tables.read().await;
        let row = tables.row(id)?;
        Ok(tables.materialize(row))
    }

    async fn all(&self) -> RepositoryResult<Vec<Contact>> {
        let tables = self.tables.read().await;
        Ok(tables
            .contacts
            .values()
            .map(|row| tables.materialize(row))
            .collect())
    }

    async fn by_lastname_prefix(&self, prefix: &str) -> RepositoryResult<Vec<Contact>> {
        let tables = self.tables.read().await;
        let mut rows: Vec<&ContactRow> = tables
            .contacts
            .values()
            .filter(|row| row.lastname.starts_with(prefix))
            .collect();
        // Map iteration is key order, so a stable sort breaks ties by id
        rows.sort_by(|a, b| a.lastname.cmp(&b.lastname));

        Ok(rows.into_iter().map(|row| tables.materialize(row)).collect())
    }

    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<Contact>> {
        let tables = self.tables.read().await;
        Ok(tables
            .emails
            .get(email)
            .and_then(|id| tables.contacts.get(id))
            .map(|row| tables.materialize(row)))
    }

    async fn phones_for(&self, id: ContactId) -> RepositoryResult<Vec<Phone>> {
        let tables = self.tables.read().await;
        Ok(tables
            .phones
            .values()
            .filter(|phone| phone.contact_id == id)
            .cloned()
            .collect())
    }

    async fn count(&self) -> RepositoryResult<usize> {
        Ok(self.tables.read().await.contacts.len())
    }

    async fn insert(&self, draft: &ContactDraft) -> RepositoryResult<Contact> {
        self.write(|tables| {
            tables.check_constraints(None, draft)?;

            let id = tables.next_contact_id();
            let phone_ids = tables.write_phones(id, &draft.phones, &BTreeSet::new());
            let now = Utc::now();
            let row = ContactRow {
                id,
                firstname: draft.firstname.clone(),
                lastname: draft.lastname.clone(),
                email: draft.email.clone(),
                hidden: draft.hidden,
                phone_ids,
                created_at: now,
                updated_at: now,
            };

            tables.emails.insert(row.email.clone(), id);
            let contact = tables.materialize(&row);
            tables.contacts.insert(id, row);

            tracing::debug!(contact_id = %id, phones = contact.phones.len(), "Inserted contact");
            Ok(contact)
        })
        .await
    }

    async fn update(&self, id: ContactId, draft: &ContactDraft) -> RepositoryResult<Contact> {
        self.write(|tables| {
            let current = tables.row(id)?.clone();
            tables.check_constraints(Some(id), draft)?;

            let reusable: BTreeSet<PhoneId> = current.phone_ids.iter().copied().collect();
            let phone_ids = tables.write_phones(id, &draft.phones, &reusable);
            for dropped in current.phone_ids.iter().filter(|pid| !phone_ids.contains(pid)) {
                tables.phones.remove(dropped);
            }

            tables.emails.remove(&current.email);
            tables.emails.insert(draft.email.clone(), id);

            let row = ContactRow {
                firstname: draft.firstname.clone(),
                lastname: draft.lastname.clone(),
                email: draft.email.clone(),
                phone_ids,
                updated_at: Utc::now(),
                ..current
            };
            let contact = tables.materialize(&row);
            tables.contacts.insert(id, row);

            tracing::debug!(contact_id = %id, "Updated contact");
            Ok(contact)
        })
        .await
    }

    async fn set_hidden(&self, id: ContactId, hidden: bool) -> RepositoryResult<Contact> {
        self.write(|tables| {
            let row = tables.contacts.get_mut(&id).ok_or(RepositoryError::NotFound {
                entity: "Contact",
                id: id.get(),
            })?;
            if row.hidden != hidden {
                row.hidden = hidden;
                row.updated_at = Utc::now();
            }
            let row = row.clone();
            Ok(tables.materialize(&row))
        })
        .await
    }

    async fn delete(&self, id: ContactId) -> RepositoryResult<()> {
        self.write(|tables| {
            let row = tables.contacts.remove(&id).ok_or(RepositoryError::NotFound {
                entity: "Contact",
                id: id.get(),
            })?;
            tables.emails.remove(&row.email);
            // Cascade by foreign key, not just the row's own list
            tables.phones.retain(|_, phone| phone.contact_id != id);

            tracing::debug!(contact_id = %id, "Deleted contact");
            Ok(())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(firstname: &str, lastname: &str, email: &str) -> ContactDraft {
        ContactDraft {
            firstname: firstname.to_string(),
            lastname: lastname.to_string(),
            email: email.to_string(),
            phones: vec![
                PhoneDraft::new("home", format!("{}-1", email)),
                PhoneDraft::new("work", format!("{}-2", email)),
                PhoneDraft::new("mobile", format!("{}-3", email)),
            ],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_sequential_ids() {
        let repo = InMemoryContactRepository::new();
        let a = repo.insert(&draft("A", "Smith", "a@example.com")).await.unwrap();
        let b = repo.insert(&draft("B", "Jones", "b@example.com")).await.unwrap();

        assert_eq!(a.id.get(), 1);
        assert_eq!(b.id.get(), 2);
        assert_eq!(a.phones.len(), 3);
        assert!(a.phones.iter().all(|p| p.contact_id == a.id));
        assert_eq!(repo.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate_email() {
        let repo = InMemoryContactRepository::new();
        repo.insert(&draft("Joe", "Tester", "tester@example.com")).await.unwrap();

        let err = repo
            .insert(&draft("Jane", "Tester", "tester@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict { field: "email", .. }));
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_insert_rejects_repeated_phone_and_writes_nothing() {
        let repo = InMemoryContactRepository::new();
        let mut d = draft("Joe", "Tester", "joe@example.com");
        d.phones[1].phone = d.phones[0].phone.clone();

        let err = repo.insert(&d).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict { field: "phones.phone", .. }));
        assert_eq!(repo.count().await.unwrap(), 0);
        assert!(repo.find_by_email("joe@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_same_number_in_two_contacts() {
        let repo = InMemoryContactRepository::new();
        let mut first = draft("A", "One", "one@example.com");
        let mut second = draft("B", "Two", "two@example.com");
        first.phones[0].phone = "785-555-1234".to_string();
        second.phones[0].phone = "785-555-1234".to_string();

        repo.insert(&first).await.unwrap();
        assert!(repo.insert(&second).await.is_ok());
    }

    #[tokio::test]
    async fn test_by_lastname_prefix_sorted_and_case_sensitive() {
        let repo = InMemoryContactRepository::new();
        repo.insert(&draft("John", "Smith", "jsmith@example.com")).await.unwrap();
        repo.insert(&draft("Tim", "Jones", "tjones@example.com")).await.unwrap();
        repo.insert(&draft("John", "Johnson", "jjohnson@example.com")).await.unwrap();
        repo.insert(&draft("Jay", "jackson", "jackson@example.com")).await.unwrap();

        let names: Vec<String> = repo
            .by_lastname_prefix("J")
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.lastname)
            .collect();
        assert_eq!(names, vec!["Johnson", "Jones"]);
    }

    #[tokio::test]
    async fn test_update_keeps_named_phone_ids_and_drops_others() {
        let repo = InMemoryContactRepository::new();
        let stored = repo.insert(&draft("A", "Smith", "a@example.com")).await.unwrap();
        let kept = stored.phones[0].id;
        let dropped = stored.phones[1].id;

        let mut edit = stored.to_draft();
        edit.phones[0].phone = "999".to_string();
        edit.phones[1] = PhoneDraft::new("fax", "888");

        let updated = repo.update(stored.id, &edit).await.unwrap();
        assert_eq!(updated.phones[0].id, kept);
        assert_eq!(updated.phones[0].phone, "999");
        assert_ne!(updated.phones[1].id, dropped);

        let rows = repo.phones_for(stored.id).await.unwrap();
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|p| p.id != dropped));
    }

    #[tokio::test]
    async fn test_insert_rejects_wrong_phone_count() {
        let repo = InMemoryContactRepository::new();
        let mut short = draft("A", "Smith", "a@example.com");
        short.phones.pop();

        let err = repo.insert(&short).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Constraint { field: "phones", .. }));
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_update_rejects_repeated_phone_id() {
        let repo = InMemoryContactRepository::new();
        let stored = repo.insert(&draft("A", "Smith", "a@example.com")).await.unwrap();

        let mut edit = stored.to_draft();
        edit.phones[1].id = edit.phones[0].id;
        edit.phones[1].phone = "222".to_string();

        let err = repo.update(stored.id, &edit).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict { field: "phones.id", .. }));
        assert_eq!(repo.get(stored.id).await.unwrap().phones, stored.phones);
    }

    #[tokio::test]
    async fn test_update_moves_email_index() {
        let repo = InMemoryContactRepository::new();
        let stored = repo.insert(&draft("A", "Smith", "old@example.com")).await.unwrap();

        let mut edit = stored.to_draft();
        edit.email = "new@example.com".to_string();
        repo.update(stored.id, &edit).await.unwrap();

        assert!(repo.find_by_email("old@example.com").await.unwrap().is_none());
        assert_eq!(
            repo.find_by_email("new@example.com").await.unwrap().map(|c| c.id),
            Some(stored.id)
        );
        // The freed address can be taken again
        assert!(repo.insert(&draft("B", "Jones", "old@example.com")).await.is_ok());
    }

    #[tokio::test]
    async fn test_set_hidden_is_idempotent() {
        let repo = InMemoryContactRepository::new();
        let stored = repo.insert(&draft("A", "Smith", "a@example.com")).await.unwrap();

        let first = repo.set_hidden(stored.id, true).await.unwrap();
        let second = repo.set_hidden(stored.id, true).await.unwrap();
        assert!(first.hidden && second.hidden);
        assert_eq!(first.updated_at, second.updated_at);
    }

    #[tokio::test]
    async fn test_delete_cascades_phones() {
        let repo = InMemoryContactRepository::new();
        let stored = repo.insert(&draft("A", "Smith", "a@example.com")).await.unwrap();

        repo.delete(stored.id).await.unwrap();
        assert!(repo.phones_for(stored.id).await.unwrap().is_empty());
        assert!(matches!(
            repo.get(stored.id).await,
            Err(RepositoryError::NotFound { .. })
        ));
        assert!(matches!(
            repo.delete(stored.id).await,
            Err(RepositoryError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_snapshot_round_trip() {
        let path = std::env::temp_dir().join(format!("contacts-{}.json", uuid::Uuid::new_v4()));
        let stored_id = {
            let repo = InMemoryContactRepository::with_snapshot(&path).unwrap();
            let stored = repo.insert(&draft("A", "Smith", "a@example.com")).await.unwrap();
            repo.set_hidden(stored.id, true).await.unwrap();
            stored.id
        };

        let reopened = InMemoryContactRepository::with_snapshot(&path).unwrap();
        let contact = reopened.get(stored_id).await.unwrap();
        assert!(contact.hidden);
        assert_eq!(contact.phones.len(), 3);

        // Counters survive so keys are never reused
        let next = reopened.insert(&draft("B", "Jones", "b@example.com")).await.unwrap();
        assert!(next.id > stored_id);
        // Email index is rebuilt on load
        assert!(reopened.insert(&draft("C", "Doe", "a@example.com")).await.is_err());

        std::fs::remove_file(path).unwrap();
    }
}
