use async_trait::async_trait;
use contact_book::domain::ContactId;
use contact_book::error::{RepositoryError, RepositoryResult};
use contact_book::models::{Contact, ContactDraft, Phone};
use contact_book::repositories::{ContactRepository, InMemoryContactRepository};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Mock contact repository for testing.
///
/// Delegates storage to an in-memory repository, tracks method calls for
/// verification, and can be told to reject the next write with a
/// uniqueness conflict the way a racing writer would.
#[allow(dead_code)]
#[derive(Clone)]
pub struct MockContactRepository {
    inner: Arc<InMemoryContactRepository>,
    call_counts: Arc<Mutex<HashMap<String, usize>>>,
    conflict: Arc<Mutex<Option<&'static str>>>,
}

#[allow(dead_code)]
impl MockContactRepository {
    /// Create a new empty MockContactRepository.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(InMemoryContactRepository::new()),
            call_counts: Arc::new(Mutex::new(HashMap::new())),
            conflict: Arc::new(Mutex::new(None)),
        }
    }

    /// Make the next insert or update fail with a conflict on `field`.
    pub fn fail_next_write_with_conflict(&self, field: &'static str) {
        *self.conflict.lock().unwrap() = Some(field);
    }

    /// Get the number of times a method was called.
    pub fn get_call_count(&self, method: &str) -> usize {
        let counts = self.call_counts.lock().unwrap();
        *counts.get(method).unwrap_or(&0)
    }

    /// Total calls across every method.
    pub fn total_calls(&self) -> usize {
        self.call_counts.lock().unwrap().values().sum()
    }

    fn track_call(&self, method: &str) {
        let mut counts = self.call_counts.lock().unwrap();
        *counts.entry(method.to_string()).or_insert(0) += 1;
    }

    fn take_conflict(&self, draft: &ContactDraft) -> RepositoryResult<()> {
        match self.conflict.lock().unwrap().take() {
            Some(field) => Err(RepositoryError::Conflict {
                field,
                value: draft.email.clone(),
            }),
            None => Ok(()),
        }
    }
}

impl Default for MockContactRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContactRepository for MockContactRepository {
    async fn get(&self, id: ContactId) -> RepositoryResult<Contact> {
        self.track_call("get");
        self.inner.get(id).await
    }

    async fn all(&self) -> RepositoryResult<Vec<Contact>> {
        self.track_call("all");
        self.inner.all().await
    }

    async fn by_lastname_prefix(&self, prefix: &str) -> RepositoryResult<Vec<Contact>> {
        self.track_call("by_lastname_prefix");
        self.inner.by_lastname_prefix(prefix).await
    }

    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<Contact>> {
        self.track_call("find_by_email");
        self.inner.find_by_email(email).await
    }

    async fn phones_for(&self, id: ContactId) -> RepositoryResult<Vec<Phone>> {
        self.track_call("phones_for");
        self.inner.phones_for(id).await
    }

    async fn count(&self) -> RepositoryResult<usize> {
        self.track_call("count");
        self.inner.count().await
    }

    async fn insert(&self, draft: &ContactDraft) -> RepositoryResult<Contact> {
        self.track_call("insert");
        self.take_conflict(draft)?;
        self.inner.insert(draft).await
    }

    async fn update(&self, id: ContactId, draft: &ContactDraft) -> RepositoryResult<Contact> {
        self.track_call("update");
        self.take_conflict(draft)?;
        self.inner.update(id, draft).await
    }

    async fn set_hidden(&self, id: ContactId, hidden: bool) -> RepositoryResult<Contact> {
        self.track_call("set_hidden");
        self.inner.set_hidden(id, hidden).await
    }

    async fn delete(&self, id: ContactId) -> RepositoryResult<()> {
        self.track_call("delete");
        self.inner.delete(id).await
    }
}
