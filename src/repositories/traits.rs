use crate::domain::{ContactId, UserId};
use crate::error::RepositoryResult;
use crate::models::*;
use async_trait::async_trait;

/// Repository for contacts and their phones.
///
/// Implementations are the source of truth for uniqueness: a write whose
/// email belongs to another contact, or whose phones repeat a number, must
/// fail with `RepositoryError::Conflict` even if validation let it through.
/// Inserts and updates write the contact and its phones as one unit.
#[async_trait]
pub trait ContactRepository: Send + Sync {
    /// Retrieve a single contact by ID.
    async fn get(&self, id: ContactId) -> RepositoryResult<Contact>;

    /// All contacts in primary key order.
    async fn all(&self) -> RepositoryResult<Vec<Contact>>;

    /// Contacts whose last name starts with `prefix` (case-sensitive),
    /// ordered by last name.
    async fn by_lastname_prefix(&self, prefix: &str) -> RepositoryResult<Vec<Contact>>;

    /// The contact holding exactly this email, if any.
    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<Contact>>;

    /// Phone rows referencing `id`, whether or not the contact still exists.
    async fn phones_for(&self, id: ContactId) -> RepositoryResult<Vec<Phone>>;

    /// Number of stored contacts.
    async fn count(&self) -> RepositoryResult<usize>;

    /// Store a new contact and its phones.
    async fn insert(&self, draft: &ContactDraft) -> RepositoryResult<Contact>;

    /// Replace a contact's fields and phone collection.
    async fn update(&self, id: ContactId, draft: &ContactDraft) -> RepositoryResult<Contact>;

    /// Set the hidden flag.
    async fn set_hidden(&self, id: ContactId, hidden: bool) -> RepositoryResult<Contact>;

    /// Delete a contact and its phones.
    async fn delete(&self, id: ContactId) -> RepositoryResult<()>;
}

/// Repository for user accounts.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Retrieve a single user by ID.
    async fn get(&self, id: UserId) -> RepositoryResult<User>;

    /// Look a user up by exact username.
    async fn find_by_username(&self, username: &str) -> RepositoryResult<Option<User>>;

    /// Store a new user. Usernames are unique.
    async fn insert(&self, user: &NewUser) -> RepositoryResult<User>;

    /// Resolve credentials to a user, or `None` if they do not match.
    async fn authenticate(&self, credentials: &Credentials) -> RepositoryResult<Option<UserId>>;
}
