use crate::auth::password;
use crate::domain::UserId;
use crate::error::{RepositoryError, RepositoryResult};
use crate::models::{Credentials, NewUser, User};
use crate::repositories::traits::UserRepository;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct UserTable {
    last_id: u64,
    users: BTreeMap<UserId, User>,
}

impl UserTable {
    fn by_username(&self, username: &str) -> Option<&User> {
        self.users.values().find(|u| u.username == username)
    }
}

/// In-memory user accounts.
///
/// Passwords are stored as Argon2id hashes; `authenticate` verifies against
/// the stored hash.
pub struct InMemoryUserRepository {
    table: RwLock<UserTable>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            table: RwLock::new(UserTable::default()),
        }
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get(&self, id: UserId) -> RepositoryResult<User> {
        let table = self.table.read().await;
        table
            .users
            .get(&id)
            .cloned()
            .ok_or(RepositoryError::NotFound {
                entity: "User",
                id: id.get(),
            })
    }

    async fn find_by_username(&self, username: &str) -> RepositoryResult<Option<User>> {
        Ok(self.table.read().await.by_username(username).cloned())
    }

    async fn insert(&self, user: &NewUser) -> RepositoryResult<User> {
        let mut table = self.table.write().await;
        if table.by_username(&user.username).is_some() {
            return Err(RepositoryError::Conflict {
                field: "username",
                value: user.username.clone(),
            });
        }

        let password_hash = password::hash(&user.password)
            .map_err(|e| RepositoryError::PasswordHash(e.to_string()))?;
        table.last_id += 1;
        let id = UserId::new(table.last_id).expect("counter starts above zero");
        let stored = User {
            id,
            username: user.username.clone(),
            password_hash,
            created_at: Utc::now(),
        };
        table.users.insert(id, stored.clone());

        tracing::info!(user_id = %id, username = %stored.username, "Registered user");
        Ok(stored)
    }

    async fn authenticate(&self, credentials: &Credentials) -> RepositoryResult<Option<UserId>> {
        let table = self.table.read().await;
        Ok(table
            .by_username(&credentials.username)
            .filter(|u| password::verify(&credentials.password, &u.password_hash))
            .map(|u| u.id))
    }
}
