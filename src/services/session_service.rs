//! Session service layer.
//!
//! Moves a [`Session`] between anonymous and authenticated, and manages the
//! user accounts that logins are checked against.

use crate::auth::{AccessContext, AccessPolicy, Operation, Session};
use crate::domain::UserId;
use crate::error::{AuthError, AuthResult, ServiceError, ServiceResult};
use crate::metrics::Metrics;
use crate::models::{Credentials, NewUser, User};
use crate::repositories::UserRepository;
use crate::validation::{validate_user, UserFacts};
use async_trait::async_trait;
use std::sync::Arc;

/// Session service trait for login state and accounts.
#[async_trait]
pub trait SessionService: Send + Sync {
    /// Check `credentials` and bind `session` to the user on success.
    /// A failed login leaves the session as it was.
    async fn login(&self, session: &mut Session, credentials: &Credentials) -> AuthResult<UserId>;

    /// Return the session to anonymous.
    fn logout(&self, session: &mut Session);

    /// The user a session is bound to.
    async fn current_user(&self, session: &Session) -> ServiceResult<Option<User>>;

    /// Create another account. Requires a logged-in session.
    async fn register(&self, ctx: &AccessContext, user: NewUser) -> ServiceResult<User>;
}

/// Default implementation of SessionService.
pub struct SessionServiceImpl {
    users: Arc<dyn UserRepository>,
    policy: AccessPolicy,
    metrics: Metrics,
}

impl SessionServiceImpl {
    /// Create a new session service.
    pub fn new(users: Arc<dyn UserRepository>, policy: AccessPolicy, metrics: Metrics) -> Self {
        Self {
            users,
            policy,
            metrics,
        }
    }

    /// Make sure the first account exists, without needing a session.
    ///
    /// Returns the existing user when the username is already registered.
    pub async fn bootstrap_admin(&self, user: NewUser) -> ServiceResult<User> {
        if let Some(existing) = self.users.find_by_username(&user.username).await? {
            tracing::debug!(username = %existing.username, "Admin account already present");
            return Ok(existing);
        }
        self.insert_validated(user).await
    }

    async fn insert_validated(&self, user: NewUser) -> ServiceResult<User> {
        let facts = UserFacts {
            username_taken: self.users.find_by_username(&user.username).await?.is_some(),
        };
        if let Err(errors) = validate_user(&user, &facts) {
            self.metrics.record_validation_failure();
            return Err(ServiceError::invalid(errors));
        }
        Ok(self.users.insert(&user).await?)
    }
}

#[async_trait]
impl SessionService for SessionServiceImpl {
    async fn login(&self, session: &mut Session, credentials: &Credentials) -> AuthResult<UserId> {
        match self.users.authenticate(credentials).await? {
            Some(user_id) => {
                session.login(user_id);
                tracing::info!(user_id = %user_id, "Logged in");
                Ok(user_id)
            }
            None => {
                tracing::warn!(username = %credentials.username, "Login failed");
                Err(AuthError::InvalidCredentials)
            }
        }
    }

    fn logout(&self, session: &mut Session) {
        if let Some(user_id) = session.user_id() {
            tracing::info!(user_id = %user_id, "Logged out");
        }
        session.logout();
    }

    async fn current_user(&self, session: &Session) -> ServiceResult<Option<User>> {
        match session.user_id() {
            Some(id) => Ok(Some(self.users.get(id).await?)),
            None => Ok(None),
        }
    }

    async fn register(&self, ctx: &AccessContext, user: NewUser) -> ServiceResult<User> {
        self.policy
            .authorize(ctx, Operation::RegisterUser)
            .map_err(|e| {
                self.metrics.record_authorization_denial();
                e
            })?;
        self.insert_validated(user).await
    }
}
