//! Login state.

use crate::domain::UserId;
use serde::Serialize;

/// The identity an operation runs as.
///
/// Every service call takes one of these explicitly instead of reading a
/// global session, so authorization can be exercised without a request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccessContext {
    pub user_id: Option<UserId>,
}

impl AccessContext {
    pub fn anonymous() -> Self {
        Self { user_id: None }
    }

    pub fn authenticated(user_id: UserId) -> Self {
        Self {
            user_id: Some(user_id),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user_id.is_some()
    }
}

/// A client's session.
///
/// `Anonymous -> Authenticated` on a successful login,
/// `Authenticated -> Anonymous` on logout. Logging in again while
/// authenticated rebinds the session to the new user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Session {
    #[default]
    Anonymous,
    Authenticated {
        user_id: UserId,
    },
}

impl Session {
    pub fn login(&mut self, user_id: UserId) {
        *self = Session::Authenticated { user_id };
    }

    pub fn logout(&mut self) {
        *self = Session::Anonymous;
    }

    pub fn user_id(&self) -> Option<UserId> {
        match self {
            Session::Anonymous => None,
            Session::Authenticated { user_id } => Some(*user_id),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user_id().is_some()
    }

    pub fn context(&self) -> AccessContext {
        AccessContext {
            user_id: self.user_id(),
        }
    }
}
