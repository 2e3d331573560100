//! Which operations need a login.

use super::session::AccessContext;
use crate::domain::UserId;
use crate::error::{ServiceError, ServiceResult};
use std::fmt;

/// Where denied callers are sent.
pub const LOGIN_PATH: &str = "/login";

/// Contact operations the policy knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    List,
    Show,
    New,
    Edit,
    Create,
    Update,
    Delete,
    Hide,
    Export,
    RegisterUser,
}

impl Operation {
    /// Reads that `allow_anonymous_read` may open up.
    pub fn is_read(self) -> bool {
        matches!(self, Operation::List | Operation::Show)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Operation::List => "list contacts",
            Operation::Show => "show contact",
            Operation::New => "open new contact form",
            Operation::Edit => "edit contact",
            Operation::Create => "create contact",
            Operation::Update => "update contact",
            Operation::Delete => "delete contact",
            Operation::Hide => "hide contact",
            Operation::Export => "export contacts",
            Operation::RegisterUser => "register user",
        };
        f.write_str(label)
    }
}

/// The authenticated/anonymous gate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccessPolicy {
    /// Let anonymous sessions list and show contacts. Off by default.
    pub allow_anonymous_read: bool,
}

impl AccessPolicy {
    pub fn new(allow_anonymous_read: bool) -> Self {
        Self {
            allow_anonymous_read,
        }
    }

    /// Check `ctx` may perform `operation`.
    ///
    /// Returns the acting user when there is one. Anonymous reads that the
    /// policy allows return `Ok(None)`.
    pub fn authorize(
        &self,
        ctx: &AccessContext,
        operation: Operation,
    ) -> ServiceResult<Option<UserId>> {
        match ctx.user_id {
            Some(user_id) => Ok(Some(user_id)),
            None if self.allow_anonymous_read && operation.is_read() => Ok(None),
            None => {
                tracing::warn!(operation = %operation, "Denied anonymous access");
                Err(ServiceError::Unauthorized { operation })
            }
        }
    }
}
