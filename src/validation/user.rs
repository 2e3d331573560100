//! User account rules.

use super::is_blank;
use crate::domain::{FieldError, ValidationErrors};
use crate::models::NewUser;

#[derive(Debug, Clone, Copy, Default)]
pub struct UserFacts {
    pub username_taken: bool,
}

type UserRule = fn(&NewUser, &UserFacts) -> Vec<FieldError>;

const USER_RULES: &[UserRule] = &[username_present, username_unique, password_present];

fn username_present(user: &NewUser, _facts: &UserFacts) -> Vec<FieldError> {
    if is_blank(&user.username) {
        vec![FieldError::blank("username")]
    } else {
        Vec::new()
    }
}

fn username_unique(user: &NewUser, facts: &UserFacts) -> Vec<FieldError> {
    if facts.username_taken && !is_blank(&user.username) {
        vec![FieldError::taken("username")]
    } else {
        Vec::new()
    }
}

fn password_present(user: &NewUser, _facts: &UserFacts) -> Vec<FieldError> {
    // Whitespace is a legal password; only empty is rejected
    if user.password.is_empty() {
        vec![FieldError::blank("password")]
    } else {
        Vec::new()
    }
}

pub fn validate_user(user: &NewUser, facts: &UserFacts) -> Result<(), ValidationErrors> {
    USER_RULES
        .iter()
        .flat_map(|rule| rule(user, facts))
        .collect::<ValidationErrors>()
        .into_result()
}
