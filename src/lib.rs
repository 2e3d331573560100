//! Contact Book - an address book core with an MCP front end.
//!
//! Contacts own exactly three phones, carry a globally unique email, and are
//! only reachable through a logged-in session. The library keeps those rules
//! in plain Rust types; the binary exposes them as MCP tools over stdio.
//!
//! # Architecture
//!
//! - **domain**: Typed ids and field-level validation errors
//! - **models**: Contacts, phones, users, and the drafts built before saving
//! - **validation**: Ordered rule lists for contacts, phones and users
//! - **repositories**: Storage traits, in-memory stores, JSON snapshots
//! - **auth**: Session state, access policy, password hashing
//! - **services**: Contact and session operations behind the access gate
//! - **export**: `(name, email)` projection and CSV
//! - **metrics**: Operation counters
//! - **error**: Custom error types for precise error handling
//! - **config**: Configuration management from environment variables
//! - **server**: MCP protocol server

pub mod auth;
pub mod config;
pub mod domain;
pub mod error;
pub mod export;
pub mod metrics;
pub mod models;
pub mod repositories;
pub mod server;
pub mod services;
pub mod validation;

// Re-export commonly used types
pub use auth::{AccessContext, AccessPolicy, Operation, Session};
pub use config::Config;
pub use domain::{ContactId, FieldError, PhoneId, UserId, ValidationErrors};
pub use error::{AuthError, ConfigError, RepositoryError, ServiceError};
pub use metrics::{Metrics, MetricsSummary};
pub use models::{
    Contact, ContactChanges, ContactDraft, ContactParams, Credentials, NewUser, Phone, PhoneDraft,
    User,
};
pub use repositories::{
    ContactRepository, InMemoryContactRepository, InMemoryUserRepository, UserRepository,
};
pub use server::ContactBookServer;
pub use services::{
    by_letter, ContactService, ContactServiceImpl, SessionService, SessionServiceImpl,
};
