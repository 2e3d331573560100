//! Application service layer.
//!
//! Services contain business logic and orchestrate interactions between
//! the access policy, validation rules and repositories. They provide a
//! clean boundary between the MCP handlers and the data access layer.

mod contact_service;
mod session_service;

pub use contact_service::{by_letter, ContactService, ContactServiceImpl};
pub use session_service::{SessionService, SessionServiceImpl};
